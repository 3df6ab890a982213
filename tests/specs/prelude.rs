//! Shared helpers for recyclerd specs

use assert_cmd::Command;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

pub use serde_json::json;

/// Input kind 36628, output kind 36629, fast delays
pub const FAST_RECIPES: &str = r#"
[containers]
input = 36628
output = 36629

[engine]
idle_timeout = "50ms"

[[recipe]]
item = 121
delay = "20ms"
outputs = [{ item = 67, amount = 5 }]

[[recipe]]
item = 363
recycle_time = 20
recycled_ids = [67, 67, 67, 68]
"#;

/// A temporary directory holding the daemon's config and log files
pub struct Scenario {
    dir: TempDir,
    config: Option<PathBuf>,
}

impl Scenario {
    /// Run with the built-in default configuration
    pub fn defaults() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            config: None,
        }
    }

    /// Run with the given recipe configuration
    pub fn with_recipes(content: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recipes.toml");
        std::fs::write(&path, content).unwrap();
        Self {
            dir,
            config: Some(path),
        }
    }

    pub fn fast() -> Self {
        Self::with_recipes(FAST_RECIPES)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// A recyclerd invocation wired to this scenario's config
    pub fn recyclerd(&self) -> Recyclerd {
        let mut cmd = Command::cargo_bin("recyclerd").unwrap();
        if let Some(config) = &self.config {
            cmd.arg("--config").arg(config);
        }
        cmd.env("RUST_LOG", "info");
        Recyclerd { cmd }
    }

    /// Run a script of host commands and expect a clean exit
    pub fn run(&self, script: &[Value]) -> Output {
        self.recyclerd().script(script).passes()
    }
}

pub struct Recyclerd {
    cmd: Command,
}

impl Recyclerd {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Feed one JSON command per line on stdin
    pub fn script(mut self, commands: &[Value]) -> Self {
        let input: String = commands.iter().map(|c| format!("{}\n", c)).collect();
        self.cmd.write_stdin(input);
        self
    }

    pub fn stdin(mut self, raw: &str) -> Self {
        self.cmd.write_stdin(raw.to_string());
        self
    }

    pub fn passes(mut self) -> Output {
        let output = self.cmd.output().unwrap();
        let out = Output::from(output.clone());
        assert!(
            output.status.success(),
            "recyclerd failed ({})\nstdout:\n{}\nstderr:\n{}",
            output.status,
            out.stdout,
            out.stderr
        );
        out
    }

    pub fn fails(mut self) -> Output {
        let output = self.cmd.output().unwrap();
        let out = Output::from(output.clone());
        assert!(
            !output.status.success(),
            "recyclerd unexpectedly succeeded\nstdout:\n{}",
            out.stdout
        );
        out
    }
}

pub struct Output {
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for Output {
    fn from(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Output {
    fn lines(&self) -> Vec<Value> {
        self.stdout
            .lines()
            .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad line {:?}: {}", l, e)))
            .collect()
    }

    /// Every recycle event, in order
    pub fn events(&self) -> Vec<Value> {
        self.lines()
            .into_iter()
            .filter(|l| l["type"] != "snapshot")
            .collect()
    }

    /// Events of one type
    pub fn events_of(&self, kind: &str) -> Vec<Value> {
        self.events()
            .into_iter()
            .filter(|e| e["type"] == kind)
            .collect()
    }

    /// The final snapshot line
    pub fn snapshot(&self) -> Value {
        let lines = self.lines();
        let last = lines.last().expect("no output");
        assert_eq!(last["type"], "snapshot", "last line is not a snapshot");
        last.clone()
    }

    /// Items inside one container in the final snapshot
    pub fn items_in(&self, container: u64) -> Vec<u64> {
        self.snapshot()["containers"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["id"] == container)
            .unwrap_or_else(|| panic!("container {} not in snapshot", container))["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i.as_u64().unwrap())
            .collect()
    }

    pub fn dropped(&self) -> Vec<Value> {
        self.snapshot()["dropped"].as_array().unwrap().clone()
    }

    pub fn stderr_has(&self, needle: &str) -> &Self {
        assert!(
            self.stderr.contains(needle),
            "stderr does not contain {:?}:\n{}",
            needle,
            self.stderr
        );
        self
    }
}

pub fn spawn(kind: u16, at: [f32; 3], capacity: usize) -> Value {
    json!({ "op": "spawn", "kind": kind, "at": at, "capacity": capacity })
}

pub fn put(container: u64, item: u16) -> Value {
    json!({ "op": "put", "container": container, "item": item })
}

pub fn take(container: u64, item: u16) -> Value {
    json!({ "op": "take", "container": container, "item": item })
}

pub fn destroy(container: u64) -> Value {
    json!({ "op": "destroy", "container": container })
}

pub fn wait(ms: u64) -> Value {
    json!({ "op": "wait", "ms": ms })
}

pub fn world_loaded() -> Value {
    json!({ "op": "world_loaded" })
}
