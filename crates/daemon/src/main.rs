// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Item recycler replay host (recyclerd)
//!
//! Reads host commands from stdin, drives the recycler against an in-memory
//! world, and writes recycle events and a final world snapshot to stdout.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod lifecycle;
mod protocol;

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::{sleep_until, Instant};
use tracing::{error, info};

use crate::lifecycle::{Config, DaemonState, LifecycleError};
use crate::protocol::{Applied, SnapshotLine};

#[derive(Parser)]
#[command(name = "recyclerd", version, about = "Item recycler replay host")]
struct Args {
    /// Recipe configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = Config {
        recipes_path: args.config,
        log_path: args.log_file,
    };

    // Write startup marker to log (before tracing setup)
    write_startup_marker(&config)?;

    // Set up logging
    let log_guard = setup_logging(&config)?;

    // Start daemon
    let mut daemon = match lifecycle::startup(&config) {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!("Daemon ready, reading commands from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    // Set while a `wait` command is pausing input
    let mut resume_at: Option<Instant> = None;
    let mut interrupted = false;

    // Main event loop
    loop {
        tokio::select! {
            biased;

            // Graceful shutdown on SIGTERM
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                interrupted = true;
                break;
            }

            // Graceful shutdown on SIGINT
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                interrupted = true;
                break;
            }

            // Host events go first so the recycler sees each change before
            // the next command is read
            Some(event) = daemon.host_events.recv() => {
                if let Err(e) = daemon.process_event(event).await {
                    error!("Error processing host event: {}", e);
                }
            }

            Some(event) = daemon.recycle_events.recv() => {
                write_line(&mut stdout, &event).await?;
            }

            _ = sleep_until(resume_at.unwrap_or_else(Instant::now)), if resume_at.is_some() => {
                resume_at = None;
            }

            line = lines.next_line(), if resume_at.is_none() => {
                match line {
                    Ok(Some(line)) => {
                        if let Applied::Pause(pause) = daemon.apply_line(&line) {
                            resume_at = Instant::now().checked_add(pause);
                        }
                    }
                    Ok(None) => {
                        info!("Input closed, draining...");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
        }
    }

    if interrupted {
        daemon.shutdown();
    } else {
        drain(&mut daemon, &mut stdout).await?;
        let snapshot = SnapshotLine {
            world: daemon.snapshot(),
        };
        write_line(&mut stdout, &snapshot).await?;
    }

    info!("Daemon stopped");
    Ok(())
}

/// Run until no worker is active and no host event is pending, printing
/// recycle events as they arrive
async fn drain(daemon: &mut DaemonState, out: &mut Stdout) -> Result<(), LifecycleError> {
    loop {
        daemon.process_pending().await;
        while let Ok(event) = daemon.recycle_events.try_recv() {
            write_line(out, &event).await?;
        }
        if daemon.recycler.active_workers() == 0 && daemon.host_events.is_empty() {
            return Ok(());
        }

        tokio::select! {
            Some(event) = daemon.host_events.recv() => {
                if let Err(e) = daemon.process_event(event).await {
                    error!("Error processing host event: {}", e);
                }
            }
            Some(event) = daemon.recycle_events.recv() => {
                write_line(out, &event).await?;
            }
            _ = daemon.recycler.wait_idle() => {}
        }
    }
}

async fn write_line<T: Serialize>(out: &mut Stdout, value: &T) -> Result<(), LifecycleError> {
    let mut line = protocol::encode(value)?;
    line.push(b'\n');
    out.write_all(&line).await?;
    out.flush().await?;
    Ok(())
}

/// Startup marker prefix written to the log file before anything else
pub const STARTUP_MARKER_PREFIX: &str = "--- recyclerd: starting (pid: ";

/// Append a startup marker to the log file, if logging to a file
fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    use std::io::Write;

    let Some(log_path) = &config.log_path else {
        return Ok(());
    };

    // Create log directory if needed
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    writeln!(file, "{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id())?;

    Ok(())
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (non_blocking, guard) = match &config.log_path {
        Some(log_path) => {
            let file_name = log_path
                .file_name()
                .ok_or_else(|| LifecycleError::InvalidLogPath(log_path.clone()))?;
            let dir = log_path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_default();
            let file_appender = tracing_appender::rolling::never(dir, file_name);
            tracing_appender::non_blocking(file_appender)
        }
        // stdout carries the event stream
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    // Set up subscriber with env filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}
