// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rc_core::RecipeOutput;

const C1: ContainerId = ContainerId(1);

fn entry(handle: u64) -> QueueEntry {
    QueueEntry {
        handle: ItemHandle(handle),
        item: ItemId(121),
        recipe: Arc::new(Recipe::new(
            ItemId(121),
            Duration::from_millis(2000),
            vec![RecipeOutput::new(ItemId(67), 5)],
        )),
        enqueued_at: Instant::now(),
    }
}

#[test]
fn register_is_idempotent() {
    let registry = QueueRegistry::new();
    assert!(registry.register(C1));
    assert!(!registry.register(C1));
    assert!(registry.is_registered(C1));
    assert_eq!(registry.containers(), vec![C1]);
}

#[test]
fn first_enqueue_starts_worker_later_ones_do_not() {
    let registry = QueueRegistry::new();
    registry.register(C1);

    let queue = registry.enqueue(C1, entry(1)).unwrap();
    assert!(queue.is_worker_active());
    assert!(registry.enqueue(C1, entry(2)).is_none());
    assert!(registry.enqueue(C1, entry(3)).is_none());
    assert_eq!(queue.pending_len(), 3);
}

#[test]
fn enqueue_creates_state_for_unknown_container() {
    let registry = QueueRegistry::new();
    assert!(registry.enqueue(C1, entry(1)).is_some());
    assert!(registry.is_registered(C1));
}

#[test]
fn entries_pop_in_fifo_order() {
    let registry = QueueRegistry::new();
    let queue = registry.enqueue(C1, entry(1)).unwrap();
    registry.enqueue(C1, entry(2));
    registry.enqueue(C1, entry(3));

    let order: Vec<_> = std::iter::from_fn(|| queue.pop_front())
        .map(|e| e.handle)
        .collect();
    assert_eq!(order, vec![ItemHandle(1), ItemHandle(2), ItemHandle(3)]);
}

#[test]
fn dequeue_or_stop_clears_flag_only_when_empty() {
    let registry = QueueRegistry::new();
    let queue = registry.enqueue(C1, entry(1)).unwrap();

    assert_eq!(queue.dequeue_or_stop(), DrainDecision::Continue);
    assert!(queue.is_worker_active());

    queue.pop_front();
    assert_eq!(queue.dequeue_or_stop(), DrainDecision::Stop);
    assert!(!queue.is_worker_active());
}

#[test]
fn enqueue_after_stop_starts_a_new_worker() {
    let registry = QueueRegistry::new();
    let queue = registry.enqueue(C1, entry(1)).unwrap();
    queue.pop_front();
    assert_eq!(queue.dequeue_or_stop(), DrainDecision::Stop);

    let restarted = registry.enqueue(C1, entry(2)).unwrap();
    assert!(Arc::ptr_eq(&queue, &restarted));
}

#[test]
fn enqueue_racing_a_stopping_worker_is_not_stranded() {
    // Worker found the queue empty and is about to call dequeue_or_stop
    // when an item arrives.
    let registry = QueueRegistry::new();
    let queue = registry.enqueue(C1, entry(1)).unwrap();
    queue.pop_front();

    assert!(registry.enqueue(C1, entry(2)).is_none());
    assert_eq!(queue.dequeue_or_stop(), DrainDecision::Continue);
    assert_eq!(queue.pop_front().unwrap().handle, ItemHandle(2));
}

#[test]
fn concurrent_enqueues_start_exactly_one_worker() {
    let registry = Arc::new(QueueRegistry::new());
    registry.register(C1);

    let starts: usize = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                s.spawn(move || {
                    (0..50)
                        .filter(|i| registry.enqueue(C1, entry(t * 100 + i)).is_some())
                        .count()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(starts, 1);
    assert_eq!(registry.get(C1).unwrap().pending_len(), 400);
}

#[test]
fn unregister_closes_queue_and_abandons_entries() {
    let registry = QueueRegistry::new();
    let queue = registry.enqueue(C1, entry(1)).unwrap();
    registry.enqueue(C1, entry(2));

    assert_eq!(registry.unregister(C1), Some(2));
    assert!(queue.is_closed());
    assert_eq!(queue.pending_len(), 0);
    assert!(!registry.is_registered(C1));
    assert_eq!(registry.unregister(C1), None);
}

#[test]
fn clear_closes_every_queue() {
    let registry = QueueRegistry::new();
    let a = registry.enqueue(ContainerId(1), entry(1)).unwrap();
    let b = registry.enqueue(ContainerId(2), entry(2)).unwrap();

    assert_eq!(registry.clear(), 2);
    assert!(a.is_closed() && b.is_closed());
    assert!(registry.containers().is_empty());
}

#[tokio::test(start_paused = true)]
async fn wait_for_work_times_out_on_empty_queue() {
    let registry = QueueRegistry::new();
    registry.register(C1);
    let queue = registry.get(C1).unwrap();

    let start = tokio::time::Instant::now();
    queue.wait_for_work(Duration::from_secs(2)).await;
    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn wait_for_work_wakes_on_enqueue() {
    let registry = Arc::new(QueueRegistry::new());
    registry.register(C1);
    let queue = registry.get(C1).unwrap();

    let producer = Arc::clone(&registry);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        producer.enqueue(C1, entry(1));
    });

    let start = tokio::time::Instant::now();
    queue.wait_for_work(Duration::from_secs(2)).await;
    let waited = start.elapsed();
    assert!(waited >= Duration::from_millis(500));
    assert!(waited < Duration::from_secs(2));
    assert_eq!(queue.pending_len(), 1);
}

#[tokio::test(start_paused = true)]
async fn wait_for_work_ignores_stale_wakeup() {
    let registry = QueueRegistry::new();
    let queue = registry.enqueue(C1, entry(1)).unwrap();
    // The notify permit from the enqueue is still stored
    queue.pop_front();

    let start = tokio::time::Instant::now();
    queue.wait_for_work(Duration::from_secs(2)).await;
    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn wait_for_work_returns_when_closed() {
    let registry = Arc::new(QueueRegistry::new());
    registry.register(C1);
    let queue = registry.get(C1).unwrap();

    let closer = Arc::clone(&registry);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        closer.unregister(C1);
    });

    queue.wait_for_work(Duration::from_secs(2)).await;
    assert!(queue.is_closed());
}

#[tokio::test(start_paused = true)]
async fn wait_for_work_with_unbounded_idle_still_wakes_on_enqueue() {
    let registry = Arc::new(QueueRegistry::new());
    registry.register(C1);
    let queue = registry.get(C1).unwrap();

    let producer = Arc::clone(&registry);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        producer.enqueue(C1, entry(1));
    });

    queue.wait_for_work(Duration::MAX).await;
    assert_eq!(queue.pending_len(), 1);
}
