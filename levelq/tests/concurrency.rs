use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use levelq::{Level, PriorityQueue, QueueAction, QueueConfig};

const PRODUCERS: usize = 8;

/// Test factory functions
fn create_shared_queue(levels: &[Level]) -> Arc<PriorityQueue<u64>> {
    let config = QueueConfig::new()
        .with_shard_amount(16)
        .with_history_capacity(64 * 1024);
    Arc::new(PriorityQueue::with_config(levels.iter().copied(), u64::MAX, config).unwrap())
}

fn tag(producer: usize, seq: usize) -> u64 {
    ((producer as u64) << 32) | seq as u64
}

/// C1. Fifty Thousand Concurrent Enqueues Are All Kept
#[test]
fn test_concurrent_enqueues_to_one_level() {
    let queue = create_shared_queue(&[1, 2, 3]);
    let per_producer = 50_000 / PRODUCERS;

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let queue = queue.clone();
            thread::spawn(move || {
                for seq in 0..per_producer {
                    queue.enqueue_at(tag(producer, seq), 2).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(queue.len(), 50_000);
    assert_eq!(queue.len_of(2), 50_000);
    assert_eq!(queue.history_count(QueueAction::Enqueue), 50_000);
    assert_eq!(queue.metrics().enqueued, 50_000);

    // Per-producer order survives the interleaving
    let bucket = queue.full_bucket(2).unwrap();
    let mut next_seq = vec![0u64; PRODUCERS];
    for value in bucket {
        let producer = (value >> 32) as usize;
        assert_eq!(value & 0xFFFF_FFFF, next_seq[producer]);
        next_seq[producer] += 1;
    }
}

/// C2. Mixed Producers And Consumers Never Lose Or Duplicate
#[test]
fn test_mixed_producers_and_consumers() {
    let queue = create_shared_queue(&[1, 5, 9]);
    let per_producer = 2_000;
    let total = PRODUCERS * per_producer;
    let taken = Arc::new(AtomicUsize::new(0));

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let queue = queue.clone();
            thread::spawn(move || {
                for seq in 0..per_producer {
                    let level = [1, 5, 9][seq % 3];
                    queue.enqueue_at(tag(producer, seq), level).unwrap();
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let queue = queue.clone();
            let taken = taken.clone();
            thread::spawn(move || {
                let mut seen = Vec::new();
                while taken.load(Ordering::SeqCst) < total {
                    if let Some(value) = queue.dequeue().unwrap().into_found() {
                        taken.fetch_add(1, Ordering::SeqCst);
                        seen.push(value);
                    } else {
                        thread::yield_now();
                    }
                }
                seen
            })
        })
        .collect();

    for handle in producers {
        handle.join().unwrap();
    }
    let mut unique = HashSet::new();
    for handle in consumers {
        for value in handle.join().unwrap() {
            assert!(unique.insert(value), "element {} dequeued twice", value);
        }
    }

    assert_eq!(unique.len(), total);
    assert!(queue.is_empty());

    let found_dequeues = queue
        .history()
        .iter()
        .filter(|record| record.is_dequeue() && record.value != u64::MAX)
        .count();
    assert_eq!(found_dequeues, total);
    assert_eq!(queue.history_count(QueueAction::Enqueue), total);
}

/// C3. Level Churn Alongside Traffic Keeps The Queue Consistent
#[test]
fn test_level_churn_during_traffic() {
    let queue = create_shared_queue(&[1]);

    let churn = {
        let queue = queue.clone();
        thread::spawn(move || {
            for round in 0..500 {
                let level = 100 + (round % 10) as Level;
                queue.add_level(level);
                let _ = queue.delete_level(level);
            }
        })
    };
    let producer = {
        let queue = queue.clone();
        thread::spawn(move || {
            for seq in 0..5_000 {
                queue.enqueue(seq as u64).unwrap();
            }
        })
    };

    churn.join().unwrap();
    producer.join().unwrap();

    // Level 1 is never deleted and stays the minimum
    assert_eq!(queue.len_of(1), 5_000);
    let metrics = queue.metrics();
    assert!(metrics.levels_deleted <= metrics.levels_added);
}

/// C4. History Order Is Commit Order
#[test]
fn test_history_follows_commit_order() {
    for _ in 0..20 {
        let queue = create_shared_queue(&[1]);
        let per_producer = 500;
        let total = 4 * per_producer;
        let taken = Arc::new(AtomicUsize::new(0));

        let producers: Vec<_> = (0..4)
            .map(|producer| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for seq in 0..per_producer {
                        queue.enqueue_at(tag(producer, seq), 1).unwrap();
                    }
                })
            })
            .collect();
        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let queue = queue.clone();
                let taken = taken.clone();
                thread::spawn(move || {
                    while taken.load(Ordering::SeqCst) < total {
                        if queue.dequeue().unwrap().is_found() {
                            taken.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();
        for handle in producers.into_iter().chain(consumers) {
            handle.join().unwrap();
        }

        // Every element is recorded as enqueued before it is recorded as dequeued
        let mut enqueued = HashSet::new();
        let mut enqueue_order = Vec::new();
        let mut dequeue_order = Vec::new();
        for record in queue.history() {
            if record.value == u64::MAX {
                continue;
            }
            match record.action {
                QueueAction::Enqueue => {
                    enqueued.insert(record.value);
                    enqueue_order.push(record.value);
                }
                QueueAction::Dequeue => {
                    assert!(
                        enqueued.contains(&record.value),
                        "element {} dequeued before its enqueue was recorded",
                        record.value
                    );
                    dequeue_order.push(record.value);
                }
            }
        }

        // One level, so the log replays the bucket's FIFO exactly
        assert_eq!(dequeue_order, enqueue_order);
    }
}
