use proptest::prelude::*;

use levelq::{Level, Outcome, PriorityQueue, QueueAction, QueueError};

/// Test factory functions
fn create_shop_queue() -> PriorityQueue<String> {
    PriorityQueue::new([1, 11, 111], "NONE".to_string()).unwrap()
}

fn create_numeric_queue(levels: &[Level]) -> PriorityQueue<i64> {
    PriorityQueue::new(levels.iter().copied(), -1).unwrap()
}

/// Q1. Highest Level Is Served First
#[test]
fn test_priority_ordering_regardless_of_enqueue_order() {
    let orders: [[Level; 3]; 3] = [[1, 11, 111], [111, 1, 11], [11, 111, 1]];

    for order in orders {
        let queue = create_shop_queue();

        // Arrange: one element per level, in a different order each round
        for level in order {
            queue.enqueue_at(format!("task@{}", level), level).unwrap();
        }

        // Act + Assert: always 111, then 11, then 1
        for expected in [111, 11, 1] {
            let outcome = queue.dequeue().unwrap();
            assert_eq!(outcome, Outcome::found(format!("task@{}", expected), expected));
        }
    }
}

/// Q2. FIFO Within One Level
#[test]
fn test_fifo_within_level() {
    let queue = create_shop_queue();

    for name in ["first", "second", "third"] {
        queue.enqueue_at(name.to_string(), 11).unwrap();
    }

    assert_eq!(queue.full_bucket(11).unwrap(), vec!["first", "second", "third"]);
    assert_eq!(queue.dequeue_at(11).unwrap().into_value(), "first");
    assert_eq!(queue.dequeue_at(11).unwrap().into_value(), "second");
    assert_eq!(queue.dequeue_at(11).unwrap().into_value(), "third");
}

/// Q3. Empty Lookups Return The Sentinel And Are Recorded
#[test]
fn test_sentinel_on_empty() {
    let queue = create_shop_queue();

    let whole = queue.dequeue().unwrap();
    let single = queue.dequeue_at(11).unwrap();

    assert_eq!(whole, Outcome::empty("NONE".to_string()));
    assert_eq!(single, Outcome::empty_at("NONE".to_string(), 11));

    let history = queue.history();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|record| record.is_dequeue() && record.value == "NONE"));
    assert_eq!(history[0].priority, 0);
    assert_eq!(history[1].priority, 11);
}

/// Q7. A Real Element Equal To The Sentinel Stays Distinguishable
#[test]
fn test_element_equal_to_sentinel_is_found() {
    let queue = create_shop_queue();
    queue.enqueue_at("NONE".to_string(), 1).unwrap();

    let outcome = queue.dequeue().unwrap();
    assert!(outcome.is_found());
    assert_eq!(outcome.level(), 1);
    assert!(queue.dequeue().unwrap().is_empty());
}

/// Q4. Unknown Levels Are Provisioned On Enqueue
#[test]
fn test_level_auto_provision() {
    let queue = create_shop_queue();
    assert!(!queue.contains_level(42));

    queue.enqueue_at("fresh".to_string(), 42).unwrap();

    assert!(queue.levels().contains(&42));
    assert_eq!(queue.dequeue_at(42).unwrap(), Outcome::found("fresh".to_string(), 42));
}

/// Q5. Deleting A Level Drops Its Elements; Reuse Starts Empty
#[test]
fn test_delete_then_reuse() {
    let queue = create_shop_queue();
    queue.enqueue_at("old-1".to_string(), 11).unwrap();
    queue.enqueue_at("old-2".to_string(), 11).unwrap();

    queue.delete_level(11).unwrap();

    assert_eq!(queue.len_of(11), 0);
    assert!(!queue.contains_level(11));
    assert!(matches!(queue.dequeue_at(11), Err(QueueError::LevelNotFound(11))));

    queue.enqueue_at("new".to_string(), 11).unwrap();
    assert_eq!(queue.full_bucket(11).unwrap(), vec!["new"]);
}

/// Q6. History Holds Exactly One Record Per Call
#[test]
fn test_history_completeness() {
    let queue = create_numeric_queue(&[2, 4, 6]);

    for value in 0..10 {
        queue.enqueue_at(value, (value as Level % 3 + 1) * 2).unwrap();
    }
    for _ in 0..13 {
        queue.dequeue().unwrap();
    }

    assert_eq!(queue.history_count(QueueAction::Enqueue), 10);
    assert_eq!(queue.history_count(QueueAction::Dequeue), 13);
    assert_eq!(queue.history_len(), 23);

    let sentinel_dequeues = queue
        .history()
        .iter()
        .filter(|record| record.is_dequeue() && record.value == -1)
        .count();
    assert_eq!(sentinel_dequeues, 3);
}

/// E1. Three Levels, Three Tasks, One Sentinel
#[test]
fn test_end_to_end_scenario() {
    let queue = create_shop_queue();

    queue.enqueue_at("a".to_string(), 1).unwrap();
    queue.enqueue_at("b".to_string(), 111).unwrap();
    queue.enqueue_at("c".to_string(), 11).unwrap();

    let drained: Vec<(String, Level)> = (0..4)
        .map(|_| {
            let outcome = queue.dequeue().unwrap();
            let level = outcome.level();
            (outcome.into_value(), level)
        })
        .collect();

    assert_eq!(
        drained,
        vec![
            ("b".to_string(), 111),
            ("c".to_string(), 11),
            ("a".to_string(), 1),
            ("NONE".to_string(), 0),
        ]
    );
    assert_eq!(queue.history_len(), 7);

    let actions: Vec<QueueAction> = queue.history().iter().map(|record| record.action).collect();
    assert_eq!(actions[..3], [QueueAction::Enqueue; 3]);
    assert_eq!(actions[3..], [QueueAction::Dequeue; 4]);
}

/// E2. Default Priority Follows The Live Minimum
#[test]
fn test_default_priority_tracks_level_changes() {
    let queue = create_shop_queue();

    assert_eq!(queue.enqueue("x".to_string()).unwrap(), 1);
    queue.delete_level(1).unwrap();
    assert_eq!(queue.enqueue("y".to_string()).unwrap(), 11);
    queue.add_level(5);
    assert_eq!(queue.enqueue("z".to_string()).unwrap(), 5);
}

proptest! {
    /// Dequeued levels never increase over generated workloads
    #[test]
    fn prop_dequeue_levels_never_increase(
        pushes in prop::collection::vec((0i64..1000, 1u32..8), 1..64)
    ) {
        let queue = create_numeric_queue(&[1]);
        for (value, level) in &pushes {
            queue.enqueue_at(*value, *level).unwrap();
        }

        let mut last = Level::MAX;
        for _ in 0..pushes.len() {
            let outcome = queue.dequeue().unwrap();
            prop_assert!(outcome.is_found());
            prop_assert!(outcome.level() <= last);
            last = outcome.level();
        }
        prop_assert!(queue.dequeue().unwrap().is_empty());
    }

    /// Each level drains in append order over generated workloads
    #[test]
    fn prop_each_level_drains_in_append_order(
        pushes in prop::collection::vec((0i64..1000, 1u32..5), 1..64)
    ) {
        let queue = create_numeric_queue(&[1, 2, 3, 4]);
        for (value, level) in &pushes {
            queue.enqueue_at(*value, *level).unwrap();
        }

        for level in 1..5u32 {
            let expected: Vec<i64> = pushes
                .iter()
                .filter(|(_, l)| *l == level)
                .map(|(value, _)| *value)
                .collect();
            let mut drained = Vec::new();
            while let Some(value) = queue.dequeue_at(level).unwrap().into_found() {
                drained.push(value);
            }
            prop_assert_eq!(drained, expected);
        }
    }
}
