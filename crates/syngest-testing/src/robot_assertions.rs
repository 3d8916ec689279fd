//! Assertion utilities for robot testing
//!
//! Helpers for validating completion order and the event stream a target
//! received.

use syngest_input::InputEvent;

use crate::recording::CompletionLog;

/// Assert that a value is within an expected range.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

/// Assert that completion callbacks ran for exactly `expected`, in order.
pub fn assert_completed_in_order(log: &CompletionLog, expected: &[&str], msg: &str) {
    let labels = log.labels();
    assert_eq!(
        labels, expected,
        "{}: completion order {:?}, expected {:?}",
        msg, labels, expected
    );
}

/// Assert that every recorded completion succeeded.
pub fn assert_all_succeeded(log: &CompletionLog, msg: &str) {
    for (label, result) in log.entries() {
        assert!(
            result.is_ok(),
            "{}: gesture '{}' failed with {:?}",
            msg,
            label,
            result
        );
    }
}

/// Assert that events grouped by `key` form contiguous runs, i.e. no two
/// gestures interleaved in the stream.
pub fn assert_not_interleaved<K, F>(events: &[InputEvent], key: F, msg: &str)
where
    K: PartialEq + std::fmt::Debug,
    F: Fn(&InputEvent) -> K,
{
    let mut finished: Vec<K> = Vec::new();
    let mut current: Option<K> = None;
    for (index, event) in events.iter().enumerate() {
        let k = key(event);
        if current.as_ref() == Some(&k) {
            continue;
        }
        assert!(
            !finished.contains(&k),
            "{}: event {} belongs to {:?}, which already gave way to another gesture",
            msg,
            index,
            k
        );
        if let Some(previous) = current.replace(k) {
            finished.push(previous);
        }
    }
}

/// Assert that a collection has an expected count.
pub fn assert_count<T>(items: &[T], expected: usize, msg: &str) {
    assert_eq!(
        items.len(),
        expected,
        "{}: expected {} items, found {}",
        msg,
        expected,
        items.len()
    );
}
