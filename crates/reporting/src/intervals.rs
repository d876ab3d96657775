//! Interval merging for window timelines.

use serde::{Deserialize, Serialize};

/// A `[start, end]` span in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: i64,
    pub end: i64,
}

impl TimeInterval {
    /// Inverted bounds collapse to a zero-length interval at `start`.
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn duration_ms(&self) -> i64 {
        (self.end - self.start).max(0)
    }
}

/// Merge overlapping or touching intervals into the minimal sorted set of
/// disjoint intervals covering the same union.
pub fn merge_intervals(mut intervals: Vec<TimeInterval>) -> Vec<TimeInterval> {
    for interval in intervals.iter_mut() {
        interval.end = interval.end.max(interval.start);
    }
    intervals.sort_by_key(|i| i.start);

    let mut merged: Vec<TimeInterval> = Vec::with_capacity(intervals.len());
    for current in intervals {
        match merged.last_mut() {
            Some(last) if current.start <= last.end => {
                last.end = last.end.max(current.end);
            }
            _ => merged.push(current),
        }
    }
    merged
}

/// Total milliseconds covered by a set of intervals.
pub fn total_duration_ms(intervals: &[TimeInterval]) -> i64 {
    intervals.iter().map(TimeInterval::duration_ms).sum()
}
