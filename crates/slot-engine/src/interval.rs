//! Half-open time intervals and interval normalization.
//!
//! Every stage of the slot pipeline works on [`TimeInterval`] values with
//! `[start, end)` semantics. [`merge_intervals`] collapses an arbitrary list
//! into the minimal sorted, disjoint form the later stages rely on.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A half-open time interval `[start, end)`.
///
/// An interval is valid only when `end > start`. Zero-length and inverted
/// intervals can be constructed through the public fields but are dropped by
/// every pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    /// Build an interval, returning `None` when `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        let interval = Self { start, end };
        interval.is_valid().then_some(interval)
    }

    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Length in whole minutes, truncated toward zero.
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// True when `other` lies entirely inside this interval.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when the two intervals share at least one instant.
    ///
    /// Touching intervals (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A busy interval tagged with the participant it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub participant_id: String,
    pub interval: TimeInterval,
}

/// Merge overlapping or touching intervals into a sorted, disjoint list.
///
/// Degenerate intervals are discarded first. The sort is stable, and an
/// interval is absorbed into the current one when `next.start <= current.end`,
/// so back-to-back periods such as `[09:00, 10:00)` and `[10:00, 11:00)`
/// become a single `[09:00, 11:00)` block with no gap at 10:00.
pub fn merge_intervals(intervals: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut sorted: Vec<TimeInterval> = intervals
        .iter()
        .copied()
        .filter(TimeInterval::is_valid)
        .collect();

    if sorted.is_empty() {
        return Vec::new();
    }

    sorted.sort_by_key(|interval| interval.start);

    let mut merged: Vec<TimeInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(current) = merged.last_mut() {
            if interval.start <= current.end {
                current.end = current.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}
