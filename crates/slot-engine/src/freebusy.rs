//! Compute a participant's free intervals from their busy periods.
//!
//! Busy periods are merged, clipped to the query range, and the gaps between
//! them inside the range are returned as free intervals.

use std::collections::BTreeMap;

use crate::interval::{merge_intervals, BusyInterval, TimeInterval};

/// Merge busy intervals and clip them to `range`.
///
/// Entries entirely outside the range are discarded; entries that straddle a
/// boundary are truncated to it. Returns an empty list for a degenerate range.
pub fn clip_to_range(busy: &[TimeInterval], range: &TimeInterval) -> Vec<TimeInterval> {
    if !range.is_valid() {
        return Vec::new();
    }

    merge_intervals(busy)
        .into_iter()
        .filter(|b| b.start < range.end && b.end > range.start)
        .map(|b| TimeInterval {
            start: b.start.max(range.start),
            end: b.end.min(range.end),
        })
        .collect()
}

/// Find the free intervals inside `range` given a list of busy intervals.
///
/// The busy list does not need to be sorted or merged. A degenerate range
/// (`end <= start`) yields no free time rather than an error.
pub fn free_intervals(range: &TimeInterval, busy: &[TimeInterval]) -> Vec<TimeInterval> {
    if !range.is_valid() {
        return Vec::new();
    }

    let clipped = clip_to_range(busy, range);

    let mut free = Vec::with_capacity(clipped.len() + 1);
    let mut cursor = range.start;

    for b in &clipped {
        if cursor < b.start {
            free.push(TimeInterval {
                start: cursor,
                end: b.start,
            });
        }
        cursor = cursor.max(b.end);
    }

    // Trailing gap after the last busy block.
    if cursor < range.end {
        free.push(TimeInterval {
            start: cursor,
            end: range.end,
        });
    }

    free
}

/// Group tagged busy intervals by participant and compute each one's free time.
///
/// Only participants that appear in `busy` are present in the result; a
/// participant whose busy periods cover the whole range maps to an empty list.
pub fn free_intervals_by_participant(
    range: &TimeInterval,
    busy: &[BusyInterval],
) -> BTreeMap<String, Vec<TimeInterval>> {
    let mut grouped: BTreeMap<String, Vec<TimeInterval>> = BTreeMap::new();
    for b in busy {
        grouped
            .entry(b.participant_id.clone())
            .or_default()
            .push(b.interval);
    }

    grouped
        .into_iter()
        .map(|(participant, intervals)| {
            let free = free_intervals(range, &intervals);
            (participant, free)
        })
        .collect()
}
