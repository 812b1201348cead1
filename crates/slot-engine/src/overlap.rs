//! Multi-participant intersection of free time via a sweep line.
//!
//! Every participant's free intervals are turned into start/end events. The
//! events are swept in time order while tracking which participants are
//! currently free; whenever all of them are free at once, that stretch is a
//! common window.
//!
//! Runs in O(n log n) in the total number of interval endpoints.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::filter::filter_by_duration;
use crate::interval::{merge_intervals, TimeInterval};

/// Whether an event opens or closes a participant's free interval.
///
/// The derived ordering ranks `End` before `Start`, which is the tie-break the
/// sweep depends on: at equal timestamps a participant's window is closed
/// before any window is (re)opened at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    End,
    Start,
}

#[derive(Debug, Clone, Copy)]
struct SweepEvent {
    time: DateTime<Utc>,
    kind: EventKind,
    participant: usize,
}

/// Find the windows during which every participant in `free_by_participant`
/// is free at the same time.
///
/// Each participant's list is merged first, so it may be unsorted or contain
/// overlaps. An empty map yields no windows, and a participant with no free
/// intervals blocks every window.
pub fn common_free_windows(
    free_by_participant: &BTreeMap<String, Vec<TimeInterval>>,
) -> Vec<TimeInterval> {
    let total = free_by_participant.len();
    if total == 0 {
        return Vec::new();
    }

    let mut events: Vec<SweepEvent> = Vec::new();
    for (index, intervals) in free_by_participant.values().enumerate() {
        for interval in merge_intervals(intervals) {
            events.push(SweepEvent {
                time: interval.start,
                kind: EventKind::Start,
                participant: index,
            });
            events.push(SweepEvent {
                time: interval.end,
                kind: EventKind::End,
                participant: index,
            });
        }
    }

    events.sort_by_key(|e| (e.time, e.kind));

    let mut active = vec![false; total];
    let mut active_count = 0usize;
    let mut window_start: Option<DateTime<Utc>> = None;
    let mut windows = Vec::new();

    for event in &events {
        if active_count == total {
            if let Some(start) = window_start {
                if let Some(window) = TimeInterval::new(start, event.time) {
                    windows.push(window);
                }
            }
        }

        match event.kind {
            EventKind::Start => {
                if !active[event.participant] {
                    active[event.participant] = true;
                    active_count += 1;
                }
            }
            EventKind::End => {
                if active[event.participant] {
                    active[event.participant] = false;
                    active_count -= 1;
                }
            }
        }

        window_start = (active_count == total).then_some(event.time);
    }

    debug!(
        participants = total,
        events = events.len(),
        windows = windows.len(),
        "swept common free windows"
    );

    windows
}

/// Like [`common_free_windows`], keeping only windows of at least
/// `min_duration_minutes`. A non-positive minimum keeps everything.
pub fn common_windows_with_min(
    free_by_participant: &BTreeMap<String, Vec<TimeInterval>>,
    min_duration_minutes: i64,
) -> Vec<TimeInterval> {
    filter_by_duration(common_free_windows(free_by_participant), min_duration_minutes)
}

/// Check whether `window` is covered by one of each participant's free
/// intervals. Used to verify sweep output.
pub fn all_free_during(
    free_by_participant: &BTreeMap<String, Vec<TimeInterval>>,
    window: &TimeInterval,
) -> bool {
    !free_by_participant.is_empty()
        && free_by_participant.values().all(|intervals| {
            merge_intervals(intervals)
                .iter()
                .any(|free| free.contains(window))
        })
}
