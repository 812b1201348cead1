//! Tests for busy → free complement computation.

use chrono::{TimeZone, Utc};
use slot_engine::freebusy::{clip_to_range, free_intervals, free_intervals_by_participant};
use slot_engine::interval::{BusyInterval, TimeInterval};

/// Helper to create an interval from hour ranges on a given day.
fn interval(
    year: i32,
    month: u32,
    day: u32,
    start_hour: u32,
    start_min: u32,
    end_hour: u32,
    end_min: u32,
) -> TimeInterval {
    TimeInterval {
        start: Utc
            .with_ymd_and_hms(year, month, day, start_hour, start_min, 0)
            .unwrap(),
        end: Utc
            .with_ymd_and_hms(year, month, day, end_hour, end_min, 0)
            .unwrap(),
    }
}

/// Helper: 08:00–17:00 on 2026-03-01.
fn workday() -> TimeInterval {
    interval(2026, 3, 1, 8, 0, 17, 0)
}

#[test]
fn single_busy_period_produces_two_free_intervals() {
    // Range: 08:00-17:00, busy: 10:00-11:00
    // Expected free: 08:00-10:00, 11:00-17:00
    let busy = vec![interval(2026, 3, 1, 10, 0, 11, 0)];

    let free = free_intervals(&workday(), &busy);

    assert_eq!(free.len(), 2, "single busy period should produce 2 free intervals");
    assert_eq!(free[0], interval(2026, 3, 1, 8, 0, 10, 0));
    assert_eq!(free[0].duration_minutes(), 120);
    assert_eq!(free[1], interval(2026, 3, 1, 11, 0, 17, 0));
    assert_eq!(free[1].duration_minutes(), 360);
}

#[test]
fn no_busy_periods_returns_whole_range() {
    let free = free_intervals(&workday(), &[]);
    assert_eq!(free, vec![workday()]);
}

#[test]
fn busy_outside_range_returns_whole_range() {
    let busy = vec![
        interval(2026, 3, 1, 5, 0, 7, 0),
        interval(2026, 3, 1, 18, 0, 20, 0),
    ];
    let free = free_intervals(&workday(), &busy);
    assert_eq!(free, vec![workday()]);
}

#[test]
fn overlapping_busy_periods_are_merged_first() {
    // 09:00-11:00 and 10:00-12:00 → busy 09:00-12:00
    let busy = vec![
        interval(2026, 3, 1, 10, 0, 12, 0),
        interval(2026, 3, 1, 9, 0, 11, 0),
    ];
    let free = free_intervals(&workday(), &busy);
    assert_eq!(
        free,
        vec![
            interval(2026, 3, 1, 8, 0, 9, 0),
            interval(2026, 3, 1, 12, 0, 17, 0),
        ]
    );
}

#[test]
fn touching_busy_periods_leave_no_sliver() {
    let busy = vec![
        interval(2026, 3, 1, 9, 0, 10, 0),
        interval(2026, 3, 1, 10, 0, 11, 0),
    ];
    let free = free_intervals(&workday(), &busy);
    assert_eq!(
        free,
        vec![
            interval(2026, 3, 1, 8, 0, 9, 0),
            interval(2026, 3, 1, 11, 0, 17, 0),
        ]
    );
}

#[test]
fn busy_straddling_range_edges_is_truncated() {
    let busy = vec![
        interval(2026, 3, 1, 7, 0, 9, 30),
        interval(2026, 3, 1, 16, 30, 18, 0),
    ];
    let free = free_intervals(&workday(), &busy);
    assert_eq!(free, vec![interval(2026, 3, 1, 9, 30, 16, 30)]);

    let clipped = clip_to_range(&busy, &workday());
    assert_eq!(clipped[0].start, workday().start);
    assert_eq!(clipped[1].end, workday().end);
}

#[test]
fn busy_covering_whole_range_leaves_nothing() {
    let busy = vec![interval(2026, 3, 1, 0, 0, 23, 0)];
    assert!(free_intervals(&workday(), &busy).is_empty());
}

#[test]
fn busy_starting_at_range_start_has_no_leading_gap() {
    let busy = vec![interval(2026, 3, 1, 8, 0, 9, 0)];
    let free = free_intervals(&workday(), &busy);
    assert_eq!(free, vec![interval(2026, 3, 1, 9, 0, 17, 0)]);
}

#[test]
fn degenerate_range_is_empty_not_error() {
    let inverted = TimeInterval {
        start: workday().end,
        end: workday().start,
    };
    assert!(free_intervals(&inverted, &[]).is_empty());

    let zero = TimeInterval {
        start: workday().start,
        end: workday().start,
    };
    assert!(free_intervals(&zero, &[interval(2026, 3, 1, 9, 0, 10, 0)]).is_empty());
}

#[test]
fn degenerate_busy_periods_are_ignored() {
    let busy = vec![interval(2026, 3, 1, 10, 0, 10, 0)];
    assert_eq!(free_intervals(&workday(), &busy), vec![workday()]);
}

#[test]
fn free_intervals_are_grouped_per_participant() {
    let busy = vec![
        BusyInterval {
            participant_id: "alice".to_string(),
            interval: interval(2026, 3, 1, 9, 0, 10, 0),
        },
        BusyInterval {
            participant_id: "bob".to_string(),
            interval: interval(2026, 3, 1, 8, 0, 17, 0),
        },
        BusyInterval {
            participant_id: "alice".to_string(),
            interval: interval(2026, 3, 1, 12, 0, 13, 0),
        },
    ];

    let by_participant = free_intervals_by_participant(&workday(), &busy);

    assert_eq!(by_participant.len(), 2);
    assert_eq!(by_participant["alice"].len(), 3);
    assert!(by_participant["bob"].is_empty(), "bob is busy all day");
}
