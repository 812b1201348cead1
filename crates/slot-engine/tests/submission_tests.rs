//! Tests for stored submissions, replace rules and the in-memory store.

use chrono::{TimeZone, Utc};
use slot_engine::interval::TimeInterval;
use slot_engine::ports::{AvailabilityStore, MemoryStore};
use slot_engine::submission::{
    calendar_submissions, distinct_participants, group_by_participant,
    replace_calendar_submissions, AvailabilitySubmission, SubmissionSource,
};
use slot_engine::SlotError;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn row(
    participant: &str,
    start: &str,
    end: &str,
    source: SubmissionSource,
) -> AvailabilitySubmission {
    AvailabilitySubmission {
        participant_id: participant.to_string(),
        available_date: start.get(..10).unwrap_or_default().to_string(),
        start: start.to_string(),
        end: end.to_string(),
        source,
    }
}

fn calendar(participant: &str, start: &str, end: &str) -> AvailabilitySubmission {
    row(participant, start, end, SubmissionSource::Calendar)
}

fn manual(participant: &str, start: &str, end: &str) -> AvailabilitySubmission {
    row(participant, start, end, SubmissionSource::Manual)
}

fn interval(day: u32, start_hour: u32, end_hour: u32) -> TimeInterval {
    TimeInterval {
        start: Utc.with_ymd_and_hms(2025, 8, day, start_hour, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2025, 8, day, end_hour, 0, 0).unwrap(),
    }
}

// ── Conversion ──────────────────────────────────────────────────────────────

#[test]
fn calendar_submissions_carry_date_label_and_rfc3339_endpoints() {
    let tokyo: chrono_tz::Tz = "Asia/Tokyo".parse().unwrap();
    let rows = calendar_submissions("alice", &[interval(1, 20, 22)], tokyo);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].participant_id, "alice");
    assert_eq!(rows[0].available_date, "2025-08-02");
    assert_eq!(rows[0].start, "2025-08-01T20:00:00Z");
    assert_eq!(rows[0].end, "2025-08-01T22:00:00Z");
    assert_eq!(rows[0].source, SubmissionSource::Calendar);
    assert_eq!(rows[0].interval(), Some(interval(1, 20, 22)));
}

#[test]
fn source_serializes_lowercase() {
    let json = serde_json::to_string(&SubmissionSource::Manual).unwrap();
    assert_eq!(json, "\"manual\"");
}

// ── Grouping ────────────────────────────────────────────────────────────────

#[test]
fn grouping_collects_rows_per_participant_and_skips_bad_rows() {
    let rows = vec![
        calendar("alice", "2025-08-01T09:00:00Z", "2025-08-01T10:00:00Z"),
        calendar("bob", "2025-08-01T09:00:00Z", "2025-08-01T12:00:00Z"),
        manual("alice", "2025-08-02T09:00:00Z", "2025-08-02T10:00:00Z"),
        calendar("carol", "garbage", "2025-08-01T10:00:00Z"),
    ];

    let grouped = group_by_participant(&rows);

    assert_eq!(grouped.free_by_participant.len(), 2);
    assert_eq!(grouped.free_by_participant["alice"].len(), 2);
    assert_eq!(grouped.free_by_participant["bob"].len(), 1);
    assert!(!grouped.free_by_participant.contains_key("carol"));
    assert_eq!(grouped.skipped.len(), 1);
    assert_eq!(grouped.skipped[0].index, 3);
}

#[test]
fn distinct_participants_counts_each_once() {
    let rows = vec![
        calendar("alice", "2025-08-01T09:00:00Z", "2025-08-01T10:00:00Z"),
        manual("alice", "2025-08-02T09:00:00Z", "2025-08-02T10:00:00Z"),
        calendar("bob", "2025-08-01T09:00:00Z", "2025-08-01T12:00:00Z"),
    ];
    assert_eq!(distinct_participants(&rows, []), 2);
    assert_eq!(distinct_participants(&[], []), 0);
}

#[test]
fn distinct_participants_includes_extra_names_once() {
    let rows = vec![calendar("bob", "2025-08-01T09:00:00Z", "2025-08-01T12:00:00Z")];
    assert_eq!(distinct_participants(&rows, ["alice"]), 2);
    assert_eq!(distinct_participants(&rows, ["bob"]), 1);
    assert_eq!(distinct_participants(&[], ["alice"]), 1);
}

// ── Replace rules ───────────────────────────────────────────────────────────

#[test]
fn replace_drops_only_that_participants_calendar_rows() {
    let existing = vec![
        calendar("alice", "2025-08-01T09:00:00Z", "2025-08-01T10:00:00Z"),
        manual("alice", "2025-08-02T09:00:00Z", "2025-08-02T10:00:00Z"),
        calendar("bob", "2025-08-01T09:00:00Z", "2025-08-01T12:00:00Z"),
    ];
    let fresh = vec![calendar("alice", "2025-08-03T09:00:00Z", "2025-08-03T17:00:00Z")];

    let replaced = replace_calendar_submissions(&existing, "alice", fresh.clone());

    assert_eq!(replaced.len(), 3);
    assert_eq!(replaced[0], existing[1], "manual entry is preserved");
    assert_eq!(replaced[1], existing[2], "other participants untouched");
    assert_eq!(replaced[2], fresh[0]);
}

#[test]
fn replace_with_empty_list_clears_calendar_rows() {
    let existing = vec![calendar("alice", "2025-08-01T09:00:00Z", "2025-08-01T10:00:00Z")];
    assert!(replace_calendar_submissions(&existing, "alice", Vec::new()).is_empty());
}

// ── MemoryStore ─────────────────────────────────────────────────────────────

#[test]
fn memory_store_lists_rows_per_event() {
    let store = MemoryStore::with_submissions(
        7,
        vec![calendar("alice", "2025-08-01T09:00:00Z", "2025-08-01T10:00:00Z")],
    );

    assert_eq!(store.list_submissions(7).unwrap().len(), 1);
    assert!(store.list_submissions(8).unwrap().is_empty());
}

#[test]
fn memory_store_replace_preserves_manual_rows() {
    let store = MemoryStore::with_submissions(
        7,
        vec![
            calendar("alice", "2025-08-01T09:00:00Z", "2025-08-01T10:00:00Z"),
            manual("alice", "2025-08-02T09:00:00Z", "2025-08-02T10:00:00Z"),
        ],
    );

    store
        .replace_calendar_submissions(
            7,
            "alice",
            vec![calendar("alice", "2025-08-05T09:00:00Z", "2025-08-05T10:00:00Z")],
        )
        .unwrap();

    let rows = store.list_submissions(7).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].source, SubmissionSource::Manual);
    assert_eq!(rows[1].start, "2025-08-05T09:00:00Z");
}

#[test]
fn memory_store_rejected_replace_leaves_rows_untouched() {
    let original = vec![calendar("alice", "2025-08-01T09:00:00Z", "2025-08-01T10:00:00Z")];
    let store = MemoryStore::with_submissions(7, original.clone());

    let err = store
        .replace_calendar_submissions(
            7,
            "alice",
            vec![calendar("mallory", "2025-08-05T09:00:00Z", "2025-08-05T10:00:00Z")],
        )
        .unwrap_err();

    assert!(matches!(err, SlotError::Storage(_)));
    assert_eq!(store.list_submissions(7).unwrap(), original);
}
