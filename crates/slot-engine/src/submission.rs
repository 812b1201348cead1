//! Stored free-time submissions and the rules for replacing them.
//!
//! A submission is one free interval a participant offered for an event,
//! either derived from their calendar or entered by hand. Storage owns these
//! records; this module only converts them to and from intervals and decides
//! which rows a resubmission replaces.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interval::TimeInterval;
use crate::parse::SkippedEntry;
use crate::slots::date_label;

/// Where a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionSource {
    /// Derived from the participant's calendar; replaced on resubmission.
    #[default]
    Calendar,
    /// Entered by hand; never replaced by a calendar resubmission.
    Manual,
}

/// A participant's stored free-time offer for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySubmission {
    pub participant_id: String,
    /// `YYYY-MM-DD` of `start` in the reference zone.
    pub available_date: String,
    /// RFC 3339 timestamp.
    pub start: String,
    /// RFC 3339 timestamp.
    pub end: String,
    #[serde(default)]
    pub source: SubmissionSource,
}

impl AvailabilitySubmission {
    pub fn from_interval(
        participant_id: &str,
        interval: &TimeInterval,
        tz: Tz,
        source: SubmissionSource,
    ) -> Self {
        Self {
            participant_id: participant_id.to_string(),
            available_date: date_label(interval.start, tz),
            start: interval.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end: interval.end.to_rfc3339_opts(SecondsFormat::Secs, true),
            source,
        }
    }

    /// Decode the stored endpoints. Returns `None` when either is not valid
    /// RFC 3339 or the interval is empty.
    pub fn interval(&self) -> Option<TimeInterval> {
        let start = DateTime::parse_from_rfc3339(&self.start).ok()?;
        let end = DateTime::parse_from_rfc3339(&self.end).ok()?;
        TimeInterval::new(start.with_timezone(&Utc), end.with_timezone(&Utc))
    }
}

/// Build calendar-sourced submissions for a participant's free intervals.
pub fn calendar_submissions(
    participant_id: &str,
    free: &[TimeInterval],
    tz: Tz,
) -> Vec<AvailabilitySubmission> {
    free.iter()
        .map(|interval| {
            let source = SubmissionSource::Calendar;
            AvailabilitySubmission::from_interval(participant_id, interval, tz, source)
        })
        .collect()
}

/// Stored submissions decoded into a per-participant interval map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedSubmissions {
    pub free_by_participant: BTreeMap<String, Vec<TimeInterval>>,
    pub skipped: Vec<SkippedEntry>,
}

/// Group stored submissions by participant, decoding their endpoints.
///
/// Rows with unparseable endpoints are skipped. A participant only appears in
/// the map once one of their rows decodes.
pub fn group_by_participant(submissions: &[AvailabilitySubmission]) -> GroupedSubmissions {
    let mut grouped = GroupedSubmissions::default();

    for (index, submission) in submissions.iter().enumerate() {
        match submission.interval() {
            Some(interval) => grouped
                .free_by_participant
                .entry(submission.participant_id.clone())
                .or_default()
                .push(interval),
            None => {
                warn!(
                    participant = %submission.participant_id,
                    index,
                    start = %submission.start,
                    end = %submission.end,
                    "skipping stored submission"
                );
                grouped.skipped.push(SkippedEntry {
                    index,
                    reason: format!(
                        "unparseable submission {} .. {}",
                        submission.start, submission.end
                    ),
                });
            }
        }
    }

    grouped
}

/// Apply a calendar resubmission to a set of stored rows.
///
/// Drops `participant_id`'s calendar-sourced rows, keeps every other row
/// (including that participant's manual entries) in order, and appends
/// `replacement`.
pub fn replace_calendar_submissions(
    existing: &[AvailabilitySubmission],
    participant_id: &str,
    replacement: Vec<AvailabilitySubmission>,
) -> Vec<AvailabilitySubmission> {
    existing
        .iter()
        .filter(|s| !(s.participant_id == participant_id && s.source == SubmissionSource::Calendar))
        .cloned()
        .chain(replacement)
        .collect()
}

/// Number of distinct participants among `submissions` and `extra`.
///
/// `extra` names participants that count even without a stored row, such as
/// the participant whose fresh submission has not been written yet.
pub fn distinct_participants<'a>(
    submissions: &'a [AvailabilitySubmission],
    extra: impl IntoIterator<Item = &'a str>,
) -> usize {
    submissions
        .iter()
        .map(|s| s.participant_id.as_str())
        .chain(extra)
        .collect::<BTreeSet<_>>()
        .len()
}
