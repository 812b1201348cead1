//! Turn common windows into numbered candidate slots and the invite summary.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::interval::TimeInterval;

/// Date label format used for slots and stored submissions.
pub const DATE_LABEL_FORMAT: &str = "%Y-%m-%d";

/// A user-facing candidate meeting slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSlot {
    /// 1-based sequence number in discovery order.
    pub id: usize,
    /// Calendar date of `start` in the reference zone, e.g. `"2025-08-01"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Number of participants that are all free during this slot.
    pub participant_count: usize,
}

/// The event an invite is being built for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    pub name: String,
    #[serde(default)]
    pub memo: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    /// Required meeting length in minutes. Zero or less means no minimum.
    #[serde(default)]
    pub duration_min: i64,
}

impl EventDetails {
    /// The event period as a query range. May be degenerate.
    pub fn period(&self) -> TimeInterval {
        TimeInterval {
            start: self.period_start,
            end: self.period_end,
        }
    }
}

/// Summary that accompanies the candidate slot list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteSummary {
    pub event_name: String,
    pub voted_count: usize,
    pub memo: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub duration_min: i64,
}

/// Everything the presentation layer needs to render an invite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteResponse {
    pub summary: InviteSummary,
    pub slots: Vec<CandidateSlot>,
}

/// Number windows 1..N in the order given and label each with its start date
/// in `tz`.
pub fn assemble_slots(
    windows: &[TimeInterval],
    participant_count: usize,
    tz: Tz,
) -> Vec<CandidateSlot> {
    windows
        .iter()
        .enumerate()
        .map(|(i, window)| CandidateSlot {
            id: i + 1,
            date: Some(date_label(window.start, tz)),
            start: window.start,
            end: window.end,
            participant_count,
        })
        .collect()
}

pub fn build_summary(event: &EventDetails, voted_count: usize) -> InviteSummary {
    InviteSummary {
        event_name: event.name.clone(),
        voted_count,
        memo: event.memo.clone(),
        period_start: event.period_start,
        period_end: event.period_end,
        duration_min: event.duration_min,
    }
}

/// Format an instant as a calendar date in `tz`.
pub fn date_label(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(DATE_LABEL_FORMAT).to_string()
}
