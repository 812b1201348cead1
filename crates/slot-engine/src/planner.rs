//! Per-request orchestration of the slot pipeline.
//!
//! [`plan_invite`] is what a participant opening an invite triggers: their
//! calendar is read and complemented over the event period, combined with
//! everyone's stored submissions, intersected, filtered, and numbered. The
//! participant's fresh calendar-derived free time can optionally be written
//! back to storage.

use std::collections::BTreeMap;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::freebusy::free_intervals;
use crate::interval::TimeInterval;
use crate::overlap::common_windows_with_min;
use crate::parse::{parse_busy_periods, parse_range};
use crate::ports::{AvailabilityStore, CalendarSource};
use crate::slots::{assemble_slots, build_summary, CandidateSlot, EventDetails, InviteResponse};
use crate::submission::{
    calendar_submissions, distinct_participants, group_by_participant,
    replace_calendar_submissions,
};

/// A participant asking for the candidate slots of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteRequest {
    pub event_id: i64,
    pub event: EventDetails,
    pub participant_id: String,
    /// Write the participant's calendar-derived free time back to storage.
    #[serde(default)]
    pub persist: bool,
}

/// An invite request as callers submit it, with the event period still in
/// text form (RFC 3339 or bare `YYYY-MM-DD` dates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInviteRequest {
    pub event_id: i64,
    pub participant_id: String,
    pub event: RawEventDetails,
    #[serde(default)]
    pub persist: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEventDetails {
    pub name: String,
    #[serde(default)]
    pub memo: String,
    pub period_start: String,
    pub period_end: String,
    /// Falls back to the caller's default when absent.
    #[serde(default)]
    pub duration_min: Option<i64>,
}

impl RawInviteRequest {
    /// Resolve the event period in `tz` and apply `default_duration_min` when
    /// the request carries no duration.
    pub fn resolve(self, tz: Tz, default_duration_min: i64) -> Result<InviteRequest> {
        let period = parse_range(&self.event.period_start, &self.event.period_end, tz)?;
        Ok(InviteRequest {
            event_id: self.event_id,
            event: EventDetails {
                name: self.event.name,
                memo: self.event.memo,
                period_start: period.start,
                period_end: period.end,
                duration_min: self.event.duration_min.unwrap_or(default_duration_min),
            },
            participant_id: self.participant_id,
            persist: self.persist,
        })
    }
}

/// Result of [`plan_invite`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub response: InviteResponse,
    /// The requesting participant's free intervals derived from their calendar.
    pub participant_free: Vec<TimeInterval>,
    /// Busy periods dropped because they could not be decoded.
    pub skipped_busy: usize,
    /// Stored submissions dropped because they could not be decoded.
    pub skipped_stored: usize,
}

/// Intersect, filter and number the common free time of a participant map.
///
/// Every slot's participant count is the number of participants in the map.
pub fn candidate_slots(
    free_by_participant: &BTreeMap<String, Vec<TimeInterval>>,
    min_duration_minutes: i64,
    tz: Tz,
) -> Vec<CandidateSlot> {
    let windows = common_windows_with_min(free_by_participant, min_duration_minutes);
    assemble_slots(&windows, free_by_participant.len(), tz)
}

/// Build the invite response for `request.participant_id`.
///
/// The participant's previously stored calendar-derived rows are superseded by
/// the free time computed from `calendar` now; their manual rows still count.
/// Collaborator errors are returned as is and nothing is retried.
pub fn plan_invite<C, S>(
    request: &InviteRequest,
    tz: Tz,
    calendar: &C,
    store: &S,
) -> Result<PlanOutcome>
where
    C: CalendarSource + ?Sized,
    S: AvailabilityStore + ?Sized,
{
    let participant = request.participant_id.as_str();
    let range = request.event.period();

    let stored = store.list_submissions(request.event_id)?;
    debug!(event_id = request.event_id, rows = stored.len(), "loaded stored submissions");

    let raw = calendar.busy_periods(participant, &range)?;
    let report = parse_busy_periods(participant, &raw, tz);
    let participant_free = free_intervals(&range, &report.time_intervals());
    debug!(
        participant,
        busy = report.intervals.len(),
        skipped = report.skipped.len(),
        free = participant_free.len(),
        "derived participant free time"
    );

    let retained = replace_calendar_submissions(&stored, participant, Vec::new());
    let grouped = group_by_participant(&retained);
    let mut free_by_participant = grouped.free_by_participant;
    free_by_participant
        .entry(participant.to_string())
        .or_default()
        .extend(participant_free.iter().copied());

    let slots = candidate_slots(&free_by_participant, request.event.duration_min, tz);

    if request.persist {
        let rows = calendar_submissions(participant, &participant_free, tz);
        store.replace_calendar_submissions(request.event_id, participant, rows)?;
    }

    let voted = distinct_participants(&retained, [participant]);

    info!(
        event_id = request.event_id,
        participants = free_by_participant.len(),
        slots = slots.len(),
        "planned invite"
    );

    Ok(PlanOutcome {
        response: InviteResponse {
            summary: build_summary(&request.event, voted),
            slots,
        },
        participant_free,
        skipped_busy: report.skipped.len(),
        skipped_stored: grouped.skipped.len(),
    })
}
