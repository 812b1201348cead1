//! Collaborator interfaces consumed by the invite planner.
//!
//! The engine never talks to a calendar provider or a database itself.
//! Callers hand it implementations of [`CalendarSource`] and
//! [`AvailabilityStore`]; any error those return is propagated unchanged.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Result, SlotError};
use crate::interval::TimeInterval;
use crate::parse::RawPeriod;
use crate::submission::{replace_calendar_submissions, AvailabilitySubmission};

/// Source of a participant's busy periods.
pub trait CalendarSource: Send + Sync {
    /// Return the busy periods overlapping `range`, in any order.
    ///
    /// Entries may extend past the range; the planner clips them.
    fn busy_periods(&self, participant_id: &str, range: &TimeInterval) -> Result<Vec<RawPeriod>>;
}

/// Durable storage for availability submissions.
pub trait AvailabilityStore: Send + Sync {
    /// All submissions for an event, from every participant.
    fn list_submissions(&self, event_id: i64) -> Result<Vec<AvailabilitySubmission>>;

    /// Replace `participant_id`'s calendar-sourced submissions for an event
    /// with `submissions`, leaving manual entries untouched.
    ///
    /// Must be atomic: on error the previously stored rows remain as they were.
    fn replace_calendar_submissions(
        &self,
        event_id: i64,
        participant_id: &str,
        submissions: Vec<AvailabilitySubmission>,
    ) -> Result<()>;
}

/// A calendar backed by fixed, per-participant period lists.
///
/// Participants without an entry have no busy periods.
#[derive(Debug, Clone, Default)]
pub struct StaticCalendar {
    periods: HashMap<String, Vec<RawPeriod>>,
}

impl StaticCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_periods(
        mut self,
        participant_id: impl Into<String>,
        periods: Vec<RawPeriod>,
    ) -> Self {
        self.periods.insert(participant_id.into(), periods);
        self
    }
}

impl CalendarSource for StaticCalendar {
    fn busy_periods(&self, participant_id: &str, _range: &TimeInterval) -> Result<Vec<RawPeriod>> {
        Ok(self.periods.get(participant_id).cloned().unwrap_or_default())
    }
}

/// In-memory [`AvailabilityStore`].
///
/// A replace computes the complete new row set for the event before swapping
/// it in under the lock, so readers never observe a half-applied replace.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: Mutex<HashMap<i64, Vec<AvailabilitySubmission>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with one event's rows.
    pub fn with_submissions(event_id: i64, submissions: Vec<AvailabilitySubmission>) -> Self {
        let store = Self::new();
        if let Ok(mut events) = store.events.lock() {
            events.insert(event_id, submissions);
        }
        store
    }
}

impl AvailabilityStore for MemoryStore {
    fn list_submissions(&self, event_id: i64) -> Result<Vec<AvailabilitySubmission>> {
        let events = self
            .events
            .lock()
            .map_err(|_| SlotError::Storage("store lock poisoned".to_string()))?;
        Ok(events.get(&event_id).cloned().unwrap_or_default())
    }

    fn replace_calendar_submissions(
        &self,
        event_id: i64,
        participant_id: &str,
        submissions: Vec<AvailabilitySubmission>,
    ) -> Result<()> {
        if let Some(foreign) = submissions.iter().find(|s| s.participant_id != participant_id) {
            return Err(SlotError::Storage(format!(
                "submission for '{}' in replace for '{}'",
                foreign.participant_id, participant_id
            )));
        }

        let mut events = self
            .events
            .lock()
            .map_err(|_| SlotError::Storage("store lock poisoned".to_string()))?;
        let existing = events.get(&event_id).map(Vec::as_slice).unwrap_or_default();
        let replaced = replace_calendar_submissions(existing, participant_id, submissions);
        events.insert(event_id, replaced);
        Ok(())
    }
}
