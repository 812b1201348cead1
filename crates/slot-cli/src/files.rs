//! JSON-file stand-ins for the calendar and storage collaborators.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use slot_engine::error::SlotError;
use slot_engine::parse::RawPeriod;
use slot_engine::ports::{AvailabilityStore, StaticCalendar};
use slot_engine::submission::{replace_calendar_submissions, AvailabilitySubmission};

/// Submissions keyed by event id, as stored on disk.
type StoreContents = BTreeMap<i64, Vec<AvailabilitySubmission>>;

/// Load a JSON array of `{start, end}` periods as `participant_id`'s calendar.
pub fn load_calendar(path: &Path, participant_id: &str) -> Result<StaticCalendar> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read busy periods: {}", path.display()))?;
    let periods: Vec<RawPeriod> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid busy periods JSON: {}", path.display()))?;
    Ok(StaticCalendar::new().with_periods(participant_id, periods))
}

/// An [`AvailabilityStore`] persisted as a single JSON document.
///
/// The file maps event ids to submission arrays. A missing file is an empty
/// store. Every replace rewrites the whole document to a sibling temp file and
/// renames it over the original, so a failed write leaves the previous
/// contents in place.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    contents: Mutex<StoreContents>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store: {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid store JSON: {}", path.display()))?
        } else {
            StoreContents::new()
        };
        Ok(Self {
            path,
            contents: Mutex::new(contents),
        })
    }

    fn write(&self, contents: &StoreContents) -> slot_engine::error::Result<()> {
        let json = serde_json::to_string_pretty(contents)
            .map_err(|e| SlotError::Storage(format!("failed to encode store: {}", e)))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| SlotError::Storage(format!("failed to write {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            SlotError::Storage(format!("failed to replace {}: {}", self.path.display(), e))
        })
    }
}

impl AvailabilityStore for JsonFileStore {
    fn list_submissions(
        &self,
        event_id: i64,
    ) -> slot_engine::error::Result<Vec<AvailabilitySubmission>> {
        let contents = self
            .contents
            .lock()
            .map_err(|_| SlotError::Storage("store lock poisoned".to_string()))?;
        Ok(contents.get(&event_id).cloned().unwrap_or_default())
    }

    fn replace_calendar_submissions(
        &self,
        event_id: i64,
        participant_id: &str,
        submissions: Vec<AvailabilitySubmission>,
    ) -> slot_engine::error::Result<()> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|_| SlotError::Storage("store lock poisoned".to_string()))?;

        let existing = contents.get(&event_id).map(Vec::as_slice).unwrap_or_default();
        let mut updated = contents.clone();
        updated.insert(
            event_id,
            replace_calendar_submissions(existing, participant_id, submissions),
        );

        self.write(&updated)?;
        *contents = updated;
        tracing::debug!(event_id, participant_id, path = %self.path.display(), "store updated");
        Ok(())
    }
}
