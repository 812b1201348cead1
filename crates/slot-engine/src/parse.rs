//! Decode collaborator timestamps into [`TimeInterval`]s.
//!
//! Calendar feeds report each period's endpoints either as an RFC 3339
//! timestamp (`2025-08-01T09:00:00+09:00`) or, for all-day entries, as a bare
//! `YYYY-MM-DD` date. Bare dates are resolved to local midnight in the
//! caller's reference zone.
//!
//! Feed entries that cannot be decoded are skipped rather than failing the
//! whole batch. The skips are collected in a [`ParseReport`] and logged so
//! data-quality problems stay visible.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SlotError};
use crate::interval::{BusyInterval, TimeInterval};

/// One period as delivered by a calendar collaborator, before decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPeriod {
    pub start: String,
    pub end: String,
}

impl RawPeriod {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// A feed entry that was dropped during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// Position of the entry in the input list.
    pub index: usize,
    pub reason: String,
}

/// Result of decoding a participant's busy or free periods.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub intervals: Vec<BusyInterval>,
    pub skipped: Vec<SkippedEntry>,
}

impl ParseReport {
    /// The decoded intervals without their participant tag.
    pub fn time_intervals(&self) -> Vec<TimeInterval> {
        self.intervals.iter().map(|b| b.interval).collect()
    }
}

/// Parse an IANA timezone name such as `"Asia/Tokyo"`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// How an endpoint string was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Instant(DateTime<Utc>),
    Date(NaiveDate),
}

fn parse_endpoint(s: &str) -> Result<Endpoint> {
    let trimmed = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Endpoint::Instant(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Endpoint::Date)
        .map_err(|e| SlotError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Local midnight of `date` in `tz` as a UTC instant.
///
/// When midnight does not exist because a DST gap starts at 00:00, the
/// instant one hour later is used. An ambiguous midnight resolves to the
/// earlier of the two instants.
pub fn local_midnight(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            SlotError::InvalidDatetime(format!("no local midnight for {} in {}", date, tz))
        })
}

/// Parse a single RFC 3339 timestamp or bare `YYYY-MM-DD` date.
pub fn parse_instant(s: &str, tz: Tz) -> Result<DateTime<Utc>> {
    match parse_endpoint(s)? {
        Endpoint::Instant(dt) => Ok(dt),
        Endpoint::Date(date) => local_midnight(date, tz),
    }
}

/// Decode a single raw period.
///
/// A bare-date end that does not fall after the start (an all-day entry
/// written as `date..date`) is extended to the following local midnight.
pub fn parse_period(raw: &RawPeriod, tz: Tz) -> Result<TimeInterval> {
    let start = parse_instant(&raw.start, tz)?;
    let end = match parse_endpoint(&raw.end)? {
        Endpoint::Instant(dt) => dt,
        Endpoint::Date(date) => {
            let end = local_midnight(date, tz)?;
            if end > start {
                end
            } else {
                let next = date.checked_add_days(Days::new(1)).ok_or_else(|| {
                    SlotError::InvalidDatetime(format!("date out of range: {}", date))
                })?;
                local_midnight(next, tz)?
            }
        }
    };

    TimeInterval::new(start, end).ok_or_else(|| {
        SlotError::InvalidDatetime(format!(
            "period ends before it starts: {} .. {}",
            raw.start, raw.end
        ))
    })
}

/// Decode a participant's busy feed, skipping entries that cannot be parsed.
///
/// Never fails: malformed timestamps and degenerate periods are recorded in
/// [`ParseReport::skipped`] and logged at `warn` level.
pub fn parse_busy_periods(participant_id: &str, periods: &[RawPeriod], tz: Tz) -> ParseReport {
    decode_periods("busy", participant_id, periods, tz)
}

/// Decode a participant's offered free periods, skipping entries that cannot
/// be parsed. Same rules as [`parse_busy_periods`].
pub fn parse_free_periods(participant_id: &str, periods: &[RawPeriod], tz: Tz) -> ParseReport {
    decode_periods("free", participant_id, periods, tz)
}

fn decode_periods(
    kind: &str,
    participant_id: &str,
    periods: &[RawPeriod],
    tz: Tz,
) -> ParseReport {
    let mut report = ParseReport::default();

    for (index, raw) in periods.iter().enumerate() {
        match parse_period(raw, tz) {
            Ok(interval) => report.intervals.push(BusyInterval {
                participant_id: participant_id.to_string(),
                interval,
            }),
            Err(e) => {
                warn!(
                    participant = participant_id,
                    index,
                    error = %e,
                    "skipping {} period",
                    kind
                );
                report.skipped.push(SkippedEntry {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

/// Decode a JSON array of `{start, end}` objects as a busy feed.
///
/// Unlike individual entries, a document that is not a JSON array of periods
/// is an error.
pub fn parse_busy_json(participant_id: &str, json: &str, tz: Tz) -> Result<ParseReport> {
    let periods: Vec<RawPeriod> = serde_json::from_str(json)
        .map_err(|e| SlotError::InvalidInput(format!("invalid busy periods JSON: {}", e)))?;
    Ok(parse_busy_periods(participant_id, &periods, tz))
}

/// Parse a caller-supplied query range strictly.
///
/// Endpoints that fail to parse are errors here, since the range comes from
/// the caller and not from an upstream feed. A range with `end <= start` is
/// returned as is; downstream stages treat it as "no time available".
pub fn parse_range(start: &str, end: &str, tz: Tz) -> Result<TimeInterval> {
    Ok(TimeInterval {
        start: parse_instant(start, tz)?,
        end: parse_instant(end, tz)?,
    })
}
