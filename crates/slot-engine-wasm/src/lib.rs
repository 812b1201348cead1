//! WASM bindings for slot-engine.
//!
//! Exposes free-time computation, common-window intersection and invite
//! planning to JavaScript via `wasm-bindgen`. All complex types are passed as
//! JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use std::collections::BTreeMap;

use chrono_tz::Tz;
use serde::Serialize;
use slot_engine::freebusy::free_intervals;
use slot_engine::parse::{
    parse_busy_json, parse_free_periods, parse_range, parse_timezone, RawPeriod, SkippedEntry,
};
use slot_engine::planner::{candidate_slots, plan_invite, RawInviteRequest};
use slot_engine::ports::{AvailabilityStore, MemoryStore, StaticCalendar};
use slot_engine::{AvailabilitySubmission, InviteResponse, TimeInterval};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct FreeIntervalsDto {
    free: Vec<TimeInterval>,
    skipped: Vec<SkippedEntry>,
}

#[derive(Serialize)]
struct PlanDto {
    response: InviteResponse,
    /// Rows held for the event after planning, including any persisted ones.
    submissions: Vec<AvailabilitySubmission>,
    skipped_busy: usize,
    skipped_stored: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn timezone(name: &str) -> Result<Tz, JsValue> {
    parse_timezone(name).map_err(js_err)
}

fn parse_json<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Complement one participant's busy periods within a range.
///
/// `busy_json` is a JSON array of `{start, end}` objects; endpoints and the
/// range bounds may be RFC 3339 datetimes or bare `YYYY-MM-DD` dates, which
/// resolve to local midnight in `timezone`. Returns `{free, skipped}`.
#[wasm_bindgen(js_name = "freeIntervals")]
pub fn free_intervals_js(
    busy_json: &str,
    range_start: &str,
    range_end: &str,
    timezone_name: &str,
) -> Result<String, JsValue> {
    let tz = timezone(timezone_name)?;
    let report = parse_busy_json("input", busy_json, tz).map_err(js_err)?;
    let range = parse_range(range_start, range_end, tz).map_err(js_err)?;

    to_json(&FreeIntervalsDto {
        free: free_intervals(&range, &report.time_intervals()),
        skipped: report.skipped,
    })
}

/// Intersect a `{participant: [{start, end}]}` map of free periods.
///
/// Returns the numbered candidate slots at least `min_duration_minutes` long.
#[wasm_bindgen(js_name = "commonWindows")]
pub fn common_windows(
    participants_json: &str,
    min_duration_minutes: i32,
    timezone_name: &str,
) -> Result<String, JsValue> {
    let tz = timezone(timezone_name)?;
    let map: BTreeMap<String, Vec<RawPeriod>> = parse_json(participants_json, "participants")?;

    let free_by_participant: BTreeMap<String, Vec<TimeInterval>> = map
        .iter()
        .map(|(participant, periods)| {
            let report = parse_free_periods(participant, periods, tz);
            (participant.clone(), report.time_intervals())
        })
        .collect();

    to_json(&candidate_slots(&free_by_participant, i64::from(min_duration_minutes), tz))
}

/// Plan an invite for one participant.
///
/// - `request_json` -- `{event_id, participant_id, event: {name, memo,
///   period_start, period_end, duration_min}, persist}`; the period bounds may
///   be RFC 3339 datetimes or bare dates, and a missing `duration_min` means no
///   minimum
/// - `busy_json` -- the participant's busy `{start, end}` periods
/// - `submissions_json` -- the event's stored availability rows
///
/// Returns `{response, submissions, skipped_busy, skipped_stored}` where
/// `submissions` is the event's row set after planning, so callers can write
/// it back when `persist` was set.
#[wasm_bindgen(js_name = "planSlots")]
pub fn plan_slots(
    request_json: &str,
    busy_json: &str,
    submissions_json: &str,
    timezone_name: &str,
) -> Result<String, JsValue> {
    let tz = timezone(timezone_name)?;
    let raw: RawInviteRequest = parse_json(request_json, "request")?;
    let request = raw.resolve(tz, 0).map_err(js_err)?;
    let busy: Vec<RawPeriod> = parse_json(busy_json, "busy periods")?;
    let stored: Vec<AvailabilitySubmission> = parse_json(submissions_json, "submissions")?;

    let calendar = StaticCalendar::new().with_periods(request.participant_id.clone(), busy);
    let store = MemoryStore::with_submissions(request.event_id, stored);

    let outcome = plan_invite(&request, tz, &calendar, &store).map_err(js_err)?;
    let submissions = store.list_submissions(request.event_id).map_err(js_err)?;

    to_json(&PlanDto {
        response: outcome.response,
        submissions,
        skipped_busy: outcome.skipped_busy,
        skipped_stored: outcome.skipped_stored,
    })
}
