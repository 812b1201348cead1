//! Minimum-duration filtering of candidate windows.

use chrono::Duration;

use crate::interval::TimeInterval;

/// Keep only windows lasting at least `min_duration_minutes`.
///
/// A minimum of zero or less means "no minimum": the input is returned as is,
/// including sub-minute windows. A minimum too large to represent as a
/// duration keeps nothing. Order is preserved.
pub fn filter_by_duration(
    windows: Vec<TimeInterval>,
    min_duration_minutes: i64,
) -> Vec<TimeInterval> {
    if min_duration_minutes <= 0 {
        return windows;
    }

    let Some(minimum) = Duration::try_minutes(min_duration_minutes) else {
        return Vec::new();
    };
    windows
        .into_iter()
        .filter(|window| window.duration() >= minimum)
        .collect()
}
