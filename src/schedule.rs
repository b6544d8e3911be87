//! Query window planning.
//!
//! The KMA publishes an hour's ultra-short-term observation a little after
//! the hour boundary, so a request for the current hour can come back empty
//! for the first minutes. The planner yields the current hour and, as a
//! fallback, the hour before, but never a window from the previous calendar
//! day: `base_date` is always today.
//!
//! # Clock injection
//! `plan_windows_at` takes `now` as a parameter instead of reading the
//! clock, which keeps the midnight edge deterministic in tests.

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};

use crate::model::QueryWindow;

/// Korea Standard Time. Korea observes no daylight saving, so a fixed
/// offset is exact. Checked at compile time.
const KST: FixedOffset = match FixedOffset::east_opt(9 * 3600) {
    Some(offset) => offset,
    None => panic!("UTC+9 is within the valid offset range"),
};

/// Maximum number of windows ever tried for one request.
pub const MAX_WINDOWS: usize = 2;

pub fn kst() -> FixedOffset {
    KST
}

/// Current wall-clock time in KST.
pub fn now_kst() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&kst())
}

/// Truncates a timestamp to the top of its hour.
fn hour_floor(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    now - Duration::minutes(i64::from(now.minute()))
        - Duration::seconds(i64::from(now.second()))
        - Duration::nanoseconds(i64::from(now.nanosecond()))
}

fn window_of(at: DateTime<FixedOffset>) -> QueryWindow {
    QueryWindow {
        date: at.date_naive(),
        hour: at.hour(),
    }
}

/// Returns the windows to try, in order, for a request made at `now`.
///
/// The primary window is `now` truncated to the hour. The fallback is one
/// hour earlier and is dropped when it lands on the previous day, so at
/// 00:xx only one window is returned.
pub fn plan_windows_at(now: DateTime<FixedOffset>) -> Vec<QueryWindow> {
    let primary_at = hour_floor(now);
    let primary = window_of(primary_at);
    let fallback = window_of(primary_at - Duration::hours(1));

    let mut windows = Vec::with_capacity(MAX_WINDOWS);
    windows.push(primary);
    if fallback.date == primary.date {
        windows.push(fallback);
    }
    windows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
