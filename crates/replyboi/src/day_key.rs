//! # Day Keys
//!
//! A "day" runs from `rollover_hour:00` to `rollover_hour:00` on the next
//! calendar day, not midnight to midnight. A session at 01:30 with a rollover
//! hour of 4 still counts toward the previous date.
//!
//! Both functions are pure in the instant, the rollover hour, and the offset
//! carried by the instant's time zone.

use crate::model::DayKey;
use chrono::{DateTime, Days, LocalResult, NaiveDateTime, TimeDelta, TimeZone, Timelike};

pub const DEFAULT_ROLLOVER_HOUR: u8 = 4;

pub fn day_key_of<Tz: TimeZone>(instant: &DateTime<Tz>, rollover_hour: u8) -> DayKey {
    let date = instant.date_naive();
    if instant.hour() < u32::from(rollover_hour) {
        // `pred_opt` only fails at NaiveDate::MIN.
        DayKey::new(date.pred_opt().unwrap_or(date))
    } else {
        DayKey::new(date)
    }
}

/// The first `rollover_hour:00` strictly after `now`, in `now`'s time zone.
pub fn next_rollover_after<Tz: TimeZone>(now: &DateTime<Tz>, rollover_hour: u8) -> DateTime<Tz> {
    let tz = now.timezone();
    let mut date = now.date_naive();
    loop {
        if let Some(candidate) = date
            .and_hms_opt(u32::from(rollover_hour), 0, 0)
            .and_then(|naive| localize(&tz, naive))
        {
            if candidate > *now {
                return candidate;
            }
        }
        date = match date.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => return now.clone(),
        };
    }
}

/// Ambiguous wall-clock times take the earlier instant; times that fall in
/// a DST gap move forward by an hour.
fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest(),
    }
}
