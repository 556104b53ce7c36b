use chrono::{
    DateTime, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc,
};

use super::{Cadence, DateRange};

/// Computes the window queried for page `offset` under `cadence`.
///
/// Day boundaries are taken in the time zone of `now`. The window always ends
/// at the close of the day `offset` periods back. For `Day` it starts at the
/// opening of that same day. For `Week` and `Month` it starts at the close of
/// the day `offset + 1` periods back, so the window for `offset` ends exactly
/// where the window for `offset - 1` starts.
///
/// Offset 0 is the most recent window (ending tonight). There is no upper bound,
/// far offsets saturate at the earliest representable date.
pub fn compute_window<Tz: TimeZone>(cadence: Cadence, offset: u32, now: &DateTime<Tz>) -> DateRange {
    let tz = now.timezone();
    let today = now.date_naive();

    let anchor = step_back(today, cadence, offset);
    let end = close_of_day(&tz, anchor);
    let start = match cadence {
        Cadence::Day => open_of_day(&tz, anchor),
        Cadence::Week | Cadence::Month => {
            close_of_day(&tz, step_back(today, cadence, offset.saturating_add(1)))
        }
    };

    DateRange::new(start, end)
}

/// `today` moved back by `periods` steps of `cadence`. Months clamp to the last
/// day of a shorter month.
fn step_back(today: NaiveDate, cadence: Cadence, periods: u32) -> NaiveDate {
    let stepped = match cadence {
        Cadence::Day => today.checked_sub_days(Days::new(u64::from(periods))),
        Cadence::Week => today.checked_sub_days(Days::new(7 * u64::from(periods))),
        Cadence::Month => today.checked_sub_months(Months::new(periods)),
    };
    stepped.unwrap_or(NaiveDate::MIN)
}

fn open_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> DateTime<Utc> {
    local_midnight(tz, day)
}

/// Exclusive bound closing `day`: the first instant of the following day.
fn close_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> DateTime<Utc> {
    match day.succ_opt() {
        Some(next) => local_midnight(tz, next),
        None => local_midnight(tz, day) + TimeDelta::days(1),
    }
}

/// Longest stretch of local time a zone has ever skipped (a whole day).
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Midnight of `day` in `tz`. When midnight falls in a DST gap, the first
/// local minute after it that exists is used. Ambiguous midnights resolve to
/// the earlier instant.
fn local_midnight<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    first_valid_local(tz, midnight).unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// First instant at or after the wall-clock time `local` that exists in `tz`.
fn first_valid_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    (0..=MAX_GAP_MINUTES).find_map(|minutes| {
        let candidate = local.checked_add_signed(TimeDelta::minutes(minutes))?;
        tz.from_local_datetime(&candidate)
            .earliest()
            .map(|instant| instant.with_timezone(&Utc))
    })
}
