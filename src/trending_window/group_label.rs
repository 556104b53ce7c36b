use chrono::{NaiveDate, TimeDelta, TimeZone};

use super::{Cadence, DateRange};

/// Separator between the two dates of a week or month label.
pub const RANGE_SEPARATOR: &str = " – ";

/// Heading shown above a group.
///
/// Day groups read `March 5, 2024`. Week and month groups read
/// `Feb 27 – Mar 5, 2024`, with the year of the last day in the window.
pub fn format_label<Tz: TimeZone>(range: &DateRange, cadence: Cadence, tz: &Tz) -> String {
    let (first, last) = covered_days(range, tz);
    match cadence {
        Cadence::Day => first.format("%B %-d, %Y").to_string(),
        Cadence::Week | Cadence::Month => format!(
            "{}{}{}",
            first.format("%b %-d"),
            RANGE_SEPARATOR,
            last.format("%b %-d, %Y")
        ),
    }
}

/// First and last calendar day inside the half-open range, seen from `tz`.
fn covered_days<Tz: TimeZone>(range: &DateRange, tz: &Tz) -> (NaiveDate, NaiveDate) {
    let first = range.start.with_timezone(tz).date_naive();
    if range.end <= range.start {
        return (first, first);
    }
    let last = (range.end - TimeDelta::nanoseconds(1))
        .with_timezone(tz)
        .date_naive();
    (first, last)
}
