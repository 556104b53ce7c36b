use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub mod group_label;
pub mod window_calculator;

/// GitHub range qualifiers want second precision with a trailing `Z`.
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Width of a feed window and the step between two consecutive offsets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cadence {
    #[serde(rename = "daily", alias = "day")]
    Day,
    #[default]
    #[serde(rename = "weekly", alias = "week")]
    Week,
    #[serde(rename = "monthly", alias = "month")]
    Month,
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cadence::Day => "daily",
            Cadence::Week => "weekly",
            Cadence::Month => "monthly",
        };
        f.write_str(name)
    }
}

impl FromStr for Cadence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Cadence::Day),
            "weekly" | "week" => Ok(Cadence::Week),
            "monthly" | "month" => Ok(Cadence::Month),
            other => Err(format!(
                "unknown cadence `{other}`, expected one of daily, weekly, monthly"
            )),
        }
    }
}

/// Half-open interval `[start, end)` of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Swaps the bounds if needed so that `start <= end` always holds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant < self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Last whole second still inside the range. GitHub's `a..b` qualifier is
    /// inclusive on both sides, so this is what goes on the right of `..`.
    pub fn last_second(&self) -> DateTime<Utc> {
        let last = self.end - TimeDelta::seconds(1);
        last.max(self.start)
    }

    /// `created:<start>..<last second>` search qualifier.
    pub fn created_qualifier(&self) -> String {
        format!(
            "created:{}..{}",
            self.start.format(QUERY_DATE_FORMAT),
            self.last_second().format(QUERY_DATE_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn cadence_parses_both_spellings() {
        assert_eq!("daily".parse::<Cadence>().unwrap(), Cadence::Day);
        assert_eq!("Week".parse::<Cadence>().unwrap(), Cadence::Week);
        assert_eq!(" monthly ".parse::<Cadence>().unwrap(), Cadence::Month);
        assert!("yearly".parse::<Cadence>().is_err());
        assert_eq!(Cadence::Month.to_string(), "monthly");
    }

    #[test]
    fn range_orders_its_bounds() {
        let a = Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap();
        let range = DateRange::new(a, b);
        assert_eq!(range.start, b);
        assert_eq!(range.end, a);
        assert!(range.contains(&b));
        assert!(!range.contains(&a));
    }

    #[test]
    fn created_qualifier_uses_inclusive_last_second() {
        let range = DateRange::new(
            Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap(),
        );
        assert_eq!(
            range.created_qualifier(),
            "created:2024-03-07T00:00:00Z..2024-03-13T23:59:59Z"
        );
    }

    #[test]
    fn empty_range_never_inverts_in_qualifier() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap();
        let range = DateRange::new(instant, instant);
        assert_eq!(
            range.created_qualifier(),
            "created:2024-03-07T00:00:00Z..2024-03-07T00:00:00Z"
        );
    }
}
