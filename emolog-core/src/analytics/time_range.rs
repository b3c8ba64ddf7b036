//! Time windows and the filter stage.
//!
//! Every calculator bounds its input with a [`TimeRange`] through
//! [`filter_by_time_range`]. Both ends of a range are inclusive.
//!
//! Day and week bucketing goes through [`local_day`] and [`week_start`] with a
//! single [`FixedOffset`], so the streak and trend calculators always agree on
//! where a day begins.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Named shorthand for a time window ending now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePreset {
    Week,
    Month,
    Quarter,
    Year,
}

impl TimePreset {
    pub const ALL: [TimePreset; 4] = [
        TimePreset::Week,
        TimePreset::Month,
        TimePreset::Quarter,
        TimePreset::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimePreset::Week => "week",
            TimePreset::Month => "month",
            TimePreset::Quarter => "quarter",
            TimePreset::Year => "year",
        }
    }

    /// Get display name for this preset.
    pub fn display_name(&self) -> &'static str {
        match self {
            TimePreset::Week => "Past week",
            TimePreset::Month => "Past month",
            TimePreset::Quarter => "Past 3 months",
            TimePreset::Year => "Past year",
        }
    }

    /// Start of the window that ends at `now`.
    fn start_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let months = match self {
            TimePreset::Week => return now - Duration::days(7),
            TimePreset::Month => 1,
            TimePreset::Quarter => 3,
            TimePreset::Year => 12,
        };
        now.checked_sub_months(Months::new(months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl std::fmt::Display for TimePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimePreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(TimePreset::Week),
            "month" => Ok(TimePreset::Month),
            "quarter" => Ok(TimePreset::Quarter),
            "year" => Ok(TimePreset::Year),
            _ => Err(Error::UnknownPreset(s.to_string())),
        }
    }
}

/// An inclusive `[start, end]` window, optionally tagged with the preset it
/// was resolved from.
///
/// Build one with [`TimeRange::new`] or [`TimeRange::from_preset`]; both
/// guarantee `start <= end`. The fields stay public so results can be
/// serialized as plain data, and the filter stage re-checks the invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<TimePreset>,
}

impl TimeRange {
    /// Create a custom range.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let range = Self {
            start,
            end,
            preset: None,
        };
        range.validate()?;
        Ok(range)
    }

    /// Resolve a preset to the window ending at `now`.
    pub fn from_preset(preset: TimePreset, now: DateTime<Utc>) -> Self {
        Self {
            start: preset.start_from(now),
            end: now,
            preset: Some(preset),
        }
    }

    /// Range covering whole calendar days `first..=last` as seen from `offset`.
    pub fn from_dates(first: NaiveDate, last: NaiveDate, offset: &FixedOffset) -> Result<Self> {
        let shift = Duration::seconds(offset.local_minus_utc() as i64);
        let start = first
            .and_hms_opt(0, 0, 0)
            .and_then(|n| n.checked_sub_signed(shift))
            .map(|n| n.and_utc());
        let end = last
            .and_hms_milli_opt(23, 59, 59, 999)
            .and_then(|n| n.checked_sub_signed(shift))
            .map(|n| n.and_utc());

        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Err(Error::Config(format!(
                "cannot build a range from {} to {}",
                first, last
            ))),
        }
    }

    /// Check the `start <= end` invariant.
    pub fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(Error::InvalidTimeRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Number of days spanned, rounded up.
    pub fn total_days(&self) -> i64 {
        let span_ms = (self.end - self.start).num_milliseconds().max(0);
        (span_ms + DAY_MS - 1) / DAY_MS
    }

    /// Re-anchor a preset range at `now`; custom ranges are returned as-is.
    pub fn resolve(&self, now: DateTime<Utc>) -> Self {
        match self.preset {
            Some(preset) => Self::from_preset(preset, now),
            None => *self,
        }
    }

    /// Get display name for this range (e.g. "Past month" or "Mar 01 – Mar 31, 2024").
    pub fn display_name(&self) -> String {
        match self.preset {
            Some(preset) => preset.display_name().to_string(),
            None => format!(
                "{} – {}",
                self.start.format("%b %d"),
                self.end.format("%b %d, %Y")
            ),
        }
    }
}

/// Records that can be placed on the timeline.
///
/// A record reports `None` when it carries no usable time at all; such
/// records are treated as outside every range.
pub trait Timestamped {
    fn effective_time(&self) -> Option<DateTime<Utc>>;
}

/// Select the records whose effective time lies in `range`, preserving order.
///
/// Fails only when the range itself is inverted.
pub fn filter_by_time_range<'a, T: Timestamped>(
    records: &'a [T],
    range: &TimeRange,
) -> Result<Vec<&'a T>> {
    range.validate()?;

    Ok(records
        .iter()
        .filter(|record| {
            record
                .effective_time()
                .is_some_and(|instant| range.contains(instant))
        })
        .collect())
}

/// Calendar day of `instant` as seen from `offset`.
pub fn local_day(instant: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    instant.with_timezone(offset).date_naive()
}

/// The Sunday on or before `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_sunday() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Stamp(Option<DateTime<Utc>>, &'static str);

    impl Timestamped for Stamp {
        fn effective_time(&self) -> Option<DateTime<Utc>> {
            self.0
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_filter_is_inclusive_and_order_preserving() {
        let records = vec![
            Stamp(Some(at(3, 12)), "c"),
            Stamp(Some(at(1, 0)), "a"),
            Stamp(None, "undated"),
            Stamp(Some(at(9, 0)), "late"),
            Stamp(Some(at(5, 0)), "e"),
        ];
        let range = TimeRange::new(at(1, 0), at(5, 0)).unwrap();

        let names: Vec<_> = filter_by_time_range(&records, &range)
            .unwrap()
            .iter()
            .map(|s| s.1)
            .collect();
        assert_eq!(names, vec!["c", "a", "e"]);
    }

    #[test]
    fn test_filter_rejects_inverted_range() {
        let records = vec![Stamp(Some(at(2, 0)), "x")];
        let inverted = TimeRange {
            start: at(5, 0),
            end: at(1, 0),
            preset: None,
        };
        assert!(matches!(
            filter_by_time_range(&records, &inverted),
            Err(Error::InvalidTimeRange { .. })
        ));
        assert!(TimeRange::new(at(5, 0), at(1, 0)).is_err());
    }

    #[test]
    fn test_presets_resolve_against_now() {
        let now = Utc.with_ymd_and_hms(2024, 5, 31, 10, 0, 0).unwrap();

        let week = TimeRange::from_preset(TimePreset::Week, now);
        assert_eq!(week.start, Utc.with_ymd_and_hms(2024, 5, 24, 10, 0, 0).unwrap());
        assert_eq!(week.end, now);
        assert_eq!(week.total_days(), 7);

        let month = TimeRange::from_preset(TimePreset::Month, now);
        assert_eq!(month.start, Utc.with_ymd_and_hms(2024, 4, 30, 10, 0, 0).unwrap());

        let quarter = TimeRange::from_preset(TimePreset::Quarter, now);
        assert_eq!(quarter.start, Utc.with_ymd_and_hms(2024, 2, 29, 10, 0, 0).unwrap());

        let year = TimeRange::from_preset(TimePreset::Year, now);
        assert_eq!(year.start, Utc.with_ymd_and_hms(2023, 5, 31, 10, 0, 0).unwrap());
        assert_eq!(year.preset, Some(TimePreset::Year));
    }

    #[test]
    fn test_resolve_only_moves_presets() {
        let then = at(1, 0);
        let now = at(20, 0);
        let preset = TimeRange::from_preset(TimePreset::Week, then);
        assert_eq!(preset.resolve(now).end, now);

        let custom = TimeRange::new(at(1, 0), at(2, 0)).unwrap();
        assert_eq!(custom.resolve(now), custom);
    }

    #[test]
    fn test_total_days_rounds_up() {
        let range = TimeRange::new(at(1, 0), at(3, 1)).unwrap();
        assert_eq!(range.total_days(), 3);
        let empty = TimeRange::new(at(1, 0), at(1, 0)).unwrap();
        assert_eq!(empty.total_days(), 0);
    }

    #[test]
    fn test_from_dates_covers_whole_local_days() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let first = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let range = TimeRange::from_dates(first, last, &offset).unwrap();

        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 4, 30, 22, 0, 0).unwrap());
        assert_eq!(local_day(range.end, &offset), last);
        assert!(TimeRange::from_dates(last, first, &offset).is_err());
    }

    #[test]
    fn test_from_dates_at_calendar_limits_errors() {
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert!(matches!(
            TimeRange::from_dates(first, NaiveDate::MAX, &west),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            TimeRange::from_dates(NaiveDate::MIN, first, &east),
            Err(Error::Config(_))
        ));

        // Shifting away from the limit still works.
        let range = TimeRange::from_dates(first, NaiveDate::MAX, &east).unwrap();
        assert_eq!(range.end.date_naive(), NaiveDate::MAX);
    }

    #[test]
    fn test_week_start_is_sunday() {
        // 2024-05-15 is a Wednesday
        let wednesday = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        assert_eq!(week_start(wednesday), NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
        let sunday = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
        assert_eq!(week_start(sunday), sunday);
    }

    #[test]
    fn test_local_day_uses_offset() {
        let late = Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(local_day(late, &plus_two), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("Quarter".parse::<TimePreset>().unwrap(), TimePreset::Quarter);
        assert!(matches!(
            "decade".parse::<TimePreset>(),
            Err(Error::UnknownPreset(_))
        ));
    }
}
