//! Analytics preferences held by the engine.
//!
//! Persisting these across sessions is the caller's job; the engine only
//! reads them and merges [`PreferencesUpdate`]s into them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pattern::PatternType;
use super::time_range::{TimePreset, TimeRange};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsPreferences {
    /// Window used when a request does not name one
    pub default_time_range: TimeRange,
    /// Insight types shown to the user
    pub enabled_insights: Vec<PatternType>,
    /// When the user last looked at their insights
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_viewed_insights: Option<DateTime<Utc>>,
}

impl AnalyticsPreferences {
    /// Month preset, every insight enabled, never viewed.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            default_time_range: TimeRange::from_preset(TimePreset::Month, now),
            enabled_insights: PatternType::ALL.to_vec(),
            last_viewed_insights: None,
        }
    }

    pub fn is_enabled(&self, pattern_type: PatternType) -> bool {
        self.enabled_insights.contains(&pattern_type)
    }

    /// Merge `update` in place. Returns true if the default range changed.
    pub fn apply(&mut self, update: PreferencesUpdate) -> bool {
        let mut range_changed = false;

        if let Some(range) = update.default_time_range {
            range_changed = range != self.default_time_range;
            self.default_time_range = range;
        }
        if let Some(enabled) = update.enabled_insights {
            self.enabled_insights = enabled;
        }
        if let Some(viewed) = update.last_viewed_insights {
            self.last_viewed_insights = Some(viewed);
        }

        range_changed
    }
}

/// Partial change to [`AnalyticsPreferences`]; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferencesUpdate {
    pub default_time_range: Option<TimeRange>,
    pub enabled_insights: Option<Vec<PatternType>>,
    pub last_viewed_insights: Option<DateTime<Utc>>,
}

impl PreferencesUpdate {
    pub fn time_range(range: TimeRange) -> Self {
        Self {
            default_time_range: Some(range),
            ..Default::default()
        }
    }

    pub fn viewed_at(instant: DateTime<Utc>) -> Self {
        Self {
            last_viewed_insights: Some(instant),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 8, 15, 0, 0, 0).unwrap();
        let prefs = AnalyticsPreferences::new(now);

        assert_eq!(prefs.default_time_range.preset, Some(TimePreset::Month));
        assert_eq!(prefs.enabled_insights.len(), 4);
        assert!(prefs.is_enabled(PatternType::Trend));
        assert!(prefs.last_viewed_insights.is_none());
    }

    #[test]
    fn test_apply_merges_and_reports_range_change() {
        let now = Utc.with_ymd_and_hms(2024, 8, 15, 0, 0, 0).unwrap();
        let mut prefs = AnalyticsPreferences::new(now);

        let changed = prefs.apply(PreferencesUpdate {
            enabled_insights: Some(vec![PatternType::Streak]),
            ..Default::default()
        });
        assert!(!changed);
        assert!(!prefs.is_enabled(PatternType::Trend));
        assert_eq!(prefs.default_time_range.preset, Some(TimePreset::Month));

        let same = prefs.default_time_range;
        assert!(!prefs.apply(PreferencesUpdate::time_range(same)));

        let week = TimeRange::from_preset(TimePreset::Week, now);
        assert!(prefs.apply(PreferencesUpdate::time_range(week)));
        assert_eq!(prefs.default_time_range, week);

        prefs.apply(PreferencesUpdate::viewed_at(now));
        assert_eq!(prefs.last_viewed_insights, Some(now));
        assert_eq!(prefs.enabled_insights, vec![PatternType::Streak]);
    }
}
