//! Derived patterns: the uniform output of every calculator.
//!
//! A pattern is never a source of truth. It is recomputed from the raw logs on
//! every run and can be thrown away at any time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::time_range::TimeRange;
use crate::error::Error;

/// The four kinds of insight the engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternType {
    ExpressionRatio,
    CommonEmotions,
    Streak,
    Trend,
}

impl PatternType {
    pub const ALL: [PatternType; 4] = [
        PatternType::ExpressionRatio,
        PatternType::CommonEmotions,
        PatternType::Streak,
        PatternType::Trend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::ExpressionRatio => "expression-ratio",
            PatternType::CommonEmotions => "common-emotions",
            PatternType::Streak => "streak",
            PatternType::Trend => "trend",
        }
    }

    /// Heading used by front ends.
    pub fn title(&self) -> &'static str {
        match self {
            PatternType::ExpressionRatio => "Expression Balance",
            PatternType::CommonEmotions => "Common Emotions",
            PatternType::Streak => "Expression Streak",
            PatternType::Trend => "Weekly Trend",
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PatternType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expression-ratio" => Ok(PatternType::ExpressionRatio),
            "common-emotions" => Ok(PatternType::CommonEmotions),
            "streak" => Ok(PatternType::Streak),
            "trend" => Ok(PatternType::Trend),
            _ => Err(Error::UnknownPatternType(s.to_string())),
        }
    }
}

// ============================================
// Per-calculator data shapes
// ============================================

/// Expressed vs suppressed counts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionRatioData {
    pub expressed: usize,
    pub suppressed: usize,
    pub total: usize,
    /// `expressed / total`, 0 when nothing was logged
    pub ratio: f64,
    /// `ratio` as a rounded whole percentage
    pub percentage: u32,
}

/// One row of the frequency ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionCount {
    /// Normalized (trimmed, lowercased) text
    pub emotion: String,
    pub count: usize,
}

/// Most frequent emotion texts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonEmotionsData {
    /// At most five entries, by descending count
    pub emotions: Vec<EmotionCount>,
    pub total_logs: usize,
    pub unique_emotions: usize,
}

/// Consecutive days with at least one expressed emotion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakData {
    /// Run ending today, 0 if today has no expressed emotion
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Number of separate runs
    pub streak_count: u32,
    pub days_with_expressed: u32,
    /// Days with any log at all
    pub total_days: u32,
}

/// Aggregates for one Sunday-started week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyData {
    pub week_start: NaiveDate,
    pub expressed: usize,
    pub suppressed: usize,
    pub total: usize,
    pub expression_ratio: f64,
}

/// Direction of the expression ratio across weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
    #[default]
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Declining => "declining",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Week-by-week expression ratio.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendData {
    /// Ascending by week
    pub weekly_data: Vec<WeeklyData>,
    pub trend_direction: TrendDirection,
    pub total_weeks: usize,
    /// Mean of the weekly ratios
    pub average_expression_ratio: f64,
}

/// Calculator-specific payload, one variant per [`PatternType`].
///
/// Serialized without a tag: the owning [`EmotionalPattern`] already carries
/// `type`, so `data` is the bare payload object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternData {
    ExpressionRatio(ExpressionRatioData),
    CommonEmotions(CommonEmotionsData),
    Streak(StreakData),
    Trend(TrendData),
}

impl PatternData {
    pub fn pattern_type(&self) -> PatternType {
        match self {
            PatternData::ExpressionRatio(_) => PatternType::ExpressionRatio,
            PatternData::CommonEmotions(_) => PatternType::CommonEmotions,
            PatternData::Streak(_) => PatternType::Streak,
            PatternData::Trend(_) => PatternType::Trend,
        }
    }
}

/// One derived analytical view over a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalPattern {
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    pub time_range: TimeRange,
    pub data: PatternData,
    pub insight: String,
    pub encouragement: String,
}

impl EmotionalPattern {
    /// Build a pattern; the type always follows the data variant.
    pub fn new(
        time_range: TimeRange,
        data: PatternData,
        insight: impl Into<String>,
        encouragement: impl Into<String>,
    ) -> Self {
        Self {
            pattern_type: data.pattern_type(),
            time_range,
            data,
            insight: insight.into(),
            encouragement: encouragement.into(),
        }
    }
}

/// `ratio` as a rounded whole percentage.
pub(crate) fn to_percentage(ratio: f64) -> u32 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u32
}

/// "1 day" / "3 days".
pub(crate) fn plural(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
