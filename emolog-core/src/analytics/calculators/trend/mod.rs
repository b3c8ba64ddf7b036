//! Weekly trend of the expression ratio.
//!
//! Logs are bucketed into Sunday-started local weeks. The direction is a
//! threshold heuristic, not a statistical test: the mean weekly ratio of the
//! later half of the weeks is compared against the earlier half.
//!
//! ## Fields Produced
//!
//! | Field | Type | Description |
//! |-------|------|-------------|
//! | `weeklyData` | array | One entry per week with logs, ascending by `weekStart` |
//! | `trendDirection` | string | `improving`, `declining` or `stable` |
//! | `totalWeeks` | integer | Length of `weeklyData` |
//! | `averageExpressionRatio` | float | Mean of the weekly ratios, not of all logs |
//!
//! Weeks without logs are skipped rather than reported as zero.
//!
//! ## Direction
//!
//! With `n` weeks the first `n / 2` form the earlier half. A later-half mean
//! more than [`TREND_THRESHOLD`] above the earlier one is `improving`, more
//! than the threshold below is `declining`. Fewer than two weeks is `stable`.
//!
//! ## Example
//!
//! | Week of | Expressed | Suppressed | Ratio |
//! |---------|-----------|------------|-------|
//! | Mar 03 | 1 | 3 | 0.25 |
//! | Mar 10 | 2 | 2 | 0.50 |
//! | Mar 17 | 3 | 1 | 0.75 |
//!
//! Earlier half `[0.25]`, later half `[0.50, 0.75]` with mean 0.625, so the
//! trend is `improving` and `averageExpressionRatio` is 0.5.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::analytics::engine::{AnalysisContext, PatternCalculator};
use crate::analytics::pattern::{
    plural, to_percentage, EmotionalPattern, PatternData, PatternType, TrendData, TrendDirection,
    WeeklyData,
};
use crate::analytics::time_range::{filter_by_time_range, local_day, week_start, TimeRange};
use crate::types::EmotionLog;
use crate::Result;

/// Minimum change in mean weekly ratio before a trend is called.
pub const TREND_THRESHOLD: f64 = 0.1;

pub struct TrendCalculator;

impl TrendCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TrendCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternCalculator for TrendCalculator {
    fn name(&self) -> &str {
        "core.trend"
    }

    fn pattern_type(&self) -> PatternType {
        PatternType::Trend
    }

    fn calculate(
        &self,
        logs: &[EmotionLog],
        range: &TimeRange,
        ctx: &AnalysisContext,
    ) -> Result<EmotionalPattern> {
        analyze_trends(logs, range, ctx)
    }
}

/// Filter `logs` to `range` and build the trend pattern.
pub fn analyze_trends(
    logs: &[EmotionLog],
    range: &TimeRange,
    ctx: &AnalysisContext,
) -> Result<EmotionalPattern> {
    let filtered = filter_by_time_range(logs, range)?;
    let data = compute(&filtered, ctx);
    let (insight, encouragement) = narrate(&data);

    Ok(EmotionalPattern::new(
        *range,
        PatternData::Trend(data),
        insight,
        encouragement,
    ))
}

pub fn compute(logs: &[&EmotionLog], ctx: &AnalysisContext) -> TrendData {
    // week start -> (expressed, suppressed)
    let mut weeks: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for log in logs {
        let key = week_start(local_day(log.timestamp, &ctx.offset));
        let bucket = weeks.entry(key).or_insert((0, 0));
        if log.is_expressed() {
            bucket.0 += 1;
        } else {
            bucket.1 += 1;
        }
    }

    let weekly_data: Vec<WeeklyData> = weeks
        .into_iter()
        .map(|(week_start, (expressed, suppressed))| {
            let total = expressed + suppressed;
            WeeklyData {
                week_start,
                expressed,
                suppressed,
                total,
                expression_ratio: expressed as f64 / total as f64,
            }
        })
        .collect();

    let ratios: Vec<f64> = weekly_data.iter().map(|w| w.expression_ratio).collect();

    TrendData {
        trend_direction: classify(&ratios),
        total_weeks: weekly_data.len(),
        average_expression_ratio: mean(&ratios),
        weekly_data,
    }
}

/// Compare the mean of the later half of `ratios` against the earlier half.
///
/// The earlier half is the first `n / 2` weeks; with fewer than two weeks the
/// trend is always stable.
pub fn classify(ratios: &[f64]) -> TrendDirection {
    if ratios.len() < 2 {
        return TrendDirection::Stable;
    }

    let (first, second) = ratios.split_at(ratios.len() / 2);
    let first_avg = mean(first);
    let second_avg = mean(second);

    if second_avg > first_avg + TREND_THRESHOLD {
        TrendDirection::Improving
    } else if second_avg < first_avg - TREND_THRESHOLD {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub fn narrate(data: &TrendData) -> (String, String) {
    if data.total_weeks == 0 {
        return (
            "There isn't enough weekly data to spot a trend yet.".to_string(),
            "Keep checking in and your trend will take shape over time.".to_string(),
        );
    }

    match data.trend_direction {
        TrendDirection::Improving => (
            "You've been expressing your emotions more often lately.".to_string(),
            "Your openness is growing. That's something to be proud of.".to_string(),
        ),
        TrendDirection::Declining => (
            "You've been holding a little more back in recent weeks.".to_string(),
            "That's okay. Check in with yourself and share when it feels right.".to_string(),
        ),
        TrendDirection::Stable => (
            format!(
                "Your expression has stayed steady at around {}% over {}.",
                to_percentage(data.average_expression_ratio),
                plural(data.total_weeks as u64, "week"),
            ),
            "Consistency is a quiet kind of strength.".to_string(),
        ),
    }
}
