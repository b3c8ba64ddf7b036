//! Lightweight summary for dashboard headers.
//!
//! Computed straight from raw logs rather than from a cached
//! [`AnalyticsResult`](super::AnalyticsResult), so it always reflects the
//! latest writes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::calculators::{common_emotions, expression_ratio, streak};
use super::engine::AnalysisContext;
use super::time_range::local_day;
use crate::types::EmotionLog;

/// Dashboard summary statistics.
///
/// `Default` is the zero-valued fallback front ends show when computing the
/// summary fails.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Emotion logs in the window
    pub total_emotions: usize,
    /// Of those, how many were expressed
    pub expressed_emotions: usize,
    /// `expressed_emotions / total_emotions`, 0 when empty
    pub expression_ratio: f64,
    /// Consecutive expressed days ending today
    pub current_streak: u32,
    /// Top normalized emotion text
    pub most_common_emotion: Option<String>,
    /// Distinct local days with at least one log
    pub active_days: usize,
}

impl AnalyticsSummary {
    /// Summarize already-filtered logs.
    pub fn compute(logs: &[&EmotionLog], ctx: &AnalysisContext) -> Self {
        let ratio = expression_ratio::compute(logs);
        let common = common_emotions::compute(logs);
        let active_days = logs
            .iter()
            .map(|log| local_day(log.timestamp, &ctx.offset))
            .collect::<HashSet<_>>()
            .len();

        Self {
            total_emotions: ratio.total,
            expressed_emotions: ratio.expressed,
            expression_ratio: ratio.ratio,
            current_streak: streak::current_streak(logs, ctx),
            most_common_emotion: common.emotions.into_iter().next().map(|e| e.emotion),
            active_days,
        }
    }

    /// Format the ratio for display (e.g., "67%").
    pub fn ratio_display(&self) -> String {
        format!("{:.0}%", self.expression_ratio * 100.0)
    }
}
