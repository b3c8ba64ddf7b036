//! Expression ratio: how many logged feelings were let out vs held back.

use crate::analytics::engine::{AnalysisContext, PatternCalculator};
use crate::analytics::pattern::{
    to_percentage, EmotionalPattern, ExpressionRatioData, PatternData, PatternType,
};
use crate::analytics::time_range::{filter_by_time_range, TimeRange};
use crate::types::{EmotionAction, EmotionLog};
use crate::Result;

const HIGH_RATIO: f64 = 0.7;
const BALANCED_RATIO: f64 = 0.5;

pub struct ExpressionRatioCalculator;

impl ExpressionRatioCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExpressionRatioCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternCalculator for ExpressionRatioCalculator {
    fn name(&self) -> &str {
        "core.expression_ratio"
    }

    fn pattern_type(&self) -> PatternType {
        PatternType::ExpressionRatio
    }

    fn calculate(
        &self,
        logs: &[EmotionLog],
        range: &TimeRange,
        _ctx: &AnalysisContext,
    ) -> Result<EmotionalPattern> {
        calculate_expression_ratio(logs, range)
    }
}

/// Filter `logs` to `range` and build the expression-ratio pattern.
pub fn calculate_expression_ratio(
    logs: &[EmotionLog],
    range: &TimeRange,
) -> Result<EmotionalPattern> {
    let filtered = filter_by_time_range(logs, range)?;
    let data = compute(&filtered);
    let (insight, encouragement) = narrate(&data);

    Ok(EmotionalPattern::new(
        *range,
        PatternData::ExpressionRatio(data),
        insight,
        encouragement,
    ))
}

/// Count expressed vs suppressed over already-filtered logs.
pub fn compute(logs: &[&EmotionLog]) -> ExpressionRatioData {
    let mut expressed = 0;
    let mut suppressed = 0;

    for log in logs {
        match log.action {
            EmotionAction::Expressed => expressed += 1,
            EmotionAction::Suppressed => suppressed += 1,
        }
    }

    let total = expressed + suppressed;
    let ratio = if total > 0 {
        expressed as f64 / total as f64
    } else {
        0.0
    };

    ExpressionRatioData {
        expressed,
        suppressed,
        total,
        ratio,
        percentage: to_percentage(ratio),
    }
}

/// Pick the message tier: first match wins, lower bounds inclusive.
pub fn narrate(data: &ExpressionRatioData) -> (String, String) {
    let pct = data.percentage;

    if data.total == 0 {
        (
            "No emotions logged in this period yet.".to_string(),
            "Whenever you're ready, noting even one feeling is a wonderful start.".to_string(),
        )
    } else if data.ratio >= HIGH_RATIO {
        (
            format!("You expressed {}% of your emotions. That's beautiful openness!", pct),
            "Keep honoring your feelings by letting them be seen and heard.".to_string(),
        )
    } else if data.ratio >= BALANCED_RATIO {
        (
            format!(
                "You expressed {}% of your emotions, finding a balance between sharing and holding back.",
                pct
            ),
            "Every feeling you let out is a step toward knowing yourself better.".to_string(),
        )
    } else {
        (
            format!(
                "You expressed {}% of your emotions. Some feelings were held close this time.",
                pct
            ),
            "It's okay to keep things in sometimes. Be gentle with yourself.".to_string(),
        )
    }
}
