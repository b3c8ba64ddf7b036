//! Common emotions: frequency ranking of what people write down.

use std::collections::HashMap;

use crate::analytics::engine::{AnalysisContext, PatternCalculator};
use crate::analytics::pattern::{
    plural, CommonEmotionsData, EmotionCount, EmotionalPattern, PatternData, PatternType,
};
use crate::analytics::time_range::{filter_by_time_range, TimeRange};
use crate::types::EmotionLog;
use crate::Result;

/// Number of ranked emotions kept in the pattern.
pub const TOP_EMOTIONS: usize = 5;

pub struct CommonEmotionsCalculator;

impl CommonEmotionsCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CommonEmotionsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternCalculator for CommonEmotionsCalculator {
    fn name(&self) -> &str {
        "core.common_emotions"
    }

    fn pattern_type(&self) -> PatternType {
        PatternType::CommonEmotions
    }

    fn calculate(
        &self,
        logs: &[EmotionLog],
        range: &TimeRange,
        _ctx: &AnalysisContext,
    ) -> Result<EmotionalPattern> {
        analyze_common_emotions(logs, range)
    }
}

/// Filter `logs` to `range` and build the common-emotions pattern.
pub fn analyze_common_emotions(logs: &[EmotionLog], range: &TimeRange) -> Result<EmotionalPattern> {
    let filtered = filter_by_time_range(logs, range)?;
    let data = compute(&filtered);
    let (insight, encouragement) = narrate(&data);

    Ok(EmotionalPattern::new(
        *range,
        PatternData::CommonEmotions(data),
        insight,
        encouragement,
    ))
}

/// Trimmed, lowercased log text.
pub fn normalize(content: &str) -> String {
    content.trim().to_lowercase()
}

/// Rank normalized texts by count.
///
/// Ties keep the order in which each text first appears in `logs`.
pub fn compute(logs: &[&EmotionLog]) -> CommonEmotionsData {
    let mut first_seen: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for log in logs {
        let emotion = normalize(&log.content);
        let count = counts.entry(emotion.clone()).or_insert(0);
        if *count == 0 {
            first_seen.push(emotion);
        }
        *count += 1;
    }

    let mut ranked: Vec<EmotionCount> = first_seen
        .into_iter()
        .map(|emotion| {
            let count = counts.get(&emotion).copied().unwrap_or(0);
            EmotionCount { emotion, count }
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    let unique_emotions = ranked.len();
    ranked.truncate(TOP_EMOTIONS);

    CommonEmotionsData {
        emotions: ranked,
        total_logs: logs.len(),
        unique_emotions,
    }
}

pub fn narrate(data: &CommonEmotionsData) -> (String, String) {
    match data.emotions.first() {
        None => (
            "No emotions recorded in this period yet.".to_string(),
            "Try naming what you feel. Even a single word helps.".to_string(),
        ),
        Some(top) => (
            format!(
                "Your most common emotion was \"{}\" ({}), out of {} you noticed.",
                top.emotion,
                plural(top.count as u64, "time"),
                plural(data.unique_emotions as u64, "different emotion"),
            ),
            "Noticing patterns in your feelings is a powerful kind of self-awareness.".to_string(),
        ),
    }
}
