//! Streak detection over calendar days with at least one expressed emotion.
//!
//! Days are local calendar days under the engine's offset (see
//! [`AnalysisContext`]). A streak is a maximal run of consecutive qualifying
//! days; the current streak is the run that ends today.
//!
//! ## Fields Produced
//!
//! | Field | Type | Description |
//! |-------|------|-------------|
//! | `currentStreak` | integer | Run ending today, 0 if today has no expressed emotion |
//! | `longestStreak` | integer | Longest run anywhere in the range |
//! | `streakCount` | integer | Number of separate runs |
//! | `daysWithExpressed` | integer | Days with at least one expressed emotion |
//! | `totalDays` | integer | Days with any log, expressed or not |
//!
//! A day with only suppressed logs counts toward `totalDays` but breaks a run.
//!
//! ## Example
//!
//! Today is Mar 15. Logs:
//! - Mar 10, Mar 11: expressed
//! - Mar 12: suppressed only
//! - Mar 13, Mar 14, Mar 15: expressed
//!
//! Results:
//! - `currentStreak`: 3 (Mar 13..=15)
//! - `longestStreak`: 3
//! - `streakCount`: 2
//! - `daysWithExpressed`: 5
//! - `totalDays`: 6

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::analytics::engine::{AnalysisContext, PatternCalculator};
use crate::analytics::pattern::{plural, EmotionalPattern, PatternData, PatternType, StreakData};
use crate::analytics::time_range::{filter_by_time_range, local_day, TimeRange};
use crate::types::EmotionLog;
use crate::Result;

pub struct StreakCalculator;

impl StreakCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StreakCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternCalculator for StreakCalculator {
    fn name(&self) -> &str {
        "core.streak"
    }

    fn pattern_type(&self) -> PatternType {
        PatternType::Streak
    }

    fn calculate(
        &self,
        logs: &[EmotionLog],
        range: &TimeRange,
        ctx: &AnalysisContext,
    ) -> Result<EmotionalPattern> {
        calculate_streaks(logs, range, ctx)
    }
}

/// Filter `logs` to `range` and build the streak pattern.
pub fn calculate_streaks(
    logs: &[EmotionLog],
    range: &TimeRange,
    ctx: &AnalysisContext,
) -> Result<EmotionalPattern> {
    let filtered = filter_by_time_range(logs, range)?;
    let data = compute(&filtered, ctx);
    let (insight, encouragement) = narrate(&data);

    Ok(EmotionalPattern::new(
        *range,
        PatternData::Streak(data),
        insight,
        encouragement,
    ))
}

/// Map each logged day to whether it had an expressed emotion.
fn group_by_day(logs: &[&EmotionLog], ctx: &AnalysisContext) -> BTreeMap<NaiveDate, bool> {
    let mut days: BTreeMap<NaiveDate, bool> = BTreeMap::new();
    for log in logs {
        let expressed = days.entry(local_day(log.timestamp, &ctx.offset)).or_insert(false);
        *expressed |= log.is_expressed();
    }
    days
}

pub fn compute(logs: &[&EmotionLog], ctx: &AnalysisContext) -> StreakData {
    let days = group_by_day(logs, ctx);
    let qualifying = |day: &NaiveDate| days.get(day).copied().unwrap_or(false);

    // BTreeMap iteration is already ascending by day
    let mut longest_streak = 0u32;
    let mut streak_count = 0u32;
    let mut days_with_expressed = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for day in days.keys().filter(|day| qualifying(day)) {
        days_with_expressed += 1;
        run = match previous {
            Some(prev) if day.signed_duration_since(prev).num_days() == 1 => run + 1,
            _ => {
                streak_count += 1;
                1
            }
        };
        longest_streak = longest_streak.max(run);
        previous = Some(*day);
    }

    // Walk back from today while each day qualifies
    let mut current_streak = 0u32;
    let mut cursor = Some(ctx.today());
    while let Some(day) = cursor.filter(|day| qualifying(day)) {
        current_streak += 1;
        cursor = day.pred_opt();
    }

    StreakData {
        current_streak,
        longest_streak,
        streak_count,
        days_with_expressed,
        total_days: days.len() as u32,
    }
}

/// Length of the run ending today, straight from raw logs.
pub fn current_streak(logs: &[&EmotionLog], ctx: &AnalysisContext) -> u32 {
    compute(logs, ctx).current_streak
}

pub fn narrate(data: &StreakData) -> (String, String) {
    if data.days_with_expressed == 0 {
        (
            "No days with an expressed emotion in this period yet.".to_string(),
            "Sharing one feeling today could be the start of a new streak.".to_string(),
        )
    } else if data.current_streak > 0 {
        (
            format!(
                "You're on a {}-day streak of expressing your emotions!",
                data.current_streak
            ),
            "Keep it going, one feeling at a time.".to_string(),
        )
    } else {
        (
            format!(
                "Your longest streak was {} across {}.",
                plural(data.longest_streak as u64, "day"),
                plural(data.streak_count as u64, "streak"),
            ),
            "Every day is a fresh chance to begin again.".to_string(),
        )
    }
}
