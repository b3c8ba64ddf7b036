//! Chart projection: turn a pattern into labeled series for a chart widget.
//!
//! Colors come from a fixed palette of eight pastels assigned by index. Past
//! the eighth category the palette cycles.

use serde::{Deserialize, Serialize};

use super::pattern::{EmotionalPattern, PatternData};

/// Fill colors, in assignment order.
pub const PALETTE: [&str; 8] = [
    "#FFB3BA", // rose
    "#BAE1FF", // sky
    "#BAFFC9", // mint
    "#FFFFBA", // butter
    "#FFDFBA", // peach
    "#E0BBE4", // lilac
    "#C9F1F0", // aqua
    "#F8C8DC", // blush
];

/// Outline colors, parallel to [`PALETTE`].
pub const BORDER_PALETTE: [&str; 8] = [
    "#E8929B", "#8CC4EE", "#8EE3A5", "#E6E68C", "#EDBF8E", "#C394C9", "#9DD8D6", "#E0A3BD",
];

/// Generic chart payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// One labeled series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: Vec<String>,
    pub border_color: Vec<String>,
}

impl ChartData {
    fn single_series(label: &str, points: Vec<(String, f64)>) -> Self {
        let (labels, data): (Vec<String>, Vec<f64>) = points.into_iter().unzip();
        let background_color = (0..data.len()).map(|i| palette_color(i).to_string()).collect();
        let border_color = (0..data.len()).map(|i| border_color(i).to_string()).collect();

        Self {
            labels,
            datasets: vec![ChartDataset {
                label: label.to_string(),
                data,
                background_color,
                border_color,
            }],
        }
    }
}

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn border_color(index: usize) -> &'static str {
    BORDER_PALETTE[index % BORDER_PALETTE.len()]
}

/// Project a pattern into chart data.
pub fn project(pattern: &EmotionalPattern) -> ChartData {
    match &pattern.data {
        PatternData::ExpressionRatio(data) => ChartData::single_series(
            "Emotions",
            vec![
                ("Expressed".to_string(), data.expressed as f64),
                ("Suppressed".to_string(), data.suppressed as f64),
            ],
        ),
        PatternData::CommonEmotions(data) => ChartData::single_series(
            "Times logged",
            data.emotions
                .iter()
                .map(|e| (e.emotion.clone(), e.count as f64))
                .collect(),
        ),
        PatternData::Streak(data) => ChartData::single_series(
            "Days",
            vec![
                ("Current".to_string(), data.current_streak as f64),
                ("Longest".to_string(), data.longest_streak as f64),
            ],
        ),
        PatternData::Trend(data) => ChartData::single_series(
            "Expression %",
            data.weekly_data
                .iter()
                .map(|week| {
                    (
                        week.week_start.format("%b %d").to_string(),
                        (week.expression_ratio * 100.0).round(),
                    )
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::pattern::{
        CommonEmotionsData, EmotionCount, ExpressionRatioData, StreakData, TrendData, WeeklyData,
    };
    use crate::analytics::time_range::TimeRange;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn pattern(data: PatternData) -> EmotionalPattern {
        let range = TimeRange::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        )
        .unwrap();
        EmotionalPattern::new(range, data, "", "")
    }

    fn assert_aligned(chart: &ChartData) {
        let dataset = &chart.datasets[0];
        assert_eq!(chart.labels.len(), dataset.data.len());
        assert_eq!(dataset.background_color.len(), dataset.data.len());
        assert_eq!(dataset.border_color.len(), dataset.data.len());
    }

    #[test]
    fn test_ratio_chart() {
        let chart = project(&pattern(PatternData::ExpressionRatio(ExpressionRatioData {
            expressed: 4,
            suppressed: 1,
            total: 5,
            ratio: 0.8,
            percentage: 80,
        })));

        assert_eq!(chart.labels, vec!["Expressed", "Suppressed"]);
        assert_eq!(chart.datasets[0].data, vec![4.0, 1.0]);
        assert_eq!(chart.datasets[0].background_color, vec![PALETTE[0], PALETTE[1]]);
        assert_aligned(&chart);
    }

    #[test]
    fn test_common_emotions_chart() {
        let chart = project(&pattern(PatternData::CommonEmotions(CommonEmotionsData {
            emotions: vec![
                EmotionCount { emotion: "calm".to_string(), count: 3 },
                EmotionCount { emotion: "joy".to_string(), count: 2 },
            ],
            total_logs: 5,
            unique_emotions: 2,
        })));

        assert_eq!(chart.labels, vec!["calm", "joy"]);
        assert_eq!(chart.datasets[0].data, vec![3.0, 2.0]);
        assert_aligned(&chart);
    }

    #[test]
    fn test_streak_chart() {
        let chart = project(&pattern(PatternData::Streak(StreakData {
            current_streak: 2,
            longest_streak: 3,
            streak_count: 2,
            days_with_expressed: 5,
            total_days: 5,
        })));
        assert_eq!(chart.labels, vec!["Current", "Longest"]);
        assert_eq!(chart.datasets[0].data, vec![2.0, 3.0]);
    }

    #[test]
    fn test_trend_chart_cycles_palette_past_eight_weeks() {
        let first = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let weekly_data: Vec<WeeklyData> = (0..10)
            .map(|i| WeeklyData {
                week_start: first + chrono::Duration::weeks(i),
                expressed: 1,
                suppressed: 2,
                total: 3,
                expression_ratio: 1.0 / 3.0,
            })
            .collect();
        let chart = project(&pattern(PatternData::Trend(TrendData {
            total_weeks: weekly_data.len(),
            weekly_data,
            ..Default::default()
        })));

        assert_eq!(chart.labels[0], "Jan 07");
        assert_eq!(chart.datasets[0].data[0], 33.0);
        assert_eq!(chart.datasets[0].background_color[8], PALETTE[0]);
        assert_aligned(&chart);
    }

    #[test]
    fn test_empty_patterns_project_cleanly() {
        for data in [
            PatternData::ExpressionRatio(ExpressionRatioData::default()),
            PatternData::CommonEmotions(CommonEmotionsData::default()),
            PatternData::Streak(StreakData::default()),
            PatternData::Trend(TrendData::default()),
        ] {
            assert_aligned(&project(&pattern(data)));
        }
    }
}
