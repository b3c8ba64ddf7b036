//! Integration tests for the emolog analytics engine
//!
//! These tests use the fixture export in `tests/fixtures/journal.json` to verify
//! the end-to-end flow from a journal store through every calculator.

use chrono::{DateTime, Duration, FixedOffset, Offset, TimeZone, Utc};
use emolog_core::analytics::{
    create_default_engine, AnalyticsEngine, AnalyticsPreferences, AnalyticsRequest, Clock,
    PatternData, PatternType, PreferencesUpdate, TimePreset, TimeRange, TrendDirection,
};
use emolog_core::{EmotionAction, EmotionLog, JournalStore, JsonFileStore, MemoryStore};
use std::path::PathBuf;
use tempfile::TempDir;

/// Get the path to a fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// The instant the fixture data is analyzed at: 2024-03-15 20:00 UTC.
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 20, 0, 0).unwrap()
}

fn engine_for<S: JournalStore>(store: S) -> AnalyticsEngine<S> {
    create_default_engine(store)
        .with_offset(Utc.fix())
        .with_clock(Clock::Fixed(now()))
        .with_preferences(AnalyticsPreferences::new(now()))
}

// ============================================
// Fixture Export Tests
// ============================================

#[test]
fn test_fixture_month_analytics() {
    let store = JsonFileStore::open(fixture_path("journal.json")).expect("fixture should load");
    assert_eq!(store.emotion_logs().len(), 6);
    assert_eq!(store.journal_entries().len(), 3);

    let mut engine = engine_for(store);
    let result = engine
        .generate_analytics(AnalyticsRequest::default())
        .expect("analytics should succeed");

    // January log falls outside the month; the undated entry never counts
    assert!(result.has_sufficient_data);
    assert_eq!(result.data_count.emotion_logs, 5);
    assert_eq!(result.data_count.journal_entries, 2);
    assert_eq!(result.data_count.total_days, 29);
    assert_eq!(result.time_range.preset, Some(TimePreset::Month));

    let types: Vec<PatternType> = result.patterns.iter().map(|p| p.pattern_type).collect();
    assert_eq!(types, PatternType::ALL.to_vec());
    assert_eq!(result.chart_data.len(), 4);

    let Some(PatternData::ExpressionRatio(ratio)) =
        result.pattern(PatternType::ExpressionRatio).map(|p| &p.data)
    else {
        panic!("missing expression ratio");
    };
    assert_eq!((ratio.expressed, ratio.suppressed, ratio.total), (3, 2, 5));
    assert_eq!(ratio.percentage, 60);

    let Some(PatternData::CommonEmotions(common)) =
        result.pattern(PatternType::CommonEmotions).map(|p| &p.data)
    else {
        panic!("missing common emotions");
    };
    let ranked: Vec<(&str, usize)> = common
        .emotions
        .iter()
        .map(|e| (e.emotion.as_str(), e.count))
        .collect();
    assert_eq!(ranked, vec![("grateful", 2), ("anxious", 2), ("relieved", 1)]);
    assert_eq!(common.total_logs, 5);

    let Some(PatternData::Streak(streak)) = result.pattern(PatternType::Streak).map(|p| &p.data)
    else {
        panic!("missing streak");
    };
    assert_eq!(streak.current_streak, 3);
    assert_eq!(streak.longest_streak, 3);
    assert_eq!(streak.streak_count, 1);
    assert_eq!(streak.total_days, 4);

    let Some(PatternData::Trend(trend)) = result.pattern(PatternType::Trend).map(|p| &p.data)
    else {
        panic!("missing trend");
    };
    assert_eq!(trend.total_weeks, 2);
    assert_eq!(trend.trend_direction, TrendDirection::Improving);
    assert!((trend.average_expression_ratio - 0.375).abs() < 1e-9);

    let chart = &result.chart_data[&PatternType::Trend];
    assert_eq!(chart.labels, vec!["Mar 03", "Mar 10"]);
    assert_eq!(chart.datasets[0].data, vec![0.0, 75.0]);
}

#[test]
fn test_fixture_quarter_includes_older_logs() {
    let store = JsonFileStore::open(fixture_path("journal.json")).unwrap();
    let mut engine = engine_for(store);

    let result = engine.generate_preset_analytics(TimePreset::Quarter).unwrap();
    assert_eq!(result.data_count.emotion_logs, 6);
    assert_eq!(result.time_range.preset, Some(TimePreset::Quarter));
}

#[test]
fn test_offset_shifts_day_boundaries() {
    // At UTC+10 the 18:00 UTC log on the 13th lands on the 14th local,
    // leaving the 13th with only a suppressed log.
    let store = JsonFileStore::open(fixture_path("journal.json")).unwrap();
    let mut engine = engine_for(store).with_offset(FixedOffset::east_opt(10 * 3600).unwrap());

    let result = engine.generate_analytics(AnalyticsRequest::default()).unwrap();
    let Some(PatternData::Streak(streak)) = result.pattern(PatternType::Streak).map(|p| &p.data)
    else {
        panic!("missing streak");
    };
    // local today is the 16th, which has no logs
    assert_eq!(streak.current_streak, 0);
    assert_eq!(streak.longest_streak, 2);
}

// ============================================
// Live Store Tests
// ============================================

#[test]
fn test_json_store_refresh_picks_up_new_logs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journal.json");

    let mut store = MemoryStore::new();
    store.add_emotion_log(EmotionLog::new(
        "hopeful",
        EmotionAction::Expressed,
        now() - Duration::days(1),
    ));
    std::fs::write(&path, serde_json::to_string(&store).unwrap()).unwrap();

    let mut engine = engine_for(JsonFileStore::open(&path).unwrap());
    let first = engine.generate_analytics(AnalyticsRequest::default()).unwrap();
    assert!(!first.has_sufficient_data);
    assert_eq!(first.data_count.emotion_logs, 1);

    for days in [2, 3] {
        store.add_emotion_log(EmotionLog::new(
            "tired",
            EmotionAction::Suppressed,
            now() - Duration::days(days),
        ));
    }
    std::fs::write(&path, serde_json::to_string(&store).unwrap()).unwrap();

    let refreshed = engine
        .refresh_data()
        .unwrap()
        .expect("existing result should regenerate");
    assert!(refreshed.has_sufficient_data);
    assert_eq!(refreshed.data_count.emotion_logs, 3);
}

#[test]
fn test_custom_range_survives_refresh() {
    let store = JsonFileStore::open(fixture_path("journal.json")).unwrap();
    let mut engine = engine_for(store);

    let start = Utc.with_ymd_and_hms(2024, 3, 13, 0, 0, 0).unwrap();
    let range = TimeRange::new(start, now()).unwrap();
    engine
        .generate_analytics(AnalyticsRequest::for_range(range))
        .unwrap();

    let result = engine.refresh_data().unwrap().unwrap();
    assert_eq!(result.time_range, range);
    assert_eq!(result.data_count.emotion_logs, 4);
}

#[test]
fn test_preferences_round_trip_through_engine() {
    let mut engine = engine_for(MemoryStore::new());
    engine.generate_analytics(AnalyticsRequest::default()).unwrap();

    engine
        .update_preferences(PreferencesUpdate {
            enabled_insights: Some(vec![PatternType::ExpressionRatio]),
            last_viewed_insights: Some(now()),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(engine.visible_patterns().len(), 1);
    assert_eq!(engine.preferences().last_viewed_insights, Some(now()));

    let json = serde_json::to_value(engine.preferences()).unwrap();
    assert_eq!(json["enabledInsights"][0], "expression-ratio");
    assert_eq!(json["lastViewedInsights"], now().timestamp_millis());
}

#[test]
fn test_result_serializes_in_camel_case() {
    let store = JsonFileStore::open(fixture_path("journal.json")).unwrap();
    let mut engine = engine_for(store);
    let result = engine.generate_analytics(AnalyticsRequest::default()).unwrap();

    let json = serde_json::to_value(result).unwrap();
    assert_eq!(json["hasSufficientData"], true);
    assert_eq!(json["dataCount"]["emotionLogs"], 5);
    assert_eq!(json["patterns"][0]["type"], "expression-ratio");
    assert_eq!(json["patterns"][0]["data"]["expressed"], 3);
    assert_eq!(json["patterns"][0]["data"]["percentage"], 60);
    assert_eq!(json["patterns"][2]["data"]["currentStreak"], 3);
    assert!(json["chartData"]["streak"]["datasets"].is_array());
}
