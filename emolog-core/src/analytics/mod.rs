//! Analytics module for emolog
//!
//! Turns raw emotion logs into encouraging, privacy-preserving insights:
//! - Time windows and the filter stage ([`time_range`])
//! - Four pattern calculators: expression ratio, common emotions, streaks,
//!   weekly trend ([`calculators`])
//! - Chart projection ([`chart`])
//! - Orchestration, preferences and the dashboard summary ([`engine`],
//!   [`preferences`], [`summary`])
//!
//! Everything runs synchronously over local data. Nothing here touches the
//! network or the disk.

pub mod calculators;
pub mod chart;
pub mod engine;
pub mod pattern;
pub mod preferences;
pub mod summary;
pub mod time_range;

// Engine exports
pub use calculators::create_default_engine;
pub use engine::{
    local_offset, AnalysisContext, AnalyticsEngine, AnalyticsRequest, AnalyticsResult, Clock,
    DataCount, PatternCalculator, MIN_LOGS_FOR_INSIGHTS,
};

pub use chart::{ChartData, ChartDataset};
pub use pattern::{
    CommonEmotionsData, EmotionCount, EmotionalPattern, ExpressionRatioData, PatternData,
    PatternType, StreakData, TrendData, TrendDirection, WeeklyData,
};
pub use preferences::{AnalyticsPreferences, PreferencesUpdate};
pub use summary::AnalyticsSummary;
pub use time_range::{filter_by_time_range, TimePreset, TimeRange, Timestamped};
