//! Analytics engine
//!
//! Calculators consume raw emotion logs bounded by a [`TimeRange`] and each
//! produce one [`EmotionalPattern`]. The engine resolves the window, runs every
//! registered calculator, projects chart data and keeps the latest result.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     ANALYTICS ENGINE                            │
//! │                                                                 │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────┐ ┌───────────┐  │
//! │  │ expression  │ │ common      │ │ streak      │ │ trend     │  │
//! │  │ ratio       │ │ emotions    │ │             │ │           │  │
//! │  └──────┬──────┘ └──────┬──────┘ └──────┬──────┘ └─────┬─────┘  │
//! │         │               │               │              │        │
//! │         ▼               ▼               ▼              ▼        │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │           AnalyticsEngine.generate_analytics()          │    │
//! │  │  - Resolves the time range (request or preferences)     │    │
//! │  │  - Flags insufficient data (< 3 logs in range)          │    │
//! │  │  - Runs every calculator, projects chart data           │    │
//! │  │  - Replaces the held AnalyticsResult                    │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use emolog_core::analytics::{create_default_engine, AnalyticsRequest};
//! use emolog_core::store::MemoryStore;
//!
//! let mut engine = create_default_engine(MemoryStore::new());
//! let result = engine.generate_analytics(AnalyticsRequest::default()).unwrap();
//!
//! assert!(!result.has_sufficient_data);
//! assert_eq!(result.patterns.len(), 4);
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use super::calculators::{common_emotions, expression_ratio, streak};
use super::chart::{self, ChartData};
use super::pattern::{
    CommonEmotionsData, EmotionalPattern, ExpressionRatioData, PatternType,
};
use super::preferences::{AnalyticsPreferences, PreferencesUpdate};
use super::summary::AnalyticsSummary;
use super::time_range::{filter_by_time_range, local_day, TimePreset, TimeRange};
use crate::error::Result;
use crate::store::JournalStore;
use crate::types::EmotionLog;

/// Fewest logs in range for a result to count as meaningful.
///
/// Below this the calculators still run; the result is only flagged.
pub const MIN_LOGS_FOR_INSIGHTS: usize = 3;

// ============================================
// Calculator context
// ============================================

/// Where "now" comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// Wall clock
    #[default]
    System,
    /// Pinned instant, for tests and replays
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(instant) => *instant,
        }
    }
}

/// Context provided to calculators during analysis.
///
/// Every day- or week-based calculator buckets with the same `offset`, and
/// "today" is the local day of `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisContext {
    /// UTC offset used for calendar-day boundaries
    pub offset: FixedOffset,
    /// The instant treated as now
    pub now: DateTime<Utc>,
}

impl AnalysisContext {
    /// Context with UTC day boundaries.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self {
            offset: Utc.fix(),
            now,
        }
    }

    pub fn today(&self) -> NaiveDate {
        local_day(self.now, &self.offset)
    }
}

/// The machine's current UTC offset.
pub fn local_offset() -> FixedOffset {
    *Local::now().offset()
}

// ============================================
// Calculator trait
// ============================================

/// Trait that all pattern calculators implement.
///
/// Calculators are stateless: they borrow the raw logs, filter them to the
/// range themselves, and return a freshly built pattern. They never fail on
/// empty input; the only error is an inverted range.
pub trait PatternCalculator: Send + Sync {
    /// Unique name, `namespace.calculator` (e.g. "core.streak").
    fn name(&self) -> &str;

    /// The pattern type this calculator produces.
    fn pattern_type(&self) -> PatternType;

    fn calculate(
        &self,
        logs: &[EmotionLog],
        range: &TimeRange,
        ctx: &AnalysisContext,
    ) -> Result<EmotionalPattern>;
}

// ============================================
// Requests and results
// ============================================

/// What to analyze. An empty request uses the preferences' default range.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalyticsRequest {
    pub time_range: Option<TimeRange>,
}

impl AnalyticsRequest {
    pub fn for_range(range: TimeRange) -> Self {
        Self {
            time_range: Some(range),
        }
    }
}

/// How much raw data fell inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCount {
    pub emotion_logs: usize,
    pub journal_entries: usize,
    /// Days spanned by the window, rounded up
    pub total_days: i64,
}

/// Output of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    /// One pattern per registered calculator, in registration order
    pub patterns: Vec<EmotionalPattern>,
    pub chart_data: BTreeMap<PatternType, ChartData>,
    pub has_sufficient_data: bool,
    pub time_range: TimeRange,
    pub data_count: DataCount,
}

impl AnalyticsResult {
    pub fn pattern(&self, pattern_type: PatternType) -> Option<&EmotionalPattern> {
        self.patterns.iter().find(|p| p.pattern_type == pattern_type)
    }
}

// ============================================
// Analytics engine
// ============================================

/// Engine that owns the preferences and the latest result.
///
/// The engine reads raw data through its [`JournalStore`] and never writes to
/// it. It is meant for a single consumer; overlapping callers simply
/// overwrite each other's result.
pub struct AnalyticsEngine<S> {
    store: S,
    calculators: Vec<Box<dyn PatternCalculator>>,
    preferences: AnalyticsPreferences,
    result: Option<AnalyticsResult>,
    last_request: Option<AnalyticsRequest>,
    offset: FixedOffset,
    clock: Clock,
}

impl<S: JournalStore> AnalyticsEngine<S> {
    /// Create an engine with no calculators, local day boundaries and default preferences.
    pub fn new(store: S) -> Self {
        let clock = Clock::System;
        Self {
            store,
            calculators: Vec::new(),
            preferences: AnalyticsPreferences::new(clock.now()),
            result: None,
            last_request: None,
            offset: local_offset(),
            clock,
        }
    }

    /// Use a fixed UTC offset for day and week boundaries.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_preferences(mut self, preferences: AnalyticsPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Register a calculator with the engine.
    pub fn register(&mut self, calculator: Box<dyn PatternCalculator>) {
        tracing::info!(
            calculator = calculator.name(),
            pattern = %calculator.pattern_type(),
            "Registered pattern calculator"
        );
        self.calculators.push(calculator);
    }

    /// Get list of registered calculator names.
    pub fn calculator_names(&self) -> Vec<&str> {
        self.calculators.iter().map(|c| c.name()).collect()
    }

    /// Check if a calculator is registered.
    pub fn has_calculator(&self, name: &str) -> bool {
        self.calculators.iter().any(|c| c.name() == name)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access for callers that write through the same store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn context(&self) -> AnalysisContext {
        AnalysisContext {
            offset: self.offset,
            now: self.clock.now(),
        }
    }

    /// The most recent result, if any run has happened.
    pub fn result(&self) -> Option<&AnalyticsResult> {
        self.result.as_ref()
    }

    /// Patterns of the latest result whose type is enabled in the preferences.
    pub fn visible_patterns(&self) -> Vec<&EmotionalPattern> {
        self.result
            .iter()
            .flat_map(|result| result.patterns.iter())
            .filter(|pattern| self.preferences.is_enabled(pattern.pattern_type))
            .collect()
    }

    /// Window for a request: explicit range, else the preferences' default.
    ///
    /// Preset ranges are re-anchored at the current clock.
    fn resolve_range(&self, requested: Option<&TimeRange>, now: DateTime<Utc>) -> TimeRange {
        requested
            .unwrap_or(&self.preferences.default_time_range)
            .resolve(now)
    }

    /// Run every calculator over the resolved window and keep the result.
    ///
    /// Empty data is not an error; it shows up as `has_sufficient_data = false`
    /// and zeroed patterns. An inverted range is returned as
    /// [`Error::InvalidTimeRange`](crate::Error::InvalidTimeRange).
    pub fn generate_analytics(&mut self, request: AnalyticsRequest) -> Result<&AnalyticsResult> {
        let ctx = self.context();
        let range = self.resolve_range(request.time_range.as_ref(), ctx.now);

        let logs = self.store.emotion_logs();
        let emotion_logs = filter_by_time_range(logs, &range)?.len();
        let journal_entries = filter_by_time_range(self.store.journal_entries(), &range)?.len();
        let has_sufficient_data = emotion_logs >= MIN_LOGS_FOR_INSIGHTS;

        tracing::debug!(
            start = %range.start,
            end = %range.end,
            preset = range.preset.map(|p| p.as_str()),
            emotion_logs,
            journal_entries,
            calculators = self.calculators.len(),
            "Generating analytics"
        );

        if !has_sufficient_data {
            tracing::info!(
                emotion_logs,
                minimum = MIN_LOGS_FOR_INSIGHTS,
                "Not enough emotion logs for meaningful insights"
            );
        }

        let mut patterns = Vec::with_capacity(self.calculators.len());
        let mut chart_data = BTreeMap::new();
        for calculator in &self.calculators {
            let pattern = calculator.calculate(logs, &range, &ctx)?;
            chart_data.insert(pattern.pattern_type, chart::project(&pattern));
            patterns.push(pattern);
        }

        let result = AnalyticsResult {
            patterns,
            chart_data,
            has_sufficient_data,
            time_range: range,
            data_count: DataCount {
                emotion_logs,
                journal_entries,
                total_days: range.total_days(),
            },
        };

        tracing::info!(
            patterns = result.patterns.len(),
            has_sufficient_data,
            total_days = result.data_count.total_days,
            "Analytics generated"
        );

        self.last_request = Some(request);
        Ok(self.result.insert(result))
    }

    /// Analyze a named window ending now.
    pub fn generate_preset_analytics(&mut self, preset: TimePreset) -> Result<&AnalyticsResult> {
        let range = TimeRange::from_preset(preset, self.clock.now());
        self.generate_analytics(AnalyticsRequest::for_range(range))
    }

    /// Analyze a custom window.
    pub fn generate_custom_analytics(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<&AnalyticsResult> {
        let range = TimeRange::new(start, end)?;
        self.generate_analytics(AnalyticsRequest::for_range(range))
    }

    /// Reload the store and, if a result exists, regenerate it with the
    /// last request.
    ///
    /// Returns the new result, or `None` when nothing had been generated yet.
    pub fn refresh_data(&mut self) -> Result<Option<&AnalyticsResult>> {
        self.store.refresh()?;
        tracing::debug!(
            emotion_logs = self.store.emotion_logs().len(),
            journal_entries = self.store.journal_entries().len(),
            "Journal store refreshed"
        );

        match self.last_request {
            Some(request) if self.result.is_some() => self.generate_analytics(request).map(Some),
            _ => Ok(None),
        }
    }

    pub fn preferences(&self) -> &AnalyticsPreferences {
        &self.preferences
    }

    /// Merge a partial preferences change.
    ///
    /// When the default range changes and a result exists, the result is
    /// regenerated over the new default range.
    pub fn update_preferences(&mut self, update: PreferencesUpdate) -> Result<()> {
        if let Some(range) = &update.default_time_range {
            range.validate()?;
        }

        let range_changed = self.preferences.apply(update);
        tracing::debug!(
            range_changed,
            enabled = self.preferences.enabled_insights.len(),
            "Analytics preferences updated"
        );

        if range_changed && self.result.is_some() {
            self.generate_analytics(AnalyticsRequest::default())?;
        }
        Ok(())
    }

    // ============================================
    // Quick accessors (always recomputed from raw data)
    // ============================================

    fn filtered_logs(&self, range: Option<&TimeRange>) -> Result<Vec<&EmotionLog>> {
        let range = self.resolve_range(range, self.clock.now());
        filter_by_time_range(self.store.emotion_logs(), &range)
    }

    /// Expressed vs suppressed counts for `range` (default range if `None`).
    pub fn expression_ratio(&self, range: Option<&TimeRange>) -> Result<ExpressionRatioData> {
        Ok(expression_ratio::compute(&self.filtered_logs(range)?))
    }

    /// Frequency ranking for `range` (default range if `None`).
    pub fn common_emotions(&self, range: Option<&TimeRange>) -> Result<CommonEmotionsData> {
        Ok(common_emotions::compute(&self.filtered_logs(range)?))
    }

    /// Consecutive expressed days ending today, within the default range.
    pub fn current_streak(&self) -> Result<u32> {
        Ok(streak::current_streak(&self.filtered_logs(None)?, &self.context()))
    }

    /// Dashboard summary over the default range.
    pub fn analytics_summary(&self) -> Result<AnalyticsSummary> {
        Ok(AnalyticsSummary::compute(&self.filtered_logs(None)?, &self.context()))
    }
}
