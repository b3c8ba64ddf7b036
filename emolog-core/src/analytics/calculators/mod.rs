//! Built-in pattern calculators
//!
//! Each calculator lives in its own subdirectory and exposes:
//! - a free function that filters raw logs and builds the full pattern
//!   (e.g. [`expression_ratio::calculate_expression_ratio`])
//! - `compute` over already-filtered logs, used by the engine's quick accessors
//! - `narrate`, which picks the insight and encouragement text
//! - a [`PatternCalculator`](super::PatternCalculator) implementation
//!
//! Use [`create_default_engine`] to get an engine with all four registered.

pub mod common_emotions;
pub mod expression_ratio;
pub mod streak;
pub mod trend;

use super::AnalyticsEngine;
use crate::store::JournalStore;

/// Create an engine over `store` with all built-in calculators registered.
///
/// ```rust,ignore
/// use emolog_core::analytics::create_default_engine;
///
/// let engine = create_default_engine(store);
/// println!("Registered calculators: {:?}", engine.calculator_names());
/// ```
pub fn create_default_engine<S: JournalStore>(store: S) -> AnalyticsEngine<S> {
    let mut engine = AnalyticsEngine::new(store);
    engine.register(Box::new(expression_ratio::ExpressionRatioCalculator::new()));
    engine.register(Box::new(common_emotions::CommonEmotionsCalculator::new()));
    engine.register(Box::new(streak::StreakCalculator::new()));
    engine.register(Box::new(trend::TrendCalculator::new()));
    engine
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::PatternType;
    use crate::store::MemoryStore;

    #[test]
    fn test_default_engine_covers_every_pattern_type() {
        let mut engine = create_default_engine(MemoryStore::new());
        let result = engine
            .generate_analytics(Default::default())
            .expect("empty data never fails");

        let types: Vec<PatternType> = result.patterns.iter().map(|p| p.pattern_type).collect();
        assert_eq!(types, PatternType::ALL.to_vec());
    }
}
