//! Application Configuration
//!
//! Configuration for the strategy application layer.

/// Default fuzzy-search threshold (0 = exact only, 1 = anything matches)
pub const DEFAULT_SEARCH_THRESHOLD: f64 = 0.6;

/// Durable-store key of the daily selection record
pub const DAILY_STORAGE_KEY: &str = "daily-strategy";

/// Strategy application configuration
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    /// Fuzzy-search threshold in `[0, 1]`
    pub search_threshold: f64,
    /// Durable-store key the daily selection is written under
    pub daily_storage_key: String,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            search_threshold: DEFAULT_SEARCH_THRESHOLD,
            daily_storage_key: DAILY_STORAGE_KEY.to_string(),
        }
    }
}

impl StrategyConfig {
    /// Override the search threshold, clamped to `[0, 1]`
    pub fn with_search_threshold(mut self, threshold: f64) -> Self {
        self.search_threshold = if threshold.is_nan() {
            DEFAULT_SEARCH_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }

    /// Minimum similarity a candidate needs to count as a match
    pub fn min_similarity(&self) -> f64 {
        1.0 - self.search_threshold
    }
}
