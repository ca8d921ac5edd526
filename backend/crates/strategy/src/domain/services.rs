//! Domain Services
//!
//! Pure catalog rules shared by every store implementation.

use std::collections::HashSet;

use crate::domain::entities::Strategy;
use crate::error::{StrategyError, StrategyResult};

/// Sort a catalog by id and reject duplicate ids or blank texts
pub fn normalize_catalog(mut strategies: Vec<Strategy>) -> StrategyResult<Vec<Strategy>> {
    let mut seen = HashSet::with_capacity(strategies.len());
    for strategy in &strategies {
        if strategy.text.trim().is_empty() {
            return Err(StrategyError::InvalidCatalog(format!(
                "strategy {} has empty text",
                strategy.id
            )));
        }
        if !seen.insert(strategy.id) {
            return Err(StrategyError::InvalidCatalog(format!(
                "duplicate strategy id {}",
                strategy.id
            )));
        }
    }

    strategies.sort_by_key(|s| s.id);
    Ok(strategies)
}

/// Parse a `[{id, text}, ...]` JSON document into a normalised catalog
pub fn parse_catalog(json: &str) -> StrategyResult<Vec<Strategy>> {
    let strategies: Vec<Strategy> = serde_json::from_str(json)
        .map_err(|e| StrategyError::InvalidCatalog(format!("not a strategy list: {e}")))?;
    normalize_catalog(strategies)
}
