//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities.
//!
//! Strategy IDs are small integers assigned by whoever curates the deck;
//! user IDs are opaque strings issued by the identity provider.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable integer identifier of a strategy card
///
/// ```
/// use kernel::id::StrategyId;
/// let id: StrategyId = "42".parse().unwrap();
/// assert_eq!(id.value(), 42);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyId(i64);

impl StrategyId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StrategyId({})", self.0)
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StrategyId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<StrategyId> for i64 {
    fn from(id: StrategyId) -> Self {
        id.0
    }
}

/// Error when a path segment is not a strategy id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid strategy id: {0}")]
pub struct ParseStrategyIdError(String);

impl FromStr for StrategyId {
    type Err = ParseStrategyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ParseStrategyIdError(s.to_string()))
    }
}

/// Identity-provider user id (`uid`)
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
