//! Application Layer - Use Cases
//!
//! Server-side use cases (`browse_strategies`, `manage_favorites`,
//! `record_daily`) are driven by HTTP handlers. The client-side state
//! machines (`provider`, `daily_selection`, `search`) are driven by the CLI.

pub mod browse_strategies;
pub mod config;
pub mod daily_selection;
pub mod manage_favorites;
pub mod provider;
pub mod record_daily;
pub mod search;
