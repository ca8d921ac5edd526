//! Strategy Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Strategy and daily record entities, repository traits
//! - `application/` - Server use cases plus the client-side provider,
//!   daily selection and search
//! - `infra/` - In-memory, PostgreSQL and HTTP store implementations
//! - `presentation/` - HTTP handlers
//!
//! ## Data Model
//! - The catalog is read-only to clients and always ordered by id
//! - Favorites are a per-user set held by the server
//! - One daily record per (user, UTC calendar day)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::StrategyConfig;
pub use application::daily_selection::{DailySelection, DailyState};
pub use application::provider::{ProviderStatus, StrategiesProvider};
pub use application::search::{SearchOutcome, SearchSession, search};
pub use domain::entities::{DailyRecord, Strategy};
pub use domain::value_objects::CalendarDay;
pub use error::{StrategyError, StrategyResult};
pub use infra::http::HttpStrategyStore;
pub use infra::memory::MemoryStrategyStore;
pub use infra::postgres::PgStrategyRepository;
pub use presentation::handlers::StrategyAppState;
pub use presentation::router::{daily_router, favorites_router, strategies_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
