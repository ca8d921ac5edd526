//! Strategy Error Types
//!
//! This module provides strategy-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::id::StrategyId;
use thiserror::Error;

/// Strategy-specific result type alias
pub type StrategyResult<T> = Result<T, StrategyError>;

/// Strategy-specific error variants
///
/// Lookups never produce `NotFound`; they return `None`. `NotFound` is for
/// mutations that reference a missing strategy and for the HTTP boundary.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Unknown strategy id
    #[error("Strategy not found")]
    NotFound(Option<StrategyId>),

    /// No daily record stored for today
    #[error("No strategy recorded for today")]
    DailyNotFound,

    /// Favorite or daily mutation without a signed-in user
    #[error("Must be logged in to {0}")]
    Unauthenticated(&'static str),

    /// Store unreachable (network, pool exhausted); safe to retry
    #[error("Strategy store unavailable: {0}")]
    Unavailable(String),

    /// Remote store answered with something unexpected
    #[error("Unexpected response from strategy store: {0}")]
    Upstream(String),

    /// Catalog data failed validation
    #[error("Invalid strategy catalog: {0}")]
    InvalidCatalog(String),

    /// Import wrote a different number of rows than expected
    #[error("Catalog import verification failed: expected {expected}, found {stored}")]
    ImportMismatch { expected: usize, stored: i64 },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StrategyError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StrategyError::NotFound(_) | StrategyError::DailyNotFound => ErrorKind::NotFound,
            StrategyError::Unauthenticated(_) => ErrorKind::Unauthorized,
            StrategyError::Unavailable(_) => ErrorKind::ServiceUnavailable,
            StrategyError::Upstream(_) => ErrorKind::BadGateway,
            StrategyError::Database(e) if is_transient(e) => ErrorKind::ServiceUnavailable,
            StrategyError::InvalidCatalog(_)
            | StrategyError::ImportMismatch { .. }
            | StrategyError::Database(_)
            | StrategyError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Whether a retry may succeed without any change on the caller's side
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::ServiceUnavailable
    }

    /// Convert to AppError
    ///
    /// Server-side details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        let kind = self.kind();
        let err = match self {
            StrategyError::Database(_) | StrategyError::Internal(_) => {
                AppError::new(kind, "Internal server error")
            }
            _ if kind == ErrorKind::ServiceUnavailable => {
                AppError::new(kind, "Strategy store unavailable")
            }
            _ => AppError::new(kind, self.to_string()),
        };

        if self.is_transient() {
            err.with_action("Retry in a moment")
        } else {
            err
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            StrategyError::Database(e) => {
                tracing::error!(error = %e, "Strategy database error");
            }
            StrategyError::Unavailable(msg) | StrategyError::Upstream(msg) => {
                tracing::error!(message = %msg, "Strategy store failure");
            }
            StrategyError::InvalidCatalog(msg) | StrategyError::Internal(msg) => {
                tracing::error!(message = %msg, "Strategy internal error");
            }
            StrategyError::ImportMismatch { expected, stored } => {
                tracing::error!(expected, stored, "Strategy import mismatch");
            }
            _ => {
                tracing::debug!(error = %self, "Strategy client error");
            }
        }
    }
}

fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
    )
}

impl From<StrategyError> for AppError {
    fn from(err: StrategyError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for StrategyError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<reqwest::Error> for StrategyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StrategyError::Upstream(err.to_string())
        } else {
            StrategyError::Unavailable(err.to_string())
        }
    }
}
