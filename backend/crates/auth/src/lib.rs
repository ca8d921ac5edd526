//! Auth (Identity) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Token claims, verifier trait
//! - `application/` - Use cases and configuration
//! - `infra/` - JWT verifier implementation
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Security Model
//! - Identity comes only from a verified bearer token; nothing else in the
//!   request is trusted
//! - No token → 401, token that fails verification → 403
//! - Guests sign in anonymously and still get a stable `uid`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::verifier::IdentityVerifier;
pub use error::{AuthError, AuthResult};
pub use infra::jwt::JwtIdentityVerifier;
pub use presentation::middleware::{AuthMiddlewareState, optional_identity, require_identity};
pub use presentation::router::auth_router;

// Re-export kernel types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
pub use kernel::identity::Identity;
