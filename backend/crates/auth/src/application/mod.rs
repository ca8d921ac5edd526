//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod config;
pub mod verify_identity;

pub use verify_identity::VerifyIdentityUseCase;
