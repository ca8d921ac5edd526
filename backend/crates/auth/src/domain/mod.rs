//! Domain Layer
//!
//! - Token claims and their mapping to an [`Identity`](kernel::identity::Identity)
//! - The verifier trait (implemented in infrastructure)

pub mod claims;
pub mod verifier;
