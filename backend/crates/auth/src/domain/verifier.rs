//! Verifier Trait
//!
//! Interface for turning a bearer token into an identity. Implementation is
//! in the infrastructure layer.

use crate::error::AuthResult;
use kernel::identity::Identity;

/// Identity verifier trait
#[trait_variant::make(IdentityVerifier: Send)]
pub trait LocalIdentityVerifier {
    /// Verify `token` and return the identity it was issued to
    ///
    /// Fails with `AuthError::InvalidToken` for any token that does not
    /// verify.
    async fn verify(&self, token: &str) -> AuthResult<Identity>;
}
