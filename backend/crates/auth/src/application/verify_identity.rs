//! Verify Identity Use Case

use std::sync::Arc;

use crate::domain::verifier::IdentityVerifier;
use crate::error::{AuthError, AuthResult};
use kernel::identity::Identity;

/// Verify Identity Use Case
pub struct VerifyIdentityUseCase<V>
where
    V: IdentityVerifier,
{
    verifier: Arc<V>,
}

impl<V> VerifyIdentityUseCase<V>
where
    V: IdentityVerifier,
{
    pub fn new(verifier: Arc<V>) -> Self {
        Self { verifier }
    }

    /// Resolve the caller from an optional bearer token
    ///
    /// Missing token and bad token are distinct failures so the boundary can
    /// answer 401 and 403 respectively.
    pub async fn execute(&self, token: Option<&str>) -> AuthResult<Identity> {
        let token = token.ok_or(AuthError::MissingToken)?;
        let identity = self.verifier.verify(token).await?;

        tracing::debug!(uid = %identity.uid, anonymous = identity.is_anonymous, "Identity verified");

        Ok(identity)
    }

    /// Like `execute`, but any failure yields `None`
    pub async fn try_execute(&self, token: Option<&str>) -> Option<Identity> {
        match self.execute(token).await {
            Ok(identity) => Some(identity),
            Err(AuthError::MissingToken) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Optional auth failed, continuing without identity");
                None
            }
        }
    }
}
