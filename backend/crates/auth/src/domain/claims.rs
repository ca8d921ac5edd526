//! Token Claims

use kernel::identity::Identity;
use serde::{Deserialize, Serialize};

/// Sign-in provider value that marks a guest session
pub const ANONYMOUS_PROVIDER: &str = "anonymous";

/// Claims carried by an identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Sign-in provider (`password`, `google.com`, `anonymous`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Expiration (Unix seconds)
    pub exp: u64,
    /// Issued at (Unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl TokenClaims {
    pub fn is_anonymous(&self) -> bool {
        self.provider.as_deref() == Some(ANONYMOUS_PROVIDER)
    }

    /// Map verified claims to an identity; `None` when `sub` is blank
    pub fn into_identity(self) -> Option<Identity> {
        if self.sub.trim().is_empty() {
            return None;
        }
        let is_anonymous = self.is_anonymous();
        let mut identity = Identity::new(self.sub);
        identity.email = self.email;
        identity.is_anonymous = is_anonymous;
        Some(identity)
    }
}
