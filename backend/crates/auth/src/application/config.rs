//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Minimum accepted HMAC secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret shared with the identity provider
    pub jwt_secret: Vec<u8>,
    /// Expected `iss` claim, if the provider sets one
    pub issuer: Option<String>,
    /// Expected `aud` claim, if the provider sets one
    pub audience: Option<String>,
    /// Clock skew tolerated when checking `exp`
    pub leeway: Duration,
    /// Lifetime of tokens issued by [`JwtIdentityVerifier::issue`](crate::JwtIdentityVerifier::issue)
    pub token_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            issuer: None,
            audience: None,
            leeway: Duration::from_secs(60),
            token_ttl: Duration::from_secs(3600),
        }
    }
}

impl AuthConfig {
    /// Create config with an explicit secret
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create config with a random secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; MIN_SECRET_LEN];
        rand::rng().fill_bytes(&mut secret);
        Self::with_secret(secret)
    }

    /// Create config for development
    pub fn development() -> Self {
        Self {
            token_ttl: Duration::from_secs(30 * 24 * 3600),
            ..Self::with_random_secret()
        }
    }

    pub fn leeway_secs(&self) -> u64 {
        self.leeway.as_secs()
    }
}
