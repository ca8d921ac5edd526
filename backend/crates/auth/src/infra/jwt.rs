//! HS256 JWT Identity Verifier
//!
//! Verifies identity tokens signed with a secret shared with the identity
//! provider, and can mint tokens for development and tests.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::sync::Arc;

use crate::application::config::{AuthConfig, MIN_SECRET_LEN};
use crate::domain::claims::{ANONYMOUS_PROVIDER, TokenClaims};
use crate::domain::verifier::IdentityVerifier;
use crate::error::{AuthError, AuthResult};
use kernel::identity::Identity;

/// JWT-backed identity verifier
#[derive(Clone)]
pub struct JwtIdentityVerifier {
    config: Arc<AuthConfig>,
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    /// Build a verifier; rejects secrets shorter than 32 bytes
    pub fn new(config: AuthConfig) -> AuthResult<Self> {
        if config.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::Config(format!(
                "JWT secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs();
        match &config.issuer {
            Some(iss) => validation.set_issuer(&[iss]),
            None => validation.iss = None,
        }
        match &config.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(&config.jwt_secret),
            encoding_key: EncodingKey::from_secret(&config.jwt_secret),
            validation,
            config: Arc::new(config),
        })
    }

    /// Mint a token for `identity`, valid for the configured TTL
    pub fn issue(&self, identity: &Identity) -> AuthResult<String> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = TokenClaims {
            sub: identity.uid.to_string(),
            email: identity.email.clone(),
            provider: identity
                .is_anonymous
                .then(|| ANONYMOUS_PROVIDER.to_string()),
            exp: now + self.config.token_ttl.as_secs(),
            iat: Some(now),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    fn decode_claims(&self, token: &str) -> AuthResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                let reason = match err.kind() {
                    JwtErrorKind::ExpiredSignature => "token expired",
                    JwtErrorKind::InvalidSignature => "invalid signature",
                    JwtErrorKind::InvalidIssuer => "unexpected issuer",
                    JwtErrorKind::InvalidAudience => "unexpected audience",
                    JwtErrorKind::InvalidToken | JwtErrorKind::Base64(_) | JwtErrorKind::Json(_) => {
                        "malformed token"
                    }
                    _ => "token validation failed",
                };
                AuthError::InvalidToken(reason.to_string())
            })
    }
}

impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, token: &str) -> AuthResult<Identity> {
        self.decode_claims(token)?
            .into_identity()
            .ok_or_else(|| AuthError::InvalidToken("missing subject".to_string()))
    }
}
