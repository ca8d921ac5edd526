//! Server Configuration
//!
//! Read once from the process environment at startup.

use auth::AuthConfig;
use platform::config::{ConfigError, env_flag, env_opt, env_or, env_parse_or, split_list};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_STRATEGIES_FILE: &str = "data/strategies.json";

/// Allowed CORS origins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOrigins {
    Any,
    List(Vec<String>),
}

impl ClientOrigins {
    /// `*` (or nothing) allows any origin; otherwise a comma-separated list
    pub fn parse(raw: &str) -> Self {
        let origins = split_list(raw);
        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            ClientOrigins::Any
        } else {
            ClientOrigins::List(origins)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub client_origins: ClientOrigins,
    /// Postgres connection; without it the catalog file is served from memory
    pub database_url: Option<String>,
    pub strategies_file: PathBuf,
    /// Seed an empty Postgres catalog from `strategies_file`
    pub seed_strategies: bool,
    pub jwt_secret: Option<String>,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            client_origins: ClientOrigins::Any,
            database_url: None,
            strategies_file: PathBuf::from(DEFAULT_STRATEGIES_FILE),
            seed_strategies: false,
            jwt_secret: None,
            jwt_issuer: None,
            jwt_audience: None,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: env_parse_or("PORT", DEFAULT_PORT)?,
            client_origins: ClientOrigins::parse(&env_or("CLIENT_ORIGIN", "*")),
            database_url: env_opt("DATABASE_URL"),
            strategies_file: PathBuf::from(env_or("STRATEGIES_FILE", DEFAULT_STRATEGIES_FILE)),
            seed_strategies: env_flag("SEED_STRATEGIES"),
            jwt_secret: env_opt("AUTH_JWT_SECRET"),
            jwt_issuer: env_opt("AUTH_JWT_ISSUER"),
            jwt_audience: env_opt("AUTH_JWT_AUDIENCE"),
        })
    }

    /// Token verification settings
    ///
    /// Debug builds fall back to a random secret; release builds require
    /// `AUTH_JWT_SECRET`.
    pub fn auth_config(&self) -> Result<AuthConfig, ConfigError> {
        let base = match &self.jwt_secret {
            Some(secret) => AuthConfig::with_secret(secret.as_bytes().to_vec()),
            None if cfg!(debug_assertions) => AuthConfig::development(),
            None => return Err(ConfigError::Missing("AUTH_JWT_SECRET".to_string())),
        };

        Ok(AuthConfig {
            issuer: self.jwt_issuer.clone(),
            audience: self.jwt_audience.clone(),
            ..base
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_origins() {
        assert_eq!(ClientOrigins::parse("*"), ClientOrigins::Any);
        assert_eq!(ClientOrigins::parse(""), ClientOrigins::Any);
        assert_eq!(
            ClientOrigins::parse("http://localhost:5173, https://oblique.example"),
            ClientOrigins::List(vec![
                "http://localhost:5173".to_string(),
                "https://oblique.example".to_string(),
            ])
        );
    }

    #[test]
    fn test_auth_config_uses_explicit_secret() {
        let config = ApiConfig {
            jwt_secret: Some("0123456789abcdef0123456789abcdef".to_string()),
            jwt_issuer: Some("oblique".to_string()),
            ..ApiConfig::default()
        };

        let auth = config.auth_config().unwrap();
        assert_eq!(auth.jwt_secret, b"0123456789abcdef0123456789abcdef".to_vec());
        assert_eq!(auth.issuer.as_deref(), Some("oblique"));
        assert!(auth.audience.is_none());
    }

    #[test]
    fn test_auth_config_debug_fallback() {
        let auth = ApiConfig::default().auth_config();
        if cfg!(debug_assertions) {
            assert_eq!(auth.unwrap().jwt_secret.len(), 32);
        } else {
            assert!(matches!(auth, Err(ConfigError::Missing(_))));
        }
    }
}
