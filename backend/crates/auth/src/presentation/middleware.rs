//! Auth Middleware
//!
//! Middleware for resolving the caller's identity from the bearer token.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use platform::client::{extract_bearer_token, extract_client_ip};
use std::sync::Arc;

use crate::application::VerifyIdentityUseCase;
use crate::domain::verifier::IdentityVerifier;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<V>
where
    V: IdentityVerifier + Clone + Send + Sync + 'static,
{
    pub verifier: Arc<V>,
}

impl<V> AuthMiddlewareState<V>
where
    V: IdentityVerifier + Clone + Send + Sync + 'static,
{
    pub fn new(verifier: V) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }
}

/// Middleware that requires a verified identity
///
/// On success the [`Identity`](kernel::identity::Identity) is inserted into
/// request extensions for downstream handlers.
pub async fn require_identity<V>(
    State(state): State<AuthMiddlewareState<V>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    V: IdentityVerifier + Clone + Send + Sync + 'static,
{
    let use_case = VerifyIdentityUseCase::new(state.verifier.clone());
    let token = extract_bearer_token(req.headers()).map(str::to_owned);

    let identity = match use_case.execute(token.as_deref()).await {
        Ok(identity) => identity,
        Err(e) => {
            let client_ip = req
                .extensions()
                .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
                .map(|info| info.0.ip());
            let client_ip = extract_client_ip(req.headers(), client_ip);
            tracing::debug!(client_ip = ?client_ip, path = %req.uri().path(), "Rejected unauthenticated request");
            return Err(e);
        }
    };

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Middleware that attaches an identity when a valid token is present
///
/// Never rejects: an invalid token is logged and the request continues
/// anonymously.
pub async fn optional_identity<V>(
    State(state): State<AuthMiddlewareState<V>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    V: IdentityVerifier + Clone + Send + Sync + 'static,
{
    let use_case = VerifyIdentityUseCase::new(state.verifier.clone());
    let token = extract_bearer_token(req.headers()).map(str::to_owned);

    if let Some(identity) = use_case.try_execute(token.as_deref()).await {
        req.extensions_mut().insert(identity);
    }

    next.run(req).await
}
