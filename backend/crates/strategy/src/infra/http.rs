//! HTTP Strategy Store
//!
//! Client-side store talking to the API over `reqwest`. Protected calls
//! carry the bearer token; the server derives the user from it, so the
//! `user` arguments of the repository traits are not sent.

use kernel::id::{StrategyId, UserId};
use kernel::identity::Identity;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::entities::{DailyRecord, Strategy};
use crate::domain::repository::{DailyRecordRepository, FavoritesRepository, StrategyCatalog};
use crate::domain::services::normalize_catalog;
use crate::domain::value_objects::CalendarDay;
use crate::error::{StrategyError, StrategyResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct MeBody {
    user: Identity,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetDailyBody {
    strategy_id: StrategyId,
}

/// Strategy store reached over the HTTP API
#[derive(Clone)]
pub struct HttpStrategyStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStrategyStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("oblique/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "HTTP client setup failed, using defaults without timeout");
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token: String = token.into();
        self.token = Some(token).filter(|t| !t.trim().is_empty());
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and map non-success statuses onto `StrategyError`
    async fn send(&self, builder: RequestBuilder) -> StrategyResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());

        tracing::debug!(status = %status, message = %message, "Strategy API request failed");

        Err(match status {
            StatusCode::NOT_FOUND => StrategyError::NotFound(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                StrategyError::Unauthenticated("access this resource")
            }
            StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::BAD_GATEWAY
            | StatusCode::GATEWAY_TIMEOUT => StrategyError::Unavailable(message),
            _ => StrategyError::Upstream(format!("{status}: {message}")),
        })
    }

    /// Identity behind the configured token, verified by the server
    ///
    /// `None` when no token is configured.
    pub async fn current_identity(&self) -> StrategyResult<Option<Identity>> {
        if self.token.is_none() {
            return Ok(None);
        }
        let response = self.send(self.request(Method::GET, "/api/auth/me")).await?;
        let body: MeBody = response.json().await?;
        Ok(Some(body.user))
    }
}

/// Turn a 404 into `None`
fn absent_on_not_found<T>(result: StrategyResult<T>) -> StrategyResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StrategyError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

impl StrategyCatalog for HttpStrategyStore {
    async fn fetch_all(&self) -> StrategyResult<Vec<Strategy>> {
        let response = self.send(self.request(Method::GET, "/api/strategies")).await?;
        let strategies: Vec<Strategy> = response.json().await?;
        normalize_catalog(strategies)
    }

    async fn find_by_id(&self, id: StrategyId) -> StrategyResult<Option<Strategy>> {
        let path = format!("/api/strategies/{id}");
        let response = absent_on_not_found(self.send(self.request(Method::GET, &path)).await)?;
        match response {
            Some(response) => Ok(Some(response.json().await?)),
            None => Ok(None),
        }
    }
}

impl FavoritesRepository for HttpStrategyStore {
    async fn list(&self, _user: &UserId) -> StrategyResult<Vec<StrategyId>> {
        let response = self.send(self.request(Method::GET, "/api/favorites")).await?;
        Ok(response.json().await?)
    }

    async fn add(&self, _user: &UserId, id: StrategyId) -> StrategyResult<()> {
        let path = format!("/api/favorites/{id}");
        self.send(self.request(Method::PUT, &path))
            .await
            .map_err(|e| match e {
                StrategyError::NotFound(_) => StrategyError::NotFound(Some(id)),
                other => other,
            })?;
        Ok(())
    }

    async fn remove(&self, _user: &UserId, id: StrategyId) -> StrategyResult<()> {
        let path = format!("/api/favorites/{id}");
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}

impl DailyRecordRepository for HttpStrategyStore {
    async fn find(&self, _user: &UserId, day: CalendarDay) -> StrategyResult<Option<DailyRecord>> {
        let response = absent_on_not_found(self.send(self.request(Method::GET, "/api/daily")).await)?;
        let Some(response) = response else {
            return Ok(None);
        };
        let record: DailyRecord = response.json().await?;
        Ok(Some(record).filter(|r| r.is_for(day)))
    }

    async fn save(&self, _user: &UserId, record: &DailyRecord) -> StrategyResult<()> {
        let body = SetDailyBody {
            strategy_id: record.strategy_id,
        };
        self.send(self.request(Method::PUT, "/api/daily").json(&body))
            .await?;
        Ok(())
    }
}
