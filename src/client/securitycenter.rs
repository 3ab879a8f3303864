//! Security Command Center REST client implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::models::{ListFindingsRequest, ListFindingsResponse};
use super::SecurityCenterApi;
use crate::error::ApiError;

/// Security Command Center v1 REST base URL
const API_BASE_URL: &str = "https://securitycenter.googleapis.com/v1";

/// Metadata server token endpoint for application default credentials
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Rate limit: 600 list requests per minute (10 per second)
const RATE_LIMIT_PER_SECOND: u32 = 10;

/// Security Command Center API client.
///
/// Authentication is obtained implicitly from the ambient environment: the
/// access token comes from the metadata server's default service account and
/// is cached until shortly before expiry. Retry policy is left to the
/// service; the client only paces itself against the listing quota.
pub struct SecurityCenterClient {
    http: HttpClient,
    base_url: String,
    token_url: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    token: Arc<RwLock<TokenState>>,
}

/// Internal access token state
#[derive(Debug, Clone, Default)]
struct TokenState {
    access_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl SecurityCenterClient {
    /// Create a new Security Command Center client.
    pub fn new() -> std::result::Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(
            std::num::NonZeroU32::new(RATE_LIMIT_PER_SECOND)
                .ok_or_else(|| ApiError::InvalidResponse("zero rate limit quota".to_string()))?,
        );
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            http,
            base_url: API_BASE_URL.to_string(),
            token_url: METADATA_TOKEN_URL.to_string(),
            rate_limiter,
            token: Arc::new(RwLock::new(TokenState::default())),
        })
    }

    /// Override the service base URL (for tests and private endpoints).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Pin a static access token, bypassing the metadata server.
    pub async fn with_access_token(self, token: impl Into<String>) -> Self {
        {
            let mut state = self.token.write().await;
            state.access_token = Some(token.into());
            // Pinned tokens are the embedder's responsibility to rotate
            state.expires_at = Some(Utc::now() + chrono::Duration::days(365));
        }
        self
    }

    /// Check if the cached token is absent, expired, or expiring soon
    /// (within 5 minutes).
    async fn is_token_expired(&self) -> bool {
        let state = self.token.read().await;
        match state.expires_at {
            None => true,
            Some(expires_at) => {
                let buffer = chrono::Duration::minutes(5);
                expires_at - buffer < Utc::now()
            }
        }
    }

    /// Get the current access token, refreshing from the metadata server if
    /// necessary.
    async fn get_valid_token(&self) -> std::result::Result<String, ApiError> {
        if self.is_token_expired().await {
            let fresh = self.fetch_token().await?;
            let mut state = self.token.write().await;
            state.access_token = Some(fresh.access_token);
            state.expires_at =
                Some(Utc::now() + chrono::Duration::seconds(fresh.expires_in.max(0)));
        }

        let state = self.token.read().await;
        state.access_token.clone().ok_or(ApiError::Unauthorized)
    }

    /// Fetch an access token for the default service account.
    async fn fetch_token(&self) -> std::result::Result<TokenResponse, ApiError> {
        debug!("refreshing access token from metadata server");
        let response = self
            .http
            .get(&self.token_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(ApiError::from)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::Unauthorized);
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse token response: {}", e)))
    }

    /// Make an authenticated GET request against the service.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> std::result::Result<T, ApiError> {
        self.rate_limiter.until_ready().await;

        let token = self.get_valid_token().await?;

        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK => response.json::<T>().await.map_err(|e| {
                ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
            }),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
            StatusCode::NOT_FOUND => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Resource not found".to_string());
                Err(ApiError::NotFound(error_msg))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg))
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg))
            }
            _ => Err(ApiError::InvalidResponse(format!(
                "Unexpected status code: {}",
                status
            ))),
        }
    }
}

/// Token response from the metadata server
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: i64,
}

#[async_trait]
impl SecurityCenterApi for SecurityCenterClient {
    async fn list_findings_page(
        &self,
        request: &ListFindingsRequest,
        page_token: Option<&str>,
    ) -> std::result::Result<ListFindingsResponse, ApiError> {
        // GET v1/{parent}/findings
        let path = format!("{}/findings", request.parent);
        let query = request.to_query_params(page_token);
        self.get_json(&path, &query).await
    }

    async fn close(&self) {
        // The HTTP pool tears down on drop; the explicit bracket keeps the
        // release point visible to callers and fakes.
        debug!("closing Security Command Center client");
    }
}
