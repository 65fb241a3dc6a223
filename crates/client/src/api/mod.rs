//! MealDash REST API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; the backend is source of truth - no local
//!   sync, direct API calls
//! - Bearer token read from the session store on every request, so a token
//!   set after login is effective immediately
//! - In-memory caching via `moka` for catalog responses (5 minute TTL);
//!   carts and orders are mutable state and are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use mealdash_client::api::ApiClient;
//!
//! let client = ApiClient::new(&config, session.clone());
//!
//! // Browse the catalog
//! let stores = client.stores().await?;
//!
//! // Read the server-side cart
//! let cart = client.fetch_cart().await?;
//! ```

mod account;
mod addresses;
mod admin;
mod cache;
mod catalog;
mod engagement;
mod orders;
pub mod types;
mod vouchers;
mod wallet;

pub use account::LoginReply;
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::session::SessionStore;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when talking to the MealDash API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend rejected the bearer token (401).
    ///
    /// The stored token is left in place; a transient server hiccup must not
    /// silently log the user out.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend (429).
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the MealDash REST API.
///
/// Cheaply cloneable; all clones share the HTTP connection pool, the catalog
/// cache, and the session store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    session: SessionStore,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &ClientConfig, session: SessionStore) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                session,
                cache,
            }),
        }
    }

    /// The session store this client reads its bearer token from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// Build a request for `path` with the bearer token attached if present.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let mut builder = self.inner.client.request(method, url);
        if let Some(token) = self.inner.session.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request and deserialize a JSON response body.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let body = Self::check_status(response).await?;

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    /// Send a request where the response body is irrelevant.
    pub(crate) async fn execute_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let response = builder.send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Map a non-success status to an [`ApiError`], returning the body text
    /// on success for parsing.
    async fn check_status(response: Response) -> Result<String, ApiError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(response.url().path().to_string()));
        }

        // Read the body as text first for better error diagnostics.
        let path = response.url().path().to_string();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized(error_message(&body)));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path = %path,
                body = %body.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body)
    }

    // =========================================================================
    // Cache plumbing
    // =========================================================================

    pub(crate) async fn cache_get(&self, key: &CacheKey) -> Option<CacheValue> {
        self.inner.cache.get(key).await
    }

    pub(crate) async fn cache_insert(&self, key: CacheKey, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }

    /// Invalidate all cached catalog data.
    ///
    /// Called after admin mutations of foods, food types, stores, or tenants
    /// so back-office edits are visible without waiting out the TTL.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Extract the backend's `message` field from an error body, falling back to
/// the (truncated) raw text.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(message) = value.get("message").and_then(|m| m.as_str())
    {
        return message.to_string();
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "(no error details provided)".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}
