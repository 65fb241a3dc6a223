//! Account endpoints: login, registration, profile, and the server-side
//! cart ("temp-data") resource.

use reqwest::Method;
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;

use mealdash_core::Email;

use super::types::{CartDto, LoginRequest, RegisterRequest, UserProfileDto, WalletTransactionDto};
use super::{ApiClient, ApiError, error_message};

/// What the login endpoint yielded, before any session state is touched.
///
/// The backend is inconsistent about where the token (and role) appear, so
/// both are optional here; the auth workflow decides what a missing token
/// means.
#[derive(Debug, Clone)]
pub struct LoginReply {
    /// Bearer token, cleaned of quoting and `Bearer ` prefixes.
    pub token: Option<String>,
    /// Role spelled out in the login response body, if any.
    pub role: Option<String>,
}

impl ApiClient {
    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange credentials for a bearer token.
    ///
    /// The token is searched for in the response body (several known field
    /// layouts, or the body itself as a bare string) and then in response
    /// headers. No session state is modified; see [`crate::auth::sign_in`].
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` on rejected credentials, or another
    /// `ApiError` on transport/status failures.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginReply, ApiError> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.expose_secret().to_string(),
        };

        let response = self
            .request(Method::POST, "/api/users/login")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized(error_message(&text)));
        }
        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        // A backend may answer with a bare token string instead of JSON.
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        Ok(LoginReply {
            token: extract_token(&body, &headers),
            role: extract_role(&body),
        })
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.execute_empty(
            self.request(Method::POST, "/api/users/register")
                .json(request),
        )
        .await
    }

    /// Notify the backend of a sign-out. Best effort; local session clearing
    /// happens before this call and does not depend on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn sign_out_remote(&self) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::GET, "/api/users/sign-out"))
            .await
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Fetch the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<UserProfileDto, ApiError> {
        self.execute(self.request(Method::GET, "/api/users/profile"))
            .await
    }

    /// Top up the account balance by a whole-đồng amount.
    ///
    /// The endpoint takes the bare amount as its JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn top_up(&self, amount: i64) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::PUT, "/api/users/top-up").json(&amount))
            .await
    }

    /// List the current user's balance transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn user_transactions(&self) -> Result<Vec<WalletTransactionDto>, ApiError> {
        self.execute(self.request(Method::GET, "/api/users/transactions"))
            .await
    }

    // =========================================================================
    // Cart temp-data (never cached - mutable state)
    // =========================================================================

    /// Fetch the server-side cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<CartDto, ApiError> {
        self.execute(self.request(Method::GET, "/api/users/temp-data"))
            .await
    }

    /// Replace the server-side cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, cart), fields(lines = cart.order_list.len()))]
    pub async fn store_cart(&self, cart: &CartDto) -> Result<(), ApiError> {
        self.execute_empty(
            self.request(Method::PATCH, "/api/users/temp-data")
                .json(cart),
        )
        .await
    }

    /// Clear the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::DELETE, "/api/users/temp-data"))
            .await
    }
}

// =============================================================================
// Token extraction
// =============================================================================

/// Minimum plausible length for a bare-string token body.
const MIN_BARE_TOKEN_LEN: usize = 20;

/// Search the login response body and headers for a bearer token.
///
/// Tried in order: the body itself as a bare string, the known body field
/// layouts, then common token headers.
fn extract_token(body: &Value, headers: &HeaderMap) -> Option<String> {
    if let Value::String(s) = body
        && s.len() > MIN_BARE_TOKEN_LEN
    {
        return Some(clean_token(s));
    }

    let body_candidates = [
        body.get("token"),
        body.get("accessToken"),
        body.get("data").and_then(|d| d.get("token")),
        body.get("result").and_then(|r| r.get("token")),
    ];
    for candidate in body_candidates.into_iter().flatten() {
        if let Some(s) = candidate.as_str()
            && !s.is_empty()
        {
            return Some(clean_token(s));
        }
    }

    for header in ["authorization", "x-token", "token"] {
        if let Some(value) = headers.get(header).and_then(|v| v.to_str().ok())
            && !value.is_empty()
        {
            return Some(clean_token(value));
        }
    }

    None
}

/// Search the login response body for an inline role.
fn extract_role(body: &Value) -> Option<String> {
    let candidates = [
        body.get("role"),
        body.get("roleName"),
        body.get("result").and_then(|r| r.get("roleName")),
        body.get("result").and_then(|r| r.get("role")),
        body.get("data").and_then(|d| d.get("roleName")),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Strip a `Bearer ` prefix and surrounding quotes from a raw token value.
fn clean_token(raw: &str) -> String {
    let mut token = raw.trim();

    if token.to_ascii_lowercase().starts_with("bearer ") {
        token = token.get("bearer ".len()..).unwrap_or("").trim_start();
    }

    if let Some(unquoted) = token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        token = unquoted;
    }

    token.to_string()
}
