//! Sign-in and sign-out workflows.
//!
//! Login is a two-step dance against an inconsistent backend: first extract
//! a bearer token from wherever the response hid it, then resolve the user's
//! role from the best available source. The workflow is generic over
//! [`AuthBackend`] so the resolution chain is testable without HTTP.

use secrecy::SecretString;
use thiserror::Error;
use tracing::instrument;

use mealdash_core::{Email, EmailError, Role};

use crate::api::{ApiClient, ApiError, LoginReply, UserProfileDto};
use crate::session::SessionStore;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Invalid credentials (wrong password or unknown account).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The backend reported success but returned no token anywhere.
    ///
    /// Treated as a hard failure: synthesizing a fake session to paper over
    /// a token-less success would leave every subsequent request
    /// unauthenticated.
    #[error("login succeeded but no authentication token was returned")]
    MissingToken,

    /// Transport or API failure.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The slice of the API the auth workflow needs.
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for a [`LoginReply`].
    fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<LoginReply, ApiError>> + Send;

    /// Fetch the current user's profile.
    fn fetch_profile(&self) -> impl Future<Output = Result<UserProfileDto, ApiError>> + Send;

    /// Tell the backend the user signed out.
    fn notify_sign_out(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl AuthBackend for ApiClient {
    async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginReply, ApiError> {
        Self::login(self, email, password).await
    }

    async fn fetch_profile(&self) -> Result<UserProfileDto, ApiError> {
        self.profile().await
    }

    async fn notify_sign_out(&self) -> Result<(), ApiError> {
        self.sign_out_remote().await
    }
}

/// Sign in and establish the session.
///
/// On success the token and the resolved role are stored in `session` and
/// the role is returned. On failure the session is left untouched.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on a 401, `MissingToken` when a
/// successful response carries no token, or the underlying `ApiError`.
#[instrument(skip_all, fields(email = %email))]
pub async fn sign_in<B: AuthBackend>(
    backend: &B,
    session: &SessionStore,
    email: &str,
    password: &SecretString,
) -> Result<Role, AuthError> {
    let email = Email::parse(email)?;

    let reply = backend.login(&email, password).await.map_err(|e| match e {
        ApiError::Unauthorized(_) => AuthError::InvalidCredentials,
        other => AuthError::Api(other),
    })?;

    let token = reply.token.ok_or(AuthError::MissingToken)?;
    session.set_token(&token);

    let role = resolve_role(backend, &token, reply.role.as_deref()).await;
    session.set_role(role);

    tracing::info!(role = %role, "Signed in");
    Ok(role)
}

/// Sign out: clear the local session, then tell the backend.
///
/// The local session is gone regardless of whether the notification lands;
/// a failing backend must not keep a user signed in.
#[instrument(skip_all)]
pub async fn sign_out<B: AuthBackend>(backend: &B, session: &SessionStore) {
    session.clear();

    if let Err(e) = backend.notify_sign_out().await {
        tracing::warn!(error = %e, "Sign-out notification failed");
    }
}

/// Resolve the user's role from the best available source.
///
/// Precedence: token claim, then the role spelled out in the login response,
/// then a profile fetch, then the least-privileged default. The backend's
/// claim shape is unreliable, so any subset of these may be absent.
async fn resolve_role<B: AuthBackend>(
    backend: &B,
    token: &str,
    inline_role: Option<&str>,
) -> Role {
    if let Some(role) = SessionStore::decode_role_from_token(token) {
        return role;
    }

    if let Some(raw) = inline_role {
        return Role::normalize(raw);
    }

    match backend.fetch_profile().await {
        Ok(profile) => profile
            .role_name
            .as_deref()
            .map_or_else(Role::default, Role::normalize),
        Err(e) => {
            tracing::warn!(error = %e, "Profile fetch failed during role resolution, defaulting");
            Role::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    /// A canned backend for exercising the resolution chain.
    struct MockBackend {
        token: Option<String>,
        inline_role: Option<String>,
        reject_credentials: bool,
        profile_role: Result<Option<String>, ()>,
    }

    impl MockBackend {
        fn returning_token(token: &str) -> Self {
            Self {
                token: Some(token.to_string()),
                inline_role: None,
                reject_credentials: false,
                profile_role: Err(()),
            }
        }
    }

    impl AuthBackend for MockBackend {
        async fn login(
            &self,
            _email: &Email,
            _password: &SecretString,
        ) -> Result<LoginReply, ApiError> {
            if self.reject_credentials {
                return Err(ApiError::Unauthorized("bad credentials".to_string()));
            }
            Ok(LoginReply {
                token: self.token.clone(),
                role: self.inline_role.clone(),
            })
        }

        async fn fetch_profile(&self) -> Result<UserProfileDto, ApiError> {
            match &self.profile_role {
                Ok(role_name) => Ok(UserProfileDto {
                    id: "u-1".to_string(),
                    email: "an@example.com".to_string(),
                    name: "An".to_string(),
                    balance: None,
                    role_name: role_name.clone(),
                }),
                Err(()) => Err(ApiError::Api {
                    status: 500,
                    message: "profile unavailable".to_string(),
                }),
            }
        }

        async fn notify_sign_out(&self) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn token_with_role_claim(role: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(serde_json::json!({ "role": role }).to_string().as_bytes());
        format!("{header}.{payload}.sig")
    }

    fn password() -> SecretString {
        SecretString::from("hunter2-but-long")
    }

    #[tokio::test]
    async fn test_token_claim_wins_over_inline_role() {
        let mut backend = MockBackend::returning_token(&token_with_role_claim("Manager"));
        backend.inline_role = Some("Customer".to_string());
        let session = SessionStore::in_memory();

        let role = sign_in(&backend, &session, "an@example.com", &password())
            .await
            .unwrap();

        assert_eq!(role, Role::Manager);
        assert_eq!(session.role(), Some(Role::Manager));
    }

    #[tokio::test]
    async fn test_inline_role_used_when_token_has_no_claim() {
        let mut backend = MockBackend::returning_token("opaque-token-with-no-claims");
        backend.inline_role = Some("Admin".to_string());
        let session = SessionStore::in_memory();

        let role = sign_in(&backend, &session, "an@example.com", &password())
            .await
            .unwrap();

        assert_eq!(role, Role::Admin);
    }

    #[tokio::test]
    async fn test_profile_fetch_is_third_fallback() {
        let mut backend = MockBackend::returning_token("opaque-token-with-no-claims");
        backend.profile_role = Ok(Some("StoreManager".to_string()));
        let session = SessionStore::in_memory();

        let role = sign_in(&backend, &session, "an@example.com", &password())
            .await
            .unwrap();

        assert_eq!(role, Role::Manager);
    }

    #[tokio::test]
    async fn test_defaults_to_customer_when_every_source_is_absent() {
        let backend = MockBackend::returning_token("opaque-token-with-no-claims");
        let session = SessionStore::in_memory();

        let role = sign_in(&backend, &session, "an@example.com", &password())
            .await
            .unwrap();

        assert_eq!(role, Role::Customer);
    }

    #[tokio::test]
    async fn test_missing_token_is_a_hard_error() {
        let backend = MockBackend {
            token: None,
            inline_role: Some("Customer".to_string()),
            reject_credentials: false,
            profile_role: Err(()),
        };
        let session = SessionStore::in_memory();

        let result = sign_in(&backend, &session, "an@example.com", &password()).await;

        assert!(matches!(result, Err(AuthError::MissingToken)));
        // No fake session is synthesized.
        assert!(!session.is_authenticated());
        assert!(session.role().is_none());
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let mut backend = MockBackend::returning_token("irrelevant");
        backend.reject_credentials = true;
        let session = SessionStore::in_memory();

        let result = sign_in(&backend, &session, "an@example.com", &password()).await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_invalid_email_rejected_before_any_request() {
        let backend = MockBackend::returning_token("irrelevant");
        let session = SessionStore::in_memory();

        let result = sign_in(&backend, &session, "not-an-email", &password()).await;
        assert!(matches!(result, Err(AuthError::InvalidEmail(_))));
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let backend = MockBackend::returning_token(&token_with_role_claim("Customer"));
        let session = SessionStore::in_memory();
        sign_in(&backend, &session, "an@example.com", &password())
            .await
            .unwrap();

        sign_out(&backend, &session).await;

        assert!(session.token().is_none());
        assert!(session.role().is_none());
    }
}
