use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{SessionIdentity, UserProfile};

/// The session cookie set by the identity provider's sign-in flow.
pub const SESSION_COOKIE: &str = "__session";

/// ProviderError
///
/// The single failure family this service knows about: the asynchronous
/// profile fetch against the external identity provider. The gate consumes
/// this as a plain `Result` branch; it is never propagated past the
/// middleware (it resolves to a redirect to the error page).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network-level failure (connect, timeout, malformed body).
    #[error("identity provider transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The provider answered, but not with a usable profile.
    #[error("identity provider returned status {0}")]
    UnexpectedStatus(u16),
    /// The provider is unreachable (used by the mock to simulate outages).
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

// 1. IdentityProvider Contract
/// IdentityProvider
///
/// Defines the abstract contract for the external identity collaborator.
/// This trait allows us to swap the concrete implementation—from the real
/// HTTP client (HttpIdentityProvider) in production to the in-memory Mock
/// (MockIdentityProvider) during testing—without affecting the gate.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn IdentityProvider>`) safely shareable across Axum's asynchronous
/// task boundaries.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Synchronous extraction of the session identity from the current
    /// request's headers. Credential verification is owned entirely by the
    /// provider's sign-in flow; here the session value is treated as opaque.
    ///
    /// Resolution order: the provider's session cookie, then a bearer
    /// `Authorization` header.
    fn session_identity(&self, headers: &HeaderMap) -> Option<SessionIdentity> {
        extract_session_identity(headers)
    }

    /// Asynchronous profile-fetch-by-identity. A single suspendable network
    /// call per request; no retries are performed by callers.
    async fn fetch_profile(
        &self,
        identity: &SessionIdentity,
    ) -> Result<UserProfile, ProviderError>;
}

/// IdentityState
///
/// The concrete type used to share the identity provider access across the
/// application state.
pub type IdentityState = Arc<dyn IdentityProvider>;

/// extract_session_identity
///
/// Shared extraction logic: reads the `__session` cookie if present, falling
/// back to a `Bearer` token in the Authorization header. Returns `None` for
/// anonymous requests (no credentials at all, or empty values).
pub fn extract_session_identity(headers: &HeaderMap) -> Option<SessionIdentity> {
    // Cookie header: "a=1; __session=abc; b=2"
    if let Some(cookie_header) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        for pair in cookie_header.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == SESSION_COOKIE && !value.is_empty() {
                    return Some(SessionIdentity(value.to_string()));
                }
            }
        }
    }

    // Fallback: Authorization: Bearer <identity>
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .map(|token| SessionIdentity(token.to_string()))
}

// 2. The Real Implementation (HTTP)
/// HttpIdentityProvider
///
/// The concrete implementation backed by the identity provider's REST API.
/// Profile lookups are `GET {base_url}/v1/users/{identity}` authenticated
/// with the server-side API key. Timeouts and connection pooling are whatever
/// the shared `reqwest::Client` enforces; the gate adds none of its own.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpIdentityProvider {
    /// new
    ///
    /// Constructs the provider client from the values resolved by AppConfig.
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            // Normalized so URL assembly below can always join with '/'.
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn fetch_profile(
        &self,
        identity: &SessionIdentity,
    ) -> Result<UserProfile, ProviderError> {
        let url = format!("{}/v1/users/{}", self.base_url, identity);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::UnexpectedStatus(response.status().as_u16()));
        }

        let profile = response.json::<UserProfile>().await?;
        Ok(profile)
    }
}

// 3. The Mock Implementation (For Unit Tests)
/// MockIdentityProvider
///
/// A mock implementation of `IdentityProvider` used exclusively for unit and
/// integration testing. This allows us to exercise the full gate decision
/// procedure without a network connection to the identity provider, isolating
/// the test boundary.
#[derive(Clone, Default)]
pub struct MockIdentityProvider {
    /// Known identity -> profile mappings served by `fetch_profile`.
    users: HashMap<String, UserProfile>,
    /// When true, every fetch returns a simulated provider outage.
    pub should_fail: bool,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            users: HashMap::new(),
            should_fail: true,
        }
    }

    /// with_user
    ///
    /// Builder-style registration of a known user. `role: None` models a
    /// profile whose metadata carries no role assignment.
    pub fn with_user(mut self, identity: &str, role: Option<&str>) -> Self {
        self.users.insert(
            identity.to_string(),
            UserProfile {
                id: identity.to_string(),
                public_metadata: crate::models::ProfileMetadata {
                    role: role.map(|r| r.to_string()),
                },
            },
        );
        self
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn fetch_profile(
        &self,
        identity: &SessionIdentity,
    ) -> Result<UserProfile, ProviderError> {
        if self.should_fail {
            return Err(ProviderError::Unavailable(
                "mock provider: simulated outage".to_string(),
            ));
        }

        self.users
            .get(identity.as_str())
            .cloned()
            .ok_or(ProviderError::UnexpectedStatus(404))
    }
}
