//! Authentication service implementation.

use super::*;
use crate::errors::{AuthenticationError, RelayResult};
use crate::observability::redact_token;
use crate::transport::{JsonRestClient, AUTH_TOKEN_HEADER, USER_ID_HEADER};
use async_trait::async_trait;
use http::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

/// Resource of the login call
pub const LOGIN_RESOURCE: &str = "login";

/// Session credential obtained from `login`.
///
/// Only ever built from a successful login, and never reused across cycles.
/// Both tokens are checked to be valid header values on construction, so a
/// credential can always be sent.
#[derive(Clone)]
pub struct AuthCredential {
    user_id: String,
    auth_token: SecretString,
    headers: HeaderMap,
}

impl AuthCredential {
    /// Create a credential from its two tokens
    pub fn new(
        user_id: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self, AuthenticationError> {
        let user_id = user_id.into();
        let auth_token = auth_token.into();

        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, header_value(&user_id)?);
        headers.insert(AUTH_TOKEN_HEADER, header_value(&auth_token)?);

        Ok(Self {
            user_id,
            auth_token: SecretString::new(auth_token),
            headers,
        })
    }

    /// Id of the logged-in user
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Headers authorizing a request with this credential
    pub fn headers(&self) -> HeaderMap {
        self.headers.clone()
    }
}

fn header_value(value: &str) -> Result<HeaderValue, AuthenticationError> {
    let mut value =
        HeaderValue::from_str(value).map_err(|_| AuthenticationError::MalformedCredential)?;
    value.set_sensitive(true);
    Ok(value)
}

impl std::fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthCredential")
            .field("user_id", &self.user_id)
            .field("auth_token", &redact_token(self.auth_token.expose_secret()))
            .finish()
    }
}

/// Trait for authentication service operations
#[async_trait]
pub trait AuthServiceTrait: Send + Sync {
    /// Absolute URI of the login resource
    fn login_uri(&self) -> String;

    /// Log in and return the session credential
    async fn login(&self, username: &str, password: &str) -> RelayResult<AuthCredential>;
}

/// Authentication service implementation
#[derive(Debug, Clone)]
pub struct AuthService {
    client: JsonRestClient,
}

impl AuthService {
    /// Create a new authentication service.
    ///
    /// The login call never carries ambient authorization, whatever the
    /// client was configured with.
    pub fn new(client: JsonRestClient) -> Self {
        Self {
            client: client.without_authorization(),
        }
    }
}

/// Turn a login answer into a credential, or the reason it is not one
pub fn credential_from_response(
    response: Option<LoginResponse>,
) -> Result<AuthCredential, AuthenticationError> {
    let Some(response) = response else {
        return Err(AuthenticationError::Rejected { status: None });
    };

    if response.is_success() {
        if let Some(data) = response.data {
            return AuthCredential::new(data.user_id, data.auth_token);
        }
    }

    Err(AuthenticationError::Rejected {
        status: response.status,
    })
}

#[async_trait]
impl AuthServiceTrait for AuthService {
    fn login_uri(&self) -> String {
        self.client.uri_for_resource(LOGIN_RESOURCE)
    }

    #[instrument(skip(self, password))]
    async fn login(&self, username: &str, password: &str) -> RelayResult<AuthCredential> {
        let response: Option<LoginResponse> = self
            .client
            .post(LOGIN_RESOURCE, &LoginRequest::new(username, password), None)
            .await
            .map_err(|e| AuthenticationError::Transport(Box::new(e)))?;

        let credential = credential_from_response(response)?;
        debug!(user_id = %credential.user_id(), "Authenticated");
        Ok(credential)
    }
}
