//! Error types for the Rocket.Chat relay.
//!
//! Every failure a notification cycle can hit maps to one variant of
//! [`RelayError`]. The orchestration boundary logs these and absorbs them;
//! nothing here is retried.

use thiserror::Error;

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Root error type for the relay
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Login was rejected or could not be completed
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    /// The remote service refused the message
    #[error("Post message error: {0}")]
    PostMessage(#[from] PostMessageError),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Response parsing error
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    /// Anything else, including panics captured at the relay boundary
    #[error("Unexpected error: {message}")]
    Unexpected {
        /// Error message
        message: String,
    },
}

impl RelayError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "RELAY_CONFIG",
            Self::Authentication(_) => "RELAY_AUTH",
            Self::PostMessage(_) => "RELAY_POST_MESSAGE",
            Self::Network(_) => "RELAY_NETWORK",
            Self::Response(_) => "RELAY_RESPONSE",
            Self::Unexpected { .. } => "RELAY_UNEXPECTED",
        }
    }

    /// Whether the failure happened while talking to the remote service
    /// (connection, timeout, malformed body) rather than in its answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Response(_))
    }

    /// Get HTTP status code if applicable
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Response(ResponseError::HttpStatus { status, .. }) => Some(*status),
            Self::Authentication(AuthenticationError::Transport(inner)) => inner.http_status(),
            _ => None,
        }
    }

    /// Create an unexpected error from a captured panic payload
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic with non-string payload".to_string()
        };
        Self::Unexpected { message }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Missing REST API URL
    #[error("Rocket.Chat REST API URL is missing")]
    MissingApiUrl,

    /// Missing username
    #[error("Rocket.Chat username is missing")]
    MissingUsername,

    /// Missing password
    #[error("Rocket.Chat password is missing")]
    MissingPassword,

    /// Invalid URL
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Parser message
        message: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(String),
}

/// Authentication errors
///
/// Credential rejection and an unreachable login endpoint both mean the
/// cycle cannot continue, so they render the same leading message.
#[derive(Error, Debug)]
pub enum AuthenticationError {
    /// The login response had no `data` section or a status other than `success`
    #[error("Can not authenticate Rocket.Chat with the specified username/password")]
    Rejected {
        /// Status literal returned by the server, if any
        status: Option<String>,
    },

    /// The login call itself failed
    #[error("Can not authenticate Rocket.Chat with the specified username/password: {0}")]
    Transport(#[source] Box<RelayError>),

    /// The login succeeded but a token cannot be carried in an HTTP header
    #[error("Login returned a credential that cannot be sent as a header")]
    MalformedCredential,
}

/// The remote service refused the message
#[derive(Error, Debug)]
#[error("Can not post message to Rocket.Chat: {error}")]
pub struct PostMessageError {
    /// Error text supplied by the server, empty when absent
    pub error: String,
}

impl PostMessageError {
    /// Create a rejection with the server supplied reason
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Network errors
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Connection failed
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Error message
        message: String,
    },

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout
        } else if err.is_connect() {
            NetworkError::ConnectionFailed {
                message: err.to_string(),
            }
        } else {
            NetworkError::Http(err.to_string())
        }
    }
}

/// Response parsing errors
#[derive(Error, Debug)]
pub enum ResponseError {
    /// JSON deserialization error
    #[error("Deserialization error: {message}")]
    DeserializationError {
        /// Error message
        message: String,
    },

    /// Non-success status with a body that is not JSON
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Raw body, possibly empty
        body: String,
    },

    /// Unexpected response format
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Error message
        message: String,
    },
}

impl From<serde_json::Error> for ResponseError {
    fn from(err: serde_json::Error) -> Self {
        ResponseError::DeserializationError {
            message: err.to_string(),
        }
    }
}
