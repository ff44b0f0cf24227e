//! Configuration management for the relay.
//!
//! Supports configuration via:
//! - Explicit values (builder pattern)
//! - Environment variables
//! - The host's settings form ([`RelaySettings`])

use crate::errors::{ConfigurationError, RelayError, RelayResult};
use crate::filter::LevelFilter;
use crate::observability::Redacted;
use crate::text::{has_value, normalize_host_or_fqdn};
use http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Configuration for one relay
#[derive(Clone)]
pub struct RelayConfig {
    /// Event viewer URL used to build deep links; empty when not configured
    pub(crate) seq_url: String,
    /// REST API base URL, normalized with a trailing `/`
    pub(crate) api_url: Url,
    /// Channel name, with or without leading `#`
    pub(crate) channel: String,
    /// Raw comma separated level allow-list
    pub(crate) event_levels: Option<String>,
    /// Attach structured properties
    pub(crate) attach_properties: bool,
    /// Login username
    pub(crate) username: String,
    /// Login password
    pub(crate) password: SecretString,
    /// Request timeout
    pub timeout: Duration,
    /// Headers sent with every authorized request
    pub default_headers: HeaderMap,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("seq_url", &self.seq_url)
            .field("api_url", &self.api_url.as_str())
            .field("channel", &self.channel)
            .field("event_levels", &self.event_levels)
            .field("attach_properties", &self.attach_properties)
            .field("username", &self.username)
            .field("password", &Redacted::new(&self.password))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            seq_url: String::new(),
            api_url: Url::parse(crate::DEFAULT_API_URL).expect("default API URL is valid"),
            channel: String::new(),
            event_levels: None,
            attach_properties: false,
            username: String::new(),
            password: SecretString::new(String::new()),
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
        }
    }
}

impl RelayConfig {
    /// Create a new configuration builder
    pub fn builder() -> RelayConfigBuilder {
        RelayConfigBuilder::new()
    }

    /// Create configuration from environment variables
    ///
    /// Reads:
    /// - `SEQ_URL` - event viewer URL (optional)
    /// - `ROCKET_API_URL` - REST API URL, e.g. `https://chat.example.com/api/v1`
    /// - `ROCKET_CHANNEL` - channel name
    /// - `ROCKET_EVENT_LEVELS` - comma separated level allow-list (optional)
    /// - `ROCKET_ATTACH_PROPERTIES` - `true` to attach structured properties
    /// - `ROCKET_USERNAME` / `ROCKET_PASSWORD` - login credentials
    /// - `ROCKET_TIMEOUT` - request timeout in seconds
    pub fn from_env() -> RelayResult<Self> {
        let mut builder = RelayConfigBuilder::new();

        if let Ok(url) = std::env::var("SEQ_URL") {
            builder = builder.seq_url(&url);
        }

        let api_url = std::env::var("ROCKET_API_URL")
            .map_err(|_| ConfigurationError::EnvVar("ROCKET_API_URL is not set".to_string()))?;
        builder = builder.api_url(&api_url)?;

        if let Ok(channel) = std::env::var("ROCKET_CHANNEL") {
            builder = builder.channel(&channel);
        }

        if let Ok(levels) = std::env::var("ROCKET_EVENT_LEVELS") {
            builder = builder.event_levels(&levels);
        }

        if let Ok(attach) = std::env::var("ROCKET_ATTACH_PROPERTIES") {
            builder = builder.attach_properties(matches!(
                attach.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ));
        }

        if let Ok(username) = std::env::var("ROCKET_USERNAME") {
            builder = builder.username(&username);
        }

        if let Ok(password) = std::env::var("ROCKET_PASSWORD") {
            builder = builder.password(&password);
        }

        if let Ok(timeout) = std::env::var("ROCKET_TIMEOUT") {
            builder = builder.timeout(parse_timeout_secs(&timeout)?);
        }

        builder.build()
    }

    /// Normalized event viewer URL, empty when not configured
    pub fn seq_url(&self) -> &str {
        &self.seq_url
    }

    /// Normalized REST API base URL
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Configured channel, as entered
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Whether a channel is configured at all
    pub fn has_channel(&self) -> bool {
        has_value(&self.channel)
    }

    /// Parsed level allow-list
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::parse(self.event_levels.as_deref())
    }

    /// Whether structured properties are attached
    pub fn attach_properties(&self) -> bool {
        self.attach_properties
    }

    /// Login username
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Login password
    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Validate the configuration
    pub fn validate(&self) -> RelayResult<()> {
        if !has_value(&self.username) {
            return Err(RelayError::Configuration(ConfigurationError::MissingUsername));
        }

        if self.password.expose_secret().is_empty() {
            return Err(RelayError::Configuration(ConfigurationError::MissingPassword));
        }

        if self.timeout.is_zero() {
            return Err(RelayError::Configuration(
                ConfigurationError::InvalidConfiguration {
                    message: "timeout must be greater than zero".to_string(),
                },
            ));
        }

        Ok(())
    }
}

/// Parse a timeout given in whole seconds
fn parse_timeout_secs(value: &str) -> Result<Duration, ConfigurationError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| {
            ConfigurationError::EnvVar(format!(
                "ROCKET_TIMEOUT must be a whole number of seconds, got '{}'",
                value
            ))
        })
}

/// Builder for RelayConfig
#[derive(Default)]
pub struct RelayConfigBuilder {
    config: RelayConfig,
    api_url_set: bool,
}

impl RelayConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the event viewer URL
    pub fn seq_url(mut self, url: &str) -> Self {
        self.config.seq_url = normalize_host_or_fqdn(url);
        self
    }

    /// Set the REST API URL
    pub fn api_url(mut self, url: &str) -> Result<Self, ConfigurationError> {
        let normalized = normalize_host_or_fqdn(url);
        if normalized.is_empty() {
            return Err(ConfigurationError::MissingApiUrl);
        }

        self.config.api_url =
            Url::parse(&normalized).map_err(|e| ConfigurationError::InvalidUrl {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        self.api_url_set = true;
        Ok(self)
    }

    /// Set the channel
    pub fn channel(mut self, channel: &str) -> Self {
        self.config.channel = channel.to_string();
        self
    }

    /// Set the level allow-list
    pub fn event_levels(mut self, levels: &str) -> Self {
        self.config.event_levels = Some(levels.to_string()).filter(|l| has_value(l));
        self
    }

    /// Enable or disable the properties attachment
    pub fn attach_properties(mut self, attach: bool) -> Self {
        self.config.attach_properties = attach;
        self
    }

    /// Set the username
    pub fn username(mut self, username: &str) -> Self {
        self.config.username = username.to_string();
        self
    }

    /// Set the password
    pub fn password(mut self, password: &str) -> Self {
        self.config.password = SecretString::new(password.to_string());
        self
    }

    /// Set the timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        if let Ok(header_name) = name.parse::<http::header::HeaderName>() {
            if let Ok(header_value) = value.parse::<http::header::HeaderValue>() {
                self.config.default_headers.insert(header_name, header_value);
            }
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> RelayResult<RelayConfig> {
        if !self.api_url_set {
            return Err(RelayError::Configuration(ConfigurationError::MissingApiUrl));
        }
        self.config.validate()?;
        Ok(self.config)
    }

    /// Build the configuration without validation (for testing)
    pub fn build_unchecked(self) -> RelayConfig {
        self.config
    }
}

/// Settings as entered in the host's app settings form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelaySettings {
    /// Event viewer URL
    pub seq_url: Option<String>,
    /// Rocket.Chat REST API URL
    pub rocket_api_url: Option<String>,
    /// Channel name
    pub channel: Option<String>,
    /// Comma separated level allow-list
    pub log_event_levels: Option<String>,
    /// Attach structured properties
    pub attach_properties: bool,
    /// Login username
    pub username: Option<String>,
    /// Login password
    pub password: Option<String>,
}

impl TryFrom<RelaySettings> for RelayConfig {
    type Error = RelayError;

    fn try_from(settings: RelaySettings) -> RelayResult<Self> {
        let api_url = settings
            .rocket_api_url
            .ok_or(ConfigurationError::MissingApiUrl)?;

        let mut builder = RelayConfigBuilder::new()
            .api_url(&api_url)?
            .attach_properties(settings.attach_properties)
            .username(settings.username.as_deref().unwrap_or_default())
            .password(settings.password.as_deref().unwrap_or_default());

        if let Some(url) = settings.seq_url {
            builder = builder.seq_url(&url);
        }
        if let Some(channel) = settings.channel {
            builder = builder.channel(&channel);
        }
        if let Some(levels) = settings.log_event_levels {
            builder = builder.event_levels(&levels);
        }

        builder.build()
    }
}
