//! Client configuration
//!
//! All tunables for the execution core live in [`ClientConfig`]: base URL,
//! credentials, retry policy, transport timeout, logging verbosity and the
//! token validity window. The config is built once (builder or environment)
//! and injected into the client by the composing test suite; nothing in this
//! crate reads global state after construction.

use crate::error::{Error, Result};
use crate::http::RetryPolicy;
use std::time::Duration;
use url::Url;

/// Default number of attempts per request (1 initial + 2 retries).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default base delay for linear backoff.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(250);
/// Default transport-level request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default validity window applied to freshly acquired tokens.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(300);
/// Default cap on logged body length, in characters.
pub const DEFAULT_MAX_LOG_BODY_LEN: usize = 1000;

/// Configuration for [`crate::client::BookerClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Username for the token exchange (absent = auth calls fail)
    pub username: Option<String>,
    /// Password for the token exchange
    pub password: Option<String>,
    /// Maximum attempts per request, including the first
    pub max_attempts: u32,
    /// Base delay for linear backoff between attempts
    pub base_delay: Duration,
    /// Transport-level request timeout
    pub timeout: Duration,
    /// Log request/response headers and bodies on every call
    pub detailed_logging: bool,
    /// Maximum logged body length before truncation
    pub max_log_body_len: usize,
    /// Validity window for freshly acquired tokens
    pub token_ttl: Duration,
}

impl ClientConfig {
    /// Create a config with defaults for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: None,
            password: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            timeout: DEFAULT_TIMEOUT,
            detailed_logging: false,
            max_log_body_len: DEFAULT_MAX_LOG_BODY_LEN,
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Create a new config builder
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::new(base_url),
        }
    }

    /// Load configuration from the environment.
    ///
    /// A `.env` file is loaded first if present (best-effort). `BOOKER_BASE_URL`
    /// is required; everything else falls back to defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url =
            std::env::var("BOOKER_BASE_URL").map_err(|_| Error::missing_field("BOOKER_BASE_URL"))?;

        let mut config = Self::new(base_url);
        config.username = std::env::var("BOOKER_USERNAME").ok();
        config.password = std::env::var("BOOKER_PASSWORD").ok();

        if let Some(v) = env_parse::<u32>("BOOKER_MAX_ATTEMPTS")? {
            config.max_attempts = v;
        }
        if let Some(v) = env_parse::<u64>("BOOKER_BASE_DELAY_MS")? {
            config.base_delay = Duration::from_millis(v);
        }
        if let Some(v) = env_parse::<u64>("BOOKER_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(v);
        }
        if let Some(v) = env_parse::<bool>("BOOKER_DETAILED_LOGGING")? {
            config.detailed_logging = v;
        }
        if let Some(v) = env_parse::<usize>("BOOKER_MAX_LOG_BODY_LEN")? {
            config.max_log_body_len = v;
        }
        if let Some(v) = env_parse::<u64>("BOOKER_TOKEN_TTL_SECS")? {
            config.token_ttl = Duration::from_secs(v);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)?;
        if self.max_attempts < 1 {
            return Err(Error::InvalidConfigValue {
                field: "max_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Whether a credential exchange is possible with this config
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Derive the retry policy for the executor
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: self.base_delay,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::InvalidConfigValue {
                field: key.to_string(),
                message: format!("could not parse '{raw}'"),
            }),
        Err(_) => Ok(None),
    }
}

/// Builder for client config
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the credentials used for the token exchange
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self.config.password = Some(password.into());
        self
    }

    /// Set the maximum attempts per request
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Set the base backoff delay
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.base_delay = delay;
        self
    }

    /// Set the transport timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Enable or disable detailed request/response logging
    pub fn detailed_logging(mut self, enabled: bool) -> Self {
        self.config.detailed_logging = enabled;
        self
    }

    /// Set the maximum logged body length
    pub fn max_log_body_len(mut self, len: usize) -> Self {
        self.config.max_log_body_len = len;
        self
    }

    /// Set the token validity window
    pub fn token_ttl(mut self, ttl: Duration) -> Self {
        self.config.token_ttl = ttl;
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
