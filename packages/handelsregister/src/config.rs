//! Configuration constants and client settings.

use std::time::Duration;

use url::Url;

use crate::error::{RegistryError, Result};

/// Origin of the register portal.
pub const PORTAL_BASE_URL: &str = "https://www.handelsregister.de";

/// Path of the advanced search page. The initial GET and the search POST both
/// go here.
pub const ENTRY_PATH: &str = "/rp_web/erweitertesuche/welcome.xhtml";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Additional attempts after a connection-level failure.
pub const MAX_RETRIES: u32 = 2;

/// Fixed pause between attempts (milliseconds).
pub const RETRY_DELAY_MS: u64 = 1000;

/// Rows per result page requested from the portal.
pub const RESULTS_PER_PAGE: u32 = 100;

/// Environment variable overriding the portal origin.
pub const ENV_BASE_URL: &str = "HANDELSREGISTER_BASE_URL";

/// Environment variable overriding the request timeout.
pub const ENV_TIMEOUT_SECS: &str = "HANDELSREGISTER_TIMEOUT_SECS";

/// Environment variable overriding the retry count.
pub const ENV_MAX_RETRIES: &str = "HANDELSREGISTER_MAX_RETRIES";

/// Settings shared by every session a client opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: PORTAL_BASE_URL.to_string(),
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            max_retries: MAX_RETRIES,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

impl ClientConfig {
    /// Build a configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            validate_base_url(&base_url)?;
            config.base_url = base_url;
        }

        if let Ok(value) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = value.parse().map_err(|_| {
                RegistryError::Config(format!("{ENV_TIMEOUT_SECS} must be a number, got '{value}'"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Ok(value) = std::env::var(ENV_MAX_RETRIES) {
            config.max_retries = value.parse().map_err(|_| {
                RegistryError::Config(format!("{ENV_MAX_RETRIES} must be a number, got '{value}'"))
            })?;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

/// Validate that a portal origin is an absolute http(s) URL.
///
/// # Examples
/// ```
/// use handelsregister::config::validate_base_url;
///
/// assert!(validate_base_url("https://www.handelsregister.de").is_ok());
/// assert!(validate_base_url("ftp://example.org").is_err());
/// assert!(validate_base_url("not a url").is_err());
/// ```
pub fn validate_base_url(base_url: &str) -> Result<()> {
    let url = Url::parse(base_url).map_err(|source| RegistryError::InvalidUrl {
        url: base_url.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(RegistryError::Config(format!(
            "unsupported scheme '{other}' in {base_url}"
        ))),
    }
}

/// Resolve a path or URL from the portal against the configured origin.
///
/// Absolute URLs pass through; absolute and relative paths are joined onto
/// the origin.
///
/// # Examples
/// ```
/// use handelsregister::config::resolve_url;
///
/// assert_eq!(
///     resolve_url("https://www.handelsregister.de", "/rp_web/erweitertesuche/welcome.xhtml").unwrap(),
///     "https://www.handelsregister.de/rp_web/erweitertesuche/welcome.xhtml"
/// );
/// ```
pub fn resolve_url(base_url: &str, path: &str) -> Result<String> {
    let base = Url::parse(base_url).map_err(|source| RegistryError::InvalidUrl {
        url: base_url.to_string(),
        source,
    })?;
    let resolved = base.join(path).map_err(|source| RegistryError::InvalidUrl {
        url: path.to_string(),
        source,
    })?;
    Ok(resolved.to_string())
}
