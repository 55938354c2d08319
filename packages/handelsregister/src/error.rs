//! Error types for the register client.
//!
//! Every operation surfaces a single `RegistryError`. Within one operation
//! there is no degraded mode: the first error ends the whole run.

use thiserror::Error;

/// Main error type for the register client.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Connection-level failure (connect, timeout, truncated body).
    #[error("Connection to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The portal answered with a non-2xx status.
    #[error("Portal returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// An element the protocol depends on is missing from the markup.
    #[error("Missing expected element {element} in {context}; the portal markup may have changed")]
    Protocol { element: String, context: String },

    /// No register type could be located in a compound identifier.
    #[error("Cannot parse register identifier: '{0}'")]
    Parse(String),

    /// A court name that is not in the reference tables.
    #[error("Unknown court: '{0}'")]
    UnknownCourt(String),

    /// The search for a document returned no matching entry.
    #[error("No register entry found for {0}")]
    NotFound(String),

    /// The matching entry has no retrievable document.
    #[error("No document available for {0}")]
    NoDocument(String),

    /// More than one entry matched a lookup that needs exactly one.
    #[error("{count} register entries match {query}; refusing to pick one")]
    AmbiguousResult { count: usize, query: String },

    /// Unknown register type code.
    #[error("Invalid register type: '{0}'. Expected one of HRA, HRB, GnR, PR, VR, GsR")]
    InvalidRegisterType(String),

    /// Unknown federal state name.
    #[error("Invalid federal state: '{0}'")]
    InvalidState(String),

    /// A URL could not be parsed or resolved.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP failure outside the connection itself, such as a redirect loop
    /// or a client that cannot be built. Never retried.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl RegistryError {
    /// Shorthand for a missing markup element.
    pub fn protocol(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Protocol {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Result type alias for register client operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
