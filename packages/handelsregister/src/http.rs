//! HTTP transport for talking to the register portal.
//!
//! [`HttpTransport`] performs single requests; [`RetryingTransport`] wraps any
//! [`Transport`] and repeats requests that failed at the connection level.
//! A [`Session`] stacks both and carries the cookie jar of one operation.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::config::{resolve_url, ClientConfig};
use crate::error::{RegistryError, Result};

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("handelsregister-rs/", env!("CARGO_PKG_VERSION"));

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request against the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Absolute URL or path relative to the portal origin.
    pub path: String,
    /// Form fields in wire order; empty for GET.
    pub form: Vec<(String, String)>,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            form: Vec::new(),
        }
    }

    pub fn post(path: impl Into<String>, form: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            form,
        }
    }

    /// URL-encoded body, fields in insertion order.
    #[must_use]
    pub fn encoded_form(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.form.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish()
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub url: String,
    pub body: String,
}

/// Minimal request executor. Implementations return `HttpStatus` for non-2xx
/// responses and `Transport` for connection-level failures.
pub trait Transport {
    fn execute(&self, request: &Request) -> Result<Response>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &Request) -> Result<Response> {
        (**self).execute(request)
    }
}

/// Transport backed by a blocking reqwest client with a cookie store.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport with a fresh cookie jar and connection pool.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &Request) -> Result<Response> {
        let url = resolve_url(&self.base_url, &request.path)?;

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self
                .client
                .post(&url)
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(request.encoded_form()),
        };

        tracing::debug!(method = ?request.method, url = %url, fields = request.form.len(), "Sending request");

        let response = builder.send().map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                RegistryError::Transport {
                    url: url.clone(),
                    message: e.to_string(),
                }
            } else {
                RegistryError::Client(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().map_err(|e| RegistryError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;

        Ok(Response {
            status: status.as_u16(),
            url: final_url,
            body,
        })
    }
}

/// Retries connection-level failures with a fixed pause. Every other error,
/// including non-2xx statuses, is returned on the first attempt.
#[derive(Debug)]
pub struct RetryingTransport<T> {
    inner: T,
    max_retries: u32,
    retry_delay: Duration,
}

impl<T: Transport> RetryingTransport<T> {
    pub fn new(inner: T, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            retry_delay,
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for RetryingTransport<T> {
    fn execute(&self, request: &Request) -> Result<Response> {
        let mut attempt = 0;
        loop {
            match self.inner.execute(request) {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        error = %e,
                        attempt,
                        max_retries = self.max_retries,
                        "Connection error, will retry"
                    );
                    if !self.retry_delay.is_zero() {
                        thread::sleep(self.retry_delay);
                    }
                }
                result => return result,
            }
        }
    }
}

/// Transport stack used for one operation.
pub type Session = RetryingTransport<HttpTransport>;

/// Open a session: new cookie jar, retry policy from the configuration.
pub fn open_session(config: &ClientConfig) -> Result<Session> {
    let transport = HttpTransport::new(config)?;
    Ok(RetryingTransport::new(
        transport,
        config.max_retries,
        config.retry_delay,
    ))
}
