//! HTTP remote source.
//!
//! The actual HTTP client is abstracted via a trait so tests can swap in a
//! canned client. [`ReqwestClient`] is the production implementation.

use crate::error::{SyncError, SyncResult};
use crate::transport::RemoteSource;
use quotebook_core::QuoteList;
use quotebook_sync_protocol::decode_quotes;
use reqwest::header::ACCEPT;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by an [`HttpClient`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// The request could not be sent or the response not read.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The request exceeded the client timeout.
    #[error("request timed out")]
    Timeout,
    /// The server answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport.
pub trait HttpClient: Send + Sync {
    /// Sends a GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError>;
}

/// Remote source reading a JSON post feed over HTTP.
///
/// Issues `GET <endpoint>?_limit=<N>` and maps each post title to a quote in
/// the `Server` category.
pub struct HttpRemoteSource<C: HttpClient> {
    /// Feed URL (e.g., "https://jsonplaceholder.typicode.com/posts").
    endpoint: String,
    /// HTTP client implementation.
    client: C,
}

impl<C: HttpClient> HttpRemoteSource<C> {
    /// Creates a new HTTP remote source.
    pub fn new(endpoint: impl Into<String>, client: C) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Returns the endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the HTTP client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the URL requested for `limit` records.
    pub fn request_url(&self, limit: usize) -> String {
        let sep = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{}_limit={}", self.endpoint, sep, limit)
    }
}

impl<C: HttpClient> RemoteSource for HttpRemoteSource<C> {
    fn fetch(&self, limit: usize) -> SyncResult<QuoteList> {
        let url = self.request_url(limit);
        tracing::debug!(%url, "fetching remote quotes");

        let body = self.client.get(&url).map_err(|e| match e {
            HttpError::Timeout => SyncError::Timeout,
            HttpError::Transport(message) => SyncError::network_retryable(message),
            HttpError::Status(code) if code >= 500 => {
                SyncError::network_retryable(format!("server returned {code}"))
            }
            HttpError::Status(code) => SyncError::network_fatal(format!("server returned {code}")),
        })?;

        Ok(decode_quotes(&body, limit)?)
    }
}

/// Blocking [`HttpClient`] backed by `reqwest`.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns a fatal network error if the TLS backend cannot initialise.
    pub fn new(timeout: Duration) -> SyncResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quotebook/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::network_fatal(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status(status.as_u16()));
        }

        let body = response.bytes().map_err(from_reqwest)?;
        Ok(body.to_vec())
    }
}

fn from_reqwest(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Transport(e.to_string())
    }
}
