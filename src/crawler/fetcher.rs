//! HTTP fetch abstraction
//!
//! The scheduler talks to a `PageFetcher` trait object so tests can swap in
//! instrumented fetchers. The real implementation wraps reqwest and rebuilds
//! its client lazily after transport-level breakage.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Transport failure classification used for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    ConnectionReset,
    ConnectionClosed,
    Protocol,
}

/// Errors produced while fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {status}")]
    Http { status: u16 },

    #[error("response is not HTML: {0}")]
    NotHtml(String),

    #[error("transport failure ({kind:?}): {message}")]
    Transport {
        kind: TransportKind,
        message: String,
    },

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Transport-level failures are worth retrying; everything else is final
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }
}

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects
    pub final_url: String,
    pub status: u16,
    pub html: String,
}

/// Fetch collaborator of the crawl scheduler
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError>;
}

/// reqwest-backed fetcher
///
/// The client is created on first use and dropped after a transport failure
/// so the next request starts from a fresh connection pool.
pub struct HttpFetcher {
    user_agent: String,
    client: Mutex<Option<Client>>,
}

impl HttpFetcher {
    pub fn new(user_agent: String) -> Self {
        Self {
            user_agent,
            client: Mutex::new(None),
        }
    }

    fn client(&self) -> Result<Client, FetchError> {
        let mut guard = self.client.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        debug!("building HTTP client");
        let client = Client::builder()
            .user_agent(&self.user_agent)
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        *guard = Some(client.clone());
        Ok(client)
    }

    fn discard_client(&self) {
        let mut guard = self.client.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            return FetchError::Timeout;
        }
        if error.is_body() || error.is_decode() {
            return FetchError::Body(error.to_string());
        }

        // Anything else at the transport layer invalidates the pooled
        // connections, so the client gets rebuilt on the next fetch.
        self.discard_client();
        let kind = if error.is_connect() {
            TransportKind::ConnectionReset
        } else if error.is_request() {
            TransportKind::ConnectionClosed
        } else {
            TransportKind::Protocol
        };
        FetchError::Transport {
            kind,
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let client = self.client()?;
        let response = client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.is_empty()
            && !content_type.contains("text/html")
            && !content_type.contains("application/xhtml")
        {
            warn!(url, content_type = %content_type, "skipping non-HTML response");
            return Err(FetchError::NotHtml(content_type));
        }

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            html,
        })
    }
}
