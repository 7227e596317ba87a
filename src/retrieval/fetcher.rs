//! HTTP fetching of article and search pages.
//!
//! [`Fetcher`] owns a pooled `reqwest` client configured once with a mobile
//! browser identity. It performs exactly one GET per call; retries and
//! fallbacks belong to the [`Retriever`](super::Retriever).

use super::{RetrievalConfig, RetrievalError};
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Android Chrome identity. Mobile pages are lighter and less often bot-gated.
pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.5";

/// What a page is fetched for. Selects the request timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Article,
    Search,
}

/// Anything that can turn a URL into raw markup.
///
/// [`Fetcher`] is the network implementation; tests substitute an in-memory
/// page table.
pub trait PageSource {
    /// Fetch `url` and return the response body.
    async fn fetch(&self, url: &str, kind: PageKind) -> Result<String, RetrievalError>;
}

/// Network page source backed by a shared, connection-pooled client.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    article_timeout: Duration,
    search_timeout: Duration,
}

impl Fetcher {
    /// Build the client once with browser headers and the configured TLS policy.
    pub fn new(config: &RetrievalConfig) -> Result<Self, RetrievalError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));

        if config.accept_invalid_certs {
            debug!("TLS certificate validation disabled for article fetching");
        }

        let client = Client::builder()
            .user_agent(MOBILE_USER_AGENT)
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| RetrievalError::Network(format!("could not build HTTP client: {e}")))?;

        Ok(Self {
            client,
            article_timeout: config.article_timeout(),
            search_timeout: config.search_timeout(),
        })
    }

    fn timeout_for(&self, kind: PageKind) -> Duration {
        match kind {
            PageKind::Article => self.article_timeout,
            PageKind::Search => self.search_timeout,
        }
    }
}

impl PageSource for Fetcher {
    #[instrument(level = "debug", skip_all, fields(%url, ?kind))]
    async fn fetch(&self, url: &str, kind: PageKind) -> Result<String, RetrievalError> {
        if url.trim().is_empty() {
            return Err(RetrievalError::Network("empty URL".to_string()));
        }

        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .timeout(self.timeout_for(kind))
            .send()
            .await
            .map_err(|e| RetrievalError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Non-success status");
            return Err(RetrievalError::Network(format!("HTTP {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RetrievalError::Parse(format!("unreadable body: {e}")))?;

        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
