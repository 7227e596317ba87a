//! Full-text retrieval for news articles.
//!
//! Given an article URL and (optionally) its title, this module tries to
//! produce readable article text:
//!
//! 1. **Fetch** the page with a mobile browser identity ([`fetcher`])
//! 2. **Extract** the article body from the markup ([`extractor`])
//! 3. On failure, **search** for the same story elsewhere ([`search`])
//! 4. **Retry** each candidate in order until one yields text ([`orchestrator`])
//!
//! Every step reports failure as a [`RetrievalError`] value. The
//! [`Retriever`] folds those into a [`FetchResult`](crate::models::FetchResult)
//! and never fails itself.

pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod orchestrator;
pub mod rules;
pub mod search;

pub use error::RetrievalError;
pub use orchestrator::Retriever;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default search endpoint: DuckDuckGo's JavaScript-free results page.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Tunables for the retrieval pipeline.
///
/// Loaded from the `retrieval` section of the config file; every field has a
/// default so the section may be omitted entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Per-request timeout for article pages, in seconds.
    pub article_timeout_secs: u64,
    /// Per-request timeout for search result pages, in seconds.
    pub search_timeout_secs: u64,
    /// Upper bound on alternative sources tried after the original fails.
    pub max_candidates: usize,
    /// Extracted text shorter than this (in characters) counts as a failure.
    pub min_content_chars: usize,
    /// Accept invalid or self-signed TLS certificates.
    ///
    /// On by default so constrained networks (captive proxies, old CA
    /// bundles) still get text. This is a trust boundary: turn it off where
    /// transport security matters more than availability.
    pub accept_invalid_certs: bool,
    /// HTML search endpoint queried with `?q=`.
    pub search_endpoint: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            article_timeout_secs: 15,
            search_timeout_secs: 10,
            max_candidates: 5,
            min_content_chars: 100,
            accept_invalid_certs: true,
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
        }
    }
}

impl RetrievalConfig {
    pub fn article_timeout(&self) -> Duration {
        Duration::from_secs(self.article_timeout_secs)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RetrievalConfig::default();
        assert_eq!(config.article_timeout(), Duration::from_secs(15));
        assert_eq!(config.search_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_candidates, 5);
        assert_eq!(config.min_content_chars, 100);
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "max_candidates: 3\naccept_invalid_certs: false\n";
        let config: RetrievalConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.max_candidates, 3);
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.min_content_chars, 100);
        assert_eq!(config.search_endpoint, DEFAULT_SEARCH_ENDPOINT);
    }
}
