//! Coordinates fetching, extraction and fallback search.

use super::extractor::extract;
use super::fetcher::{Fetcher, PageKind, PageSource};
use super::search::find_alternatives;
use super::{RetrievalConfig, RetrievalError};
use crate::models::FetchResult;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Produces article text for a URL, falling back to alternative sources.
///
/// Holds no per-call state, so one instance can serve many retrievals; the
/// default [`Fetcher`] source shares its connection pool across them.
#[derive(Debug, Clone)]
pub struct Retriever<S = Fetcher> {
    source: S,
    config: RetrievalConfig,
}

impl Retriever<Fetcher> {
    /// Build a network-backed retriever.
    pub fn new(config: RetrievalConfig) -> Result<Self, RetrievalError> {
        let source = Fetcher::new(&config)?;
        Ok(Self::with_source(source, config))
    }
}

impl<S: PageSource> Retriever<S> {
    pub fn with_source(source: S, config: RetrievalConfig) -> Self {
        Self { source, config }
    }

    /// Retrieve article text for `url`.
    ///
    /// The original page is tried first. Only if it fails and a title is
    /// known are search candidates tried, one at a time, stopping at the
    /// first that yields text.
    ///
    /// # Arguments
    ///
    /// * `url` - Article URL as reported by the headline source
    /// * `title` - Article title, used to search for alternatives; `None`
    ///   or a blank title disables the search
    ///
    /// # Returns
    ///
    /// A [`FetchResult`] labelled `Original`, `Alternative(domain)` or
    /// `Failed`. Never fails: exhaustion is reported as
    /// [`SourceLabel::Failed`](crate::models::SourceLabel::Failed).
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let retriever = Retriever::new(RetrievalConfig::default())?;
    /// let result = retriever.retrieve("https://example.com/story", Some("Storm hits coast")).await;
    /// if let Some(text) = result.text {
    ///     println!("{text}");
    /// }
    /// ```
    #[instrument(level = "info", skip(self))]
    pub async fn retrieve(&self, url: &str, title: Option<&str>) -> FetchResult {
        let t0 = Instant::now();

        match self.scrape(url).await {
            Ok(text) => {
                info!(chars = text.chars().count(), "Retrieved original article");
                return FetchResult::original(text);
            }
            Err(e) => warn!(error = %e, "Original article unavailable"),
        }

        let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) else {
            debug!("No title to search with");
            return FetchResult::failed();
        };

        let candidates = find_alternatives(
            &self.source,
            &self.config.search_endpoint,
            title,
            self.config.max_candidates,
        )
        .await;

        for candidate in candidates.iter().filter(|c| c.as_str() != url) {
            match self.scrape(candidate).await {
                Ok(text) => {
                    let domain = domain_label(candidate);
                    info!(
                        %domain,
                        chars = text.chars().count(),
                        elapsed_ms = t0.elapsed().as_millis() as u64,
                        "Retrieved article from alternative source"
                    );
                    return FetchResult::alternative(text, domain);
                }
                Err(e) => debug!(%candidate, error = %e, "Alternative source unusable"),
            }
        }

        warn!(
            tried = candidates.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "No source yielded article text"
        );
        FetchResult::failed()
    }

    /// [`retrieve`](Self::retrieve) bounded by an overall deadline.
    ///
    /// On expiry the in-flight request is dropped and the result is `Failed`.
    pub async fn retrieve_within(
        &self,
        url: &str,
        title: Option<&str>,
        deadline: Duration,
    ) -> FetchResult {
        match tokio::time::timeout(deadline, self.retrieve(url, title)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%url, deadline_ms = deadline.as_millis() as u64, "Retrieval deadline exceeded");
                FetchResult::failed()
            }
        }
    }

    async fn scrape(&self, url: &str) -> Result<String, RetrievalError> {
        let markup = self.source.fetch(url, PageKind::Article).await?;
        extract(&markup, self.config.min_content_chars)
    }
}

/// Host of `url` with a leading `www.` removed, for provenance display.
pub fn domain_label(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .map(|host| host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceLabel;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const P1: &str = "The city council voted on Tuesday to approve a new budget for public transit improvements.";
    const P2: &str = "Officials said the plan would add bus routes and extend service hours across the region.";

    /// In-memory pages keyed by URL; search requests are keyed by `SEARCH`.
    #[derive(Default)]
    struct FakePages {
        pages: HashMap<String, Result<String, RetrievalError>>,
        search_page: Option<String>,
        requests: Mutex<Vec<(String, PageKind)>>,
        delay: Option<Duration>,
    }

    impl FakePages {
        fn page(mut self, url: &str, body: String) -> Self {
            self.pages.insert(url.to_string(), Ok(body));
            self
        }

        fn missing(mut self, url: &str) -> Self {
            self.pages
                .insert(url.to_string(), Err(RetrievalError::Network("HTTP 404".to_string())));
            self
        }

        fn search_results(mut self, hrefs: &[&str]) -> Self {
            let links: String = hrefs
                .iter()
                .map(|href| format!(r#"<a class="result__a" href="{href}">r</a>"#))
                .collect();
            self.search_page = Some(format!("<html><body>{links}</body></html>"));
            self
        }

        fn requests(&self) -> Vec<(String, PageKind)> {
            self.requests.lock().unwrap().clone()
        }

        fn search_calls(&self) -> usize {
            self.requests()
                .iter()
                .filter(|(_, kind)| *kind == PageKind::Search)
                .count()
        }
    }

    impl PageSource for FakePages {
        async fn fetch(&self, url: &str, kind: PageKind) -> Result<String, RetrievalError> {
            self.requests.lock().unwrap().push((url.to_string(), kind));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match kind {
                PageKind::Search => self
                    .search_page
                    .clone()
                    .ok_or_else(|| RetrievalError::Network("search unavailable".to_string())),
                PageKind::Article => self
                    .pages
                    .get(url)
                    .cloned()
                    .unwrap_or_else(|| Err(RetrievalError::Network("connection refused".to_string()))),
            }
        }
    }

    fn article_page(body: &str) -> String {
        format!("<html><body><article>{body}</article></body></html>")
    }

    fn full_article() -> String {
        article_page(&format!("<p>{P1}</p><p>{P2}</p>"))
    }

    fn retriever(pages: FakePages) -> Retriever<FakePages> {
        Retriever::with_source(pages, RetrievalConfig::default())
    }

    #[tokio::test]
    async fn test_original_success_skips_search() {
        let r = retriever(FakePages::default().page("https://news.example/a", full_article()));
        let result = r.retrieve("https://news.example/a", Some("Budget passes")).await;

        assert_eq!(result.source, SourceLabel::Original);
        assert_eq!(result.text.as_deref(), Some(format!("{P1}\n\n{P2}").as_str()));
        assert_eq!(r.source.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_404_falls_back_to_second_candidate() {
        let pages = FakePages::default()
            .missing("https://origin.example/story")
            .search_results(&["https://example.com/a", "https://example.com/b"])
            .page("https://example.com/a", article_page("<p>Too short to count.</p>"))
            .page("https://example.com/b", full_article());
        let r = retriever(pages);

        let result = r.retrieve("https://origin.example/story", Some("Budget passes")).await;

        assert_eq!(result.source, SourceLabel::Alternative("example.com".to_string()));
        assert_eq!(result.text.as_deref(), Some(format!("{P1}\n\n{P2}").as_str()));
        let fetched: Vec<String> = r.source.requests().into_iter().map(|(url, _)| url).collect();
        assert_eq!(fetched.len(), 4);
        assert_eq!(fetched[0], "https://origin.example/story");
        assert_eq!(fetched[2], "https://example.com/a");
        assert_eq!(fetched[3], "https://example.com/b");
    }

    #[tokio::test]
    async fn test_teaser_triggers_fallback() {
        let teaser = article_page("<p>Subscribe now to keep reading this exclusive report today.</p>");
        let pages = FakePages::default()
            .page("https://paywalled.example/story", teaser)
            .search_results(&["https://www.mirror.example/story"])
            .page("https://www.mirror.example/story", full_article());
        let r = retriever(pages);

        let result = r.retrieve("https://paywalled.example/story", Some("Budget passes")).await;

        assert_eq!(result.source, SourceLabel::Alternative("mirror.example".to_string()));
        assert!(result.text.is_some());
    }

    #[tokio::test]
    async fn test_no_title_means_no_search() {
        let r = retriever(FakePages::default().missing("https://origin.example/story"));

        let result = r.retrieve("https://origin.example/story", None).await;

        assert_eq!(result, FetchResult::failed());
        assert_eq!(r.source.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_title_means_no_search() {
        let r = retriever(FakePages::default().missing("https://origin.example/story"));

        let result = r.retrieve("https://origin.example/story", Some("   ")).await;

        assert_eq!(result.source, SourceLabel::Failed);
        assert_eq!(r.source.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_original_url_not_retried() {
        let pages = FakePages::default()
            .missing("https://origin.example/story")
            .search_results(&["https://origin.example/story"]);
        let r = retriever(pages);

        let result = r.retrieve("https://origin.example/story", Some("Budget passes")).await;

        assert_eq!(result.source, SourceLabel::Failed);
        let article_fetches = r
            .source
            .requests()
            .iter()
            .filter(|(_, kind)| *kind == PageKind::Article)
            .count();
        assert_eq!(article_fetches, 1);
    }

    #[tokio::test]
    async fn test_search_failure_yields_failed() {
        let r = retriever(FakePages::default().missing("https://origin.example/story"));

        let result = r.retrieve("https://origin.example/story", Some("Budget passes")).await;

        assert_eq!(result, FetchResult::failed());
        assert_eq!(r.source.search_calls(), 1);
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let pages = FakePages::default()
            .missing("https://origin.example/story")
            .search_results(&["https://one.example/a", "https://two.example/b"])
            .page("https://one.example/a", full_article())
            .page("https://two.example/b", full_article());
        let r = retriever(pages);

        let result = r.retrieve("https://origin.example/story", Some("Budget passes")).await;

        assert_eq!(result.source, SourceLabel::Alternative("one.example".to_string()));
        assert!(
            !r.source
                .requests()
                .iter()
                .any(|(url, _)| url == "https://two.example/b")
        );
    }

    #[tokio::test]
    async fn test_malformed_inputs_never_panic() {
        let r = retriever(FakePages::default());
        for url in ["", "   ", "not a url", "http://", "https://[::1"] {
            let result = r.retrieve(url, Some("!!!")).await;
            assert_eq!(result.source, SourceLabel::Failed);
            assert!(result.text.is_none());
        }
    }

    #[tokio::test]
    async fn test_deadline_expiry_is_failed() {
        let pages = FakePages {
            delay: Some(Duration::from_millis(200)),
            ..FakePages::default()
        }
        .page("https://slow.example/a", full_article());
        let r = retriever(pages);

        let result = r
            .retrieve_within("https://slow.example/a", None, Duration::from_millis(20))
            .await;

        assert_eq!(result, FetchResult::failed());
    }

    #[tokio::test]
    async fn test_deadline_not_reached() {
        let r = retriever(FakePages::default().page("https://fast.example/a", full_article()));

        let result = r
            .retrieve_within("https://fast.example/a", None, Duration::from_secs(5))
            .await;

        assert_eq!(result.source, SourceLabel::Original);
    }

    #[tokio::test]
    async fn test_network_fallback_end_to_end() {
        use httpmock::prelude::*;

        let server = MockServer::start_async().await;
        let original = server
            .mock_async(|when, then| {
                when.method(GET).path("/story");
                then.status(404);
            })
            .await;
        let alternative_url = server.url("/mirror");
        let search = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/html/")
                    .query_param("q", "Budget passes news");
                then.status(200).body(format!(
                    r#"<html><body><a class="result__a" href="{alternative_url}">r</a></body></html>"#
                ));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/mirror");
                then.status(200).body(full_article());
            })
            .await;

        let config = RetrievalConfig {
            search_endpoint: server.url("/html/"),
            ..RetrievalConfig::default()
        };
        let r = Retriever::new(config).unwrap();
        let result = r.retrieve(&server.url("/story"), Some("Budget passes")).await;

        original.assert_async().await;
        search.assert_async().await;
        assert_eq!(result.source, SourceLabel::Alternative("127.0.0.1".to_string()));
        assert_eq!(result.text.as_deref(), Some(format!("{P1}\n\n{P2}").as_str()));
    }

    #[test]
    fn test_domain_label() {
        assert_eq!(domain_label("https://www.example.com/a"), "example.com");
        assert_eq!(domain_label("https://news.bbc.co.uk/x"), "news.bbc.co.uk");
        assert_eq!(domain_label("https://example.www.com/x"), "example.www.com");
        assert_eq!(domain_label("garbage"), "unknown");
    }
}
