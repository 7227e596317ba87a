//! Alternative-source discovery through an HTML search engine.
//!
//! When the original page cannot be scraped, the article title is turned
//! into a news query, the engine's JavaScript-free results page is fetched,
//! and result links are unwrapped and filtered down to a short list of pages
//! likely to carry the same story.
//!
//! Search is best-effort: every failure becomes an empty list.

use super::fetcher::{PageKind, PageSource};
use super::rules::{BLOCKED_DOMAINS, BLOCKED_PATH_PATTERNS, MAX_QUERY_CHARS, QUERY_SUFFIX};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// DuckDuckGo wraps destinations as `//duckduckgo.com/l/?uddg=<encoded>&rut=...`.
static REDIRECT_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"uddg=([^&]+)").expect("hardcoded regex pattern is valid"));

const RESULT_LINK_SELECTOR: &str = "a.result__a";

/// Turn an article title into a search query.
///
/// Punctuation is dropped, the title is cut to [`MAX_QUERY_CHARS`]
/// characters and [`QUERY_SUFFIX`] is appended.
pub fn build_query(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .take(MAX_QUERY_CHARS)
        .collect();
    format!("{cleaned} {QUERY_SUFFIX}")
}

/// Full results-page URL for `title` against `endpoint`.
pub fn search_url(endpoint: &str, title: &str) -> String {
    format!("{endpoint}?q={}", urlencoding::encode(&build_query(title)))
}

/// Recover the destination of a result link.
///
/// Redirect-wrapped links yield the decoded `uddg` value; plain absolute
/// `http(s)` links are returned as-is; anything else is rejected.
pub fn decode_result_href(href: &str) -> Option<String> {
    if let Some(caps) = REDIRECT_PARAM.captures(href) {
        return urlencoding::decode(&caps[1]).ok().map(|url| url.into_owned());
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    None
}

/// Whether `url` plausibly points at an article page.
///
/// Rejects unparseable URLs, non-HTTP schemes, denylisted hosts (and their
/// subdomains) and listing-style paths.
pub fn is_article_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = parsed.host_str().map(str::to_lowercase) else {
        return false;
    };
    let blocked_host = BLOCKED_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")));
    if blocked_host {
        return false;
    }
    let path = parsed.path().to_lowercase();
    !BLOCKED_PATH_PATTERNS.iter().any(|pattern| path.contains(pattern))
}

/// Pull up to `cap` candidate article URLs out of a results page, in page order.
pub fn parse_results(markup: &str, cap: usize) -> Vec<String> {
    let selector = match Selector::parse(RESULT_LINK_SELECTOR) {
        Ok(selector) => selector,
        Err(e) => {
            warn!(error = ?e, "Result link selector failed to compile");
            return Vec::new();
        }
    };
    let document = Html::parse_document(markup);

    let mut candidates = Vec::new();
    for link in document.root_element().select(&selector) {
        if candidates.len() >= cap {
            break;
        }
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        match decode_result_href(href) {
            Some(url) if is_article_url(&url) => candidates.push(url),
            Some(url) => debug!(%url, "Skipping non-article result"),
            None => debug!(%href, "Skipping undecodable result link"),
        }
    }
    candidates
}

/// Search for pages carrying the story titled `title`.
///
/// # Arguments
///
/// * `source` - Page source used for the single results-page request
/// * `endpoint` - Search endpoint queried with `?q=`
/// * `title` - Article title; sanitised by [`build_query`]
/// * `cap` - Maximum number of candidates returned
///
/// # Returns
///
/// Unwrapped, filtered result URLs in page order, at most `cap` of them.
/// Any fetch or parse failure yields an empty list.
///
/// # Examples
///
/// ```ignore
/// let candidates = find_alternatives(&fetcher, DEFAULT_SEARCH_ENDPOINT, "Storm hits coast", 5).await;
/// assert!(candidates.len() <= 5);
/// ```
#[instrument(level = "info", skip(source, endpoint))]
pub async fn find_alternatives<S: PageSource>(
    source: &S,
    endpoint: &str,
    title: &str,
    cap: usize,
) -> Vec<String> {
    let url = search_url(endpoint, title);
    match source.fetch(&url, PageKind::Search).await {
        Ok(markup) => {
            let candidates = parse_results(&markup, cap);
            info!(count = candidates.len(), "Found alternative sources");
            candidates
        }
        Err(e) => {
            warn!(error = %e, "Alternative-source search failed");
            Vec::new()
        }
    }
}
