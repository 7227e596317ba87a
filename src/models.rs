//! Data models for headlines and retrieved article text.
//!
//! - [`RawArticle`] / [`NewsResponse`]: NewsAPI wire format
//! - [`Headline`]: display-ready article metadata
//! - [`FetchResult`] / [`SourceLabel`]: outcome of full-text retrieval
//!
//! NewsAPI uses camelCase field names, hence the `rename_all` attributes.

use crate::utils::format_published;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where retrieved article text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SourceLabel {
    /// The article's own URL.
    Original,
    /// A search result on another site; holds its host without `www.`.
    Alternative(String),
    /// Neither the original nor any alternative yielded text.
    Failed,
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLabel::Original => write!(f, "original"),
            SourceLabel::Alternative(domain) => write!(f, "alternative: {domain}"),
            SourceLabel::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of a single retrieval.
///
/// `text` is `None` exactly when `source` is [`SourceLabel::Failed`]; when
/// present it meets the configured minimum length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchResult {
    pub text: Option<String>,
    pub source: SourceLabel,
}

impl FetchResult {
    pub fn original(text: String) -> Self {
        Self {
            text: Some(text),
            source: SourceLabel::Original,
        }
    }

    pub fn alternative(text: String, domain: String) -> Self {
        Self {
            text: Some(text),
            source: SourceLabel::Alternative(domain),
        }
    }

    pub fn failed() -> Self {
        Self {
            text: None,
            source: SourceLabel::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.text.is_some()
    }
}

/// Envelope returned by every NewsAPI endpoint.
///
/// On failure `status` is `"error"` and `code`/`message` describe why.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSource {
    pub name: Option<String>,
}

/// One article exactly as NewsAPI returns it. Any field may be null.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub source: RawSource,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
}

/// Article metadata with display defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Headline {
    pub title: String,
    pub description: String,
    pub source: String,
    pub url: String,
    /// Publication time formatted as `HH:MM • DD Mon YYYY` when parseable.
    pub published: String,
    pub author: String,
}

impl From<RawArticle> for Headline {
    fn from(raw: RawArticle) -> Self {
        Self {
            title: raw.title.unwrap_or_else(|| "No title".to_string()),
            description: raw
                .description
                .unwrap_or_else(|| "No description available.".to_string()),
            source: raw.source.name.unwrap_or_else(|| "Unknown".to_string()),
            url: raw.url.unwrap_or_default(),
            published: raw
                .published_at
                .as_deref()
                .map(format_published)
                .unwrap_or_default(),
            author: raw.author.unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}
