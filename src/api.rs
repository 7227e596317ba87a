//! NewsAPI.org client for headlines and keyword search.
//!
//! The client authenticates with the `X-Api-Key` header and decodes the
//! common response envelope. An `"error"` status in the body is surfaced as
//! [`NewsApiError::Api`] even when the HTTP status is a success.
//!
//! # Endpoints
//!
//! - `GET /v2/top-headlines`: [`NewsApiClient::top_headlines`]
//! - `GET /v2/everything`: [`NewsApiClient::search_news`]

use crate::models::{Headline, NewsResponse};
use crate::utils::truncate_for_log;
use clap::ValueEnum;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2";
const CLIENT_USER_AGENT: &str = "NewsTerminal/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum NewsApiError {
    #[error("API key contains characters that cannot be sent in a header")]
    InvalidKey,

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("NewsAPI returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("NewsAPI error ({code}): {message}")]
    Api { code: String, message: String },

    #[error("could not decode NewsAPI response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Headline categories offered in the menu. Digits `1`-`5` select them too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
    #[value(alias = "1")]
    General,
    #[value(alias = "2")]
    Business,
    #[value(alias = "3")]
    Technology,
    #[value(alias = "4")]
    Sports,
    #[value(alias = "5")]
    Health,
}

impl Category {
    /// Name NewsAPI expects in the `category` parameter.
    pub fn api_name(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Business => "business",
            Category::Technology => "technology",
            Category::Sports => "sports",
            Category::Health => "health",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::General => "Headlines",
            Category::Business => "Business",
            Category::Technology => "Technology",
            Category::Sports => "Sports",
            Category::Health => "Health",
        }
    }
}

/// Authenticated NewsAPI client.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    client: Client,
    base_url: String,
}

impl NewsApiClient {
    pub fn new(api_key: &str) -> Result<Self, NewsApiError> {
        Self::with_base_url(api_key, NEWSAPI_BASE_URL)
    }

    /// Client against a different host, e.g. a proxy or a local stub.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, NewsApiError> {
        let mut key = HeaderValue::from_str(api_key).map_err(|_| NewsApiError::InvalidKey)?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-api-key"), key);

        let client = Client::builder()
            .user_agent(CLIENT_USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Top headlines for a category and country.
    #[instrument(level = "info", skip(self))]
    pub async fn top_headlines(
        &self,
        category: Category,
        country: &str,
        page_size: u32,
    ) -> Result<Vec<Headline>, NewsApiError> {
        let url = self.endpoint(
            "top-headlines",
            &[
                ("category", category.api_name().to_string()),
                ("country", country.to_string()),
                ("pageSize", page_size.to_string()),
            ],
        )?;
        self.get_headlines(url).await
    }

    /// Keyword search across all English-language articles.
    ///
    /// `sort_by` is one of `publishedAt`, `relevancy` or `popularity`.
    #[instrument(level = "info", skip(self))]
    pub async fn search_news(
        &self,
        query: &str,
        page_size: u32,
        sort_by: &str,
    ) -> Result<Vec<Headline>, NewsApiError> {
        let url = self.endpoint(
            "everything",
            &[
                ("q", query.to_string()),
                ("pageSize", page_size.to_string()),
                ("sortBy", sort_by.to_string()),
                ("language", "en".to_string()),
            ],
        )?;
        self.get_headlines(url).await
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, NewsApiError> {
        let base = format!("{}/{}", self.base_url, path);
        Ok(Url::parse_with_params(&base, params)?)
    }

    async fn get_headlines(&self, url: Url) -> Result<Vec<Headline>, NewsApiError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "NewsAPI responded"
        );

        let headlines = parse_news_response(status.as_u16(), &body)?;
        info!(count = headlines.len(), "Loaded headlines");
        Ok(headlines)
    }
}

/// Decode a NewsAPI body, giving the envelope's own error precedence over
/// the HTTP status.
pub fn parse_news_response(status: u16, body: &str) -> Result<Vec<Headline>, NewsApiError> {
    match serde_json::from_str::<NewsResponse>(body) {
        Ok(envelope) if envelope.status == "error" => Err(NewsApiError::Api {
            code: envelope.code.unwrap_or_else(|| "unknown".to_string()),
            message: envelope.message.unwrap_or_default(),
        }),
        Ok(_) | Err(_) if !(200..300).contains(&status) => {
            warn!(status, body = %truncate_for_log(body, 200), "NewsAPI request failed");
            Err(NewsApiError::Status {
                status,
                body: truncate_for_log(body, 200),
            })
        }
        Ok(envelope) => {
            debug!(total_results = ?envelope.total_results, "Decoded NewsAPI envelope");
            Ok(envelope.articles.into_iter().map(Headline::from).collect())
        }
        Err(e) => Err(NewsApiError::Decode(e)),
    }
}
