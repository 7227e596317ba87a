//! # News Terminal
//!
//! A terminal news reader: lists NewsAPI headlines and pulls the full text
//! of any article, falling back to the same story on another site when the
//! original page is blocked, paywalled or unreachable.
//!
//! ## Usage
//!
//! ```sh
//! news_terminal headlines --category technology
//! news_terminal open 2
//! news_terminal read https://example.com/story --title "Storm hits coast"
//! ```
//!
//! ## Architecture
//!
//! 1. **Headlines**: NewsAPI client ([`api`])
//! 2. **Retrieval**: fetch, extract, search, retry ([`retrieval`])
//! 3. **Output**: plain-text rendering ([`outputs`])
//!
//! Logs go to stderr (`RUST_LOG` controls verbosity); article text goes to
//! stdout.

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod models;
mod outputs;
mod retrieval;
mod utils;

use api::{Category, NewsApiClient};
use cli::{Cli, Command, ConfigAction, ViewArgs};
use config::{AppConfig, resolve_api_key};
use models::{FetchResult, Headline};
use outputs::browser::open_in_browser;
use outputs::terminal::{article_view, headline_list};
use retrieval::Retriever;
use retrieval::orchestrator::domain_label;

/// NewsAPI page size; the listing shows a prefix of it.
const PAGE_SIZE: u32 = 20;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let Cli {
        api_key,
        config: config_path,
        command,
    } = Cli::parse();
    debug!(config_path = %config_path.display(), "Parsed CLI arguments");

    // Config subcommands tolerate a broken file.
    let mut config = match command {
        Command::Config { .. } => AppConfig::load_or_default(&config_path).await,
        _ => AppConfig::load(&config_path).await?,
    };

    if let Err(e) = run(command, api_key.as_deref(), &mut config, &config_path).await {
        error!(error = %e, "Command failed");
        return Err(e);
    }
    Ok(())
}

async fn run(
    command: Command,
    api_key: Option<&str>,
    config: &mut AppConfig,
    config_path: &Path,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Headlines {
            category,
            country,
            limit,
        } => {
            let client = news_client(api_key, config, config_path).await?;
            let headlines = client.top_headlines(category, &country, PAGE_SIZE).await?;
            print!("{}", headline_list(category.label(), &headlines, limit));
        }
        Command::Search {
            query,
            sort_by,
            limit,
        } => {
            let client = news_client(api_key, config, config_path).await?;
            let headlines = client.search_news(&query, PAGE_SIZE, &sort_by).await?;
            print!("{}", headline_list(&format!("Search: {query}"), &headlines, limit));
        }
        Command::Read {
            url,
            title,
            description,
            deadline_secs,
            view,
        } => {
            let headline = Headline {
                title: title.clone().unwrap_or_else(|| url.clone()),
                description: description.unwrap_or_default(),
                source: domain_label(&url),
                url: url.clone(),
                published: String::new(),
                author: String::new(),
            };
            let result = read_article(config, &url, title.as_deref(), deadline_secs).await?;
            show_article(&headline, &result, view)?;
        }
        Command::Open {
            index,
            category,
            country,
            deadline_secs,
            view,
        } => {
            let headline = pick_headline(api_key, config, config_path, category, &country, index).await?;
            let result =
                read_article(config, &headline.url, Some(headline.title.as_str()), deadline_secs)
                    .await?;
            show_article(&headline, &result, view)?;
        }
        Command::Config { action } => match action {
            ConfigAction::SetKey { key } => {
                config.set_api_key(&key, config_path).await?;
                println!("✓ API key saved to {}", config_path.display());
            }
            ConfigAction::ClearKey => {
                config.clear_api_key(config_path).await?;
                println!("API key removed");
            }
            ConfigAction::Show => {
                let mut shown = config.clone();
                shown.api_key = shown.api_key.as_deref().map(mask_key);
                print!("{}", serde_yaml::to_string(&shown)?);
            }
        },
    }
    Ok(())
}

async fn news_client(
    api_key: Option<&str>,
    config: &mut AppConfig,
    config_path: &Path,
) -> Result<NewsApiClient, Box<dyn Error>> {
    let key = resolve_api_key(api_key, config, config_path).await?;
    Ok(NewsApiClient::new(&key)?)
}

#[instrument(level = "info", skip(api_key, config, config_path))]
async fn pick_headline(
    api_key: Option<&str>,
    config: &mut AppConfig,
    config_path: &Path,
    category: Category,
    country: &str,
    index: usize,
) -> Result<Headline, Box<dyn Error>> {
    let client = news_client(api_key, config, config_path).await?;
    let headlines = client.top_headlines(category, country, PAGE_SIZE).await?;
    let count = headlines.len();
    index
        .checked_sub(1)
        .and_then(|i| headlines.into_iter().nth(i))
        .ok_or_else(|| format!("no headline #{index}; {count} available").into())
}

#[instrument(level = "info", skip(config, title))]
async fn read_article(
    config: &AppConfig,
    url: &str,
    title: Option<&str>,
    deadline_secs: Option<u64>,
) -> Result<FetchResult, Box<dyn Error>> {
    let retriever = Retriever::new(config.retrieval.clone())?;
    let result = match deadline_secs {
        Some(secs) => {
            retriever
                .retrieve_within(url, title, Duration::from_secs(secs))
                .await
        }
        None => retriever.retrieve(url, title).await,
    };
    info!(source = %result.source, success = result.is_success(), "Retrieval finished");
    Ok(result)
}

fn show_article(
    headline: &Headline,
    result: &FetchResult,
    view: ViewArgs,
) -> Result<(), Box<dyn Error>> {
    println!("{}", article_view(headline, result, view.max_chars));
    if view.browser {
        open_in_browser(&headline.url)?;
    }
    Ok(())
}

/// Show only the last four characters of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let visible = chars.len().min(4);
    let tail: String = chars[chars.len() - visible..].iter().collect();
    format!("{}{tail}", "*".repeat(chars.len() - visible))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abcdef123456"), "********3456");
        assert_eq!(mask_key("abc"), "abc");
        assert_eq!(mask_key(""), "");
    }
}
