//! Command-line interface definitions for News Terminal.
//!
//! This module defines the CLI arguments and subcommands using the `clap`
//! crate. The API key and config path can also come from the environment.

use crate::api::Category;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the News Terminal application.
///
/// # Examples
///
/// ```sh
/// # Top technology headlines
/// news_terminal headlines --category technology
///
/// # Read the third headline in full
/// news_terminal open 3
///
/// # Read any article, searching elsewhere if the page is blocked
/// news_terminal read https://example.com/story --title "Storm hits coast"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// NewsAPI key (overrides the config file)
    #[arg(long, env = "NEWSAPI_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Path to the YAML config file
    #[arg(
        short,
        long,
        env = "NEWS_TERMINAL_CONFIG",
        default_value = "config.yaml",
        global = true
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List top headlines for a category
    Headlines {
        /// Category name or menu number (1-5)
        #[arg(long, value_enum, default_value_t = Category::General)]
        category: Category,

        /// Two-letter country code
        #[arg(long, default_value = "us")]
        country: String,

        /// Number of headlines to show
        #[arg(short = 'n', long, default_value_t = 15)]
        limit: usize,
    },

    /// Search all recent articles by keyword
    Search {
        query: String,

        /// Sort order: publishedAt, relevancy or popularity
        #[arg(long, default_value = "publishedAt")]
        sort_by: String,

        /// Number of results to show
        #[arg(short = 'n', long, default_value_t = 15)]
        limit: usize,
    },

    /// Fetch the full text of an article URL
    Read {
        url: String,

        /// Article title, used to find alternative sources if the page fails
        #[arg(long)]
        title: Option<String>,

        /// Short description shown when the full text cannot be fetched
        #[arg(long)]
        description: Option<String>,

        /// Give up on the whole retrieval after this many seconds
        #[arg(long)]
        deadline_secs: Option<u64>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Read the n-th top headline (1-based) in full
    Open {
        index: usize,

        #[arg(long, value_enum, default_value_t = Category::General)]
        category: Category,

        #[arg(long, default_value = "us")]
        country: String,

        #[arg(long)]
        deadline_secs: Option<u64>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Manage the stored API key
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// How a fetched article is presented.
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewArgs {
    /// Cut the article body to this many characters
    #[arg(long)]
    pub max_chars: Option<usize>,

    /// Also open the article link in the default browser
    #[arg(long)]
    pub browser: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Save an API key to the config file
    SetKey { key: String },
    /// Remove the stored API key
    ClearKey,
    /// Print the effective configuration (key masked)
    Show,
}
