//! Plain-text rendering of headline lists and article views.

use crate::models::{FetchResult, Headline, SourceLabel};
use crate::utils::truncate_title;

/// Titles in a listing are cut to this many characters.
pub const LIST_TITLE_CHARS: usize = 75;
const RULE_WIDTH: usize = 60;
const TRUNCATED_NOTE: &str = "[...truncated, open in browser for full article]";

/// Numbered headline listing, at most `limit` entries.
///
/// ```text
///  1. Markets rally as inflation cools
///     Reuters • 14:30 • 06 May 2025
/// ```
pub fn headline_list(heading: &str, headlines: &[Headline], limit: usize) -> String {
    let mut out = format!("{heading}\n{}\n", "─".repeat(RULE_WIDTH));
    if headlines.is_empty() {
        out.push_str("No articles found.\n");
        return out;
    }
    for (i, headline) in headlines.iter().take(limit).enumerate() {
        out.push_str(&format!(
            "{:>2}. {}\n    {}",
            i + 1,
            truncate_title(&headline.title, LIST_TITLE_CHARS),
            headline.source
        ));
        if !headline.published.is_empty() {
            out.push_str(&format!(" • {}", headline.published));
        }
        out.push('\n');
    }
    out
}

/// Full article view: metadata, provenance, body (or description), link.
///
/// With `max_chars` set, a longer body is cut to that many characters and
/// followed by a note pointing at the browser.
pub fn article_view(headline: &Headline, result: &FetchResult, max_chars: Option<usize>) -> String {
    let rule = "─".repeat(RULE_WIDTH);
    let mut out = format!("{}\n\nSource: {}", headline.title, headline.source);
    if !headline.published.is_empty() {
        out.push_str(&format!("  •  {}", headline.published));
    }
    if headline.author != "Unknown" && !headline.author.is_empty() {
        out.push_str(&format!("\nAuthor: {}", headline.author));
    }
    if let SourceLabel::Alternative(domain) = &result.source {
        out.push_str(&format!("\nContent from: {domain}"));
    }
    out.push_str(&format!("\n{rule}\n\n"));

    match &result.text {
        Some(text) => match max_chars {
            Some(max) if text.chars().count() > max => {
                out.extend(text.chars().take(max));
                out.push_str("\n\n");
                out.push_str(TRUNCATED_NOTE);
            }
            _ => out.push_str(text),
        },
        None => {
            if !headline.description.is_empty() {
                out.push_str(&headline.description);
                out.push_str("\n\n");
            }
            out.push_str("[Could not fetch full article - open it in your browser]");
        }
    }

    out.push_str(&format!("\n\n{rule}\nLink: {}\n", headline.url));
    out
}
