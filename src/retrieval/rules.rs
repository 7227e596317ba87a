//! Ordered heuristic tables used by the extractor and the search filter.
//!
//! These are plain data so they can be reviewed and extended without
//! touching control flow. Order matters for [`CONTENT_SELECTORS`]: the first
//! selector that matches anything wins.

/// Elements stripped from a page before looking for the article container.
pub const REMOVE_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "template",
    "nav",
    "header",
    "footer",
    "aside",
    ".advertisement",
    ".ad",
    ".ads",
    ".social-share",
    ".related-articles",
    ".comments",
    ".sidebar",
    r#"[class*="newsletter"]"#,
    r#"[class*="subscribe"]"#,
    r#"[class*="popup"]"#,
    r#"[class*="modal"]"#,
];

/// Article container selectors, highest priority first.
pub const CONTENT_SELECTORS: &[&str] = &[
    "article",
    r#"[class*="article-body"]"#,
    r#"[class*="article-content"]"#,
    r#"[class*="post-content"]"#,
    r#"[class*="entry-content"]"#,
    r#"[class*="story-body"]"#,
    r#"[class*="content-body"]"#,
    r#"[itemprop="articleBody"]"#,
    ".article__body",
    ".article-text",
    ".story-content",
    "main",
];

/// Paragraph-like elements collected from the chosen container.
pub const PARAGRAPH_SELECTOR: &str = "p, h2, h3, blockquote";

/// Paragraphs at or below this many characters are treated as captions or chrome.
pub const MIN_PARAGRAPH_CHARS: usize = 20;

/// Hosts that never carry the article itself. Subdomains match too.
pub const BLOCKED_DOMAINS: &[&str] = &[
    "youtube.com",
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "tiktok.com",
    "reddit.com",
    "wikipedia.org",
    "amazon.com",
    "ebay.com",
];

/// Path fragments that mark listing or index pages rather than articles.
pub const BLOCKED_PATH_PATTERNS: &[&str] = &["/search", "/category", "/tag/", "/author/"];

/// Literal appended to every search query to bias results toward news coverage.
pub const QUERY_SUFFIX: &str = "news";

/// Maximum number of title characters kept in a search query.
pub const MAX_QUERY_CHARS: usize = 100;

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    #[test]
    fn test_all_selectors_compile() {
        for css in REMOVE_SELECTORS
            .iter()
            .chain(CONTENT_SELECTORS)
            .chain(std::iter::once(&PARAGRAPH_SELECTOR))
        {
            assert!(Selector::parse(css).is_ok(), "selector failed: {css}");
        }
    }

    #[test]
    fn test_script_fallbacks_removed() {
        assert!(REMOVE_SELECTORS.contains(&"noscript"));
        assert!(REMOVE_SELECTORS.contains(&"template"));
    }

    #[test]
    fn test_article_is_highest_priority() {
        assert_eq!(CONTENT_SELECTORS.first(), Some(&"article"));
        assert_eq!(CONTENT_SELECTORS.last(), Some(&"main"));
    }
}
