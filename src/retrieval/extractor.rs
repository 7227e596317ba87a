//! Article body extraction from arbitrary HTML.
//!
//! The page is parsed leniently, boilerplate is detached from the tree, and
//! the article container is chosen by walking [`CONTENT_SELECTORS`] in
//! priority order. Text comes from paragraph-like elements when the
//! container has them, otherwise from all of its text nodes.
//!
//! Output depends only on the markup: the same input always yields the same
//! bytes.

use super::RetrievalError;
use super::rules::{CONTENT_SELECTORS, MIN_PARAGRAPH_CHARS, PARAGRAPH_SELECTOR, REMOVE_SELECTORS};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("hardcoded regex pattern is valid"));

/// Extract readable article text from `markup`.
///
/// Boilerplate listed in [`REMOVE_SELECTORS`] is detached first, so
/// `<noscript>` fallbacks and scripts never count toward the article.
///
/// # Arguments
///
/// * `markup` - Raw HTML of the page; malformed input is tolerated
/// * `min_chars` - Shortest text (in characters) accepted as an article
///
/// # Returns
///
/// Paragraphs joined by blank lines, or the container's text nodes one per
/// line when it has no paragraph-like elements. Fails with
/// [`RetrievalError::InsufficientContent`] when fewer than `min_chars`
/// characters survive; a paywall stub or a JavaScript shell looks like that.
///
/// # Examples
///
/// ```ignore
/// let html = "<article><p>First paragraph of the story, long enough to keep.</p></article>";
/// assert_eq!(extract(html, 20)?, "First paragraph of the story, long enough to keep.");
/// assert!(extract("<div id=\"root\"></div>", 100).is_err());
/// ```
#[instrument(level = "debug", skip_all, fields(bytes = markup.len()))]
pub fn extract(markup: &str, min_chars: usize) -> Result<String, RetrievalError> {
    let mut document = Html::parse_document(markup);
    let removed = strip_boilerplate(&mut document)?;

    let root = document.root_element();
    let container = match find_container(root)? {
        Some(container) => container,
        None => body_or_root(root),
    };
    let text = container_text(container)?;

    let chars = text.chars().count();
    debug!(removed, chars, container = container.value().name(), "Extracted text");
    if chars < min_chars {
        return Err(RetrievalError::InsufficientContent {
            chars,
            floor: min_chars,
        });
    }
    Ok(text)
}

fn compile(css: &str) -> Result<Selector, RetrievalError> {
    Selector::parse(css).map_err(|e| RetrievalError::Parse(format!("selector {css:?}: {e:?}")))
}

/// Detach every denylisted element. Returns how many were removed.
fn strip_boilerplate(document: &mut Html) -> Result<usize, RetrievalError> {
    let selectors = REMOVE_SELECTORS
        .iter()
        .map(|css| compile(css))
        .collect::<Result<Vec<_>, _>>()?;

    let root = document.root_element();
    let doomed: Vec<_> = selectors
        .iter()
        .flat_map(|selector| root.select(selector).map(|el| el.id()))
        .collect();

    for id in &doomed {
        if let Some(mut node) = document.tree.get_mut(*id) {
            node.detach();
        }
    }
    Ok(doomed.len())
}

/// First selector with any match wins; within it, the longest match.
fn find_container(root: ElementRef<'_>) -> Result<Option<ElementRef<'_>>, RetrievalError> {
    for css in CONTENT_SELECTORS {
        let selector = compile(css)?;
        if let Some(container) = longest(root.select(&selector)) {
            debug!(selector = *css, "Matched article container");
            return Ok(Some(container));
        }
    }
    Ok(None)
}

/// Element with the most text. Ties keep the earlier one in document order.
fn longest<'a>(candidates: impl Iterator<Item = ElementRef<'a>>) -> Option<ElementRef<'a>> {
    candidates
        .fold(None, |best: Option<(usize, ElementRef<'a>)>, el| {
            let len = text_len(el);
            match best {
                Some((best_len, _)) if best_len >= len => best,
                _ => Some((len, el)),
            }
        })
        .map(|(_, el)| el)
}

fn text_len(el: ElementRef<'_>) -> usize {
    el.text().map(|t| t.chars().count()).sum()
}

fn body_or_root(root: ElementRef<'_>) -> ElementRef<'_> {
    root.children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "body")
        .unwrap_or(root)
}

fn container_text(container: ElementRef<'_>) -> Result<String, RetrievalError> {
    let selector = compile(PARAGRAPH_SELECTOR)?;
    let paragraphs: Vec<_> = container.select(&selector).collect();

    if paragraphs.is_empty() {
        return Ok(plain_text(container));
    }

    Ok(paragraphs
        .iter()
        .map(|p| normalize_whitespace(&p.text().collect::<String>()))
        .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
        .join("\n\n"))
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().join(" ")
}

fn plain_text(container: ElementRef<'_>) -> String {
    let joined = container
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .join("\n");
    EXCESS_NEWLINES.replace_all(&joined, "\n\n").into_owned()
}
