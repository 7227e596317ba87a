//! Hand an article link to the system web browser.

use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("refusing to open {0:?}: only http and https links are launched")]
    UnsupportedUrl(String),

    #[error("could not launch a browser: {0}")]
    Launch(#[from] std::io::Error),
}

/// Parse `url` and keep it only if it is a web link.
///
/// Article URLs come from a third-party API, so `file:`, `javascript:` and
/// other schemes are never passed to the desktop launcher.
pub fn web_link(url: &str) -> Result<Url, BrowserError> {
    match Url::parse(url.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(parsed),
        _ => Err(BrowserError::UnsupportedUrl(url.to_string())),
    }
}

/// Open `url` in the default browser.
#[instrument(level = "info")]
pub fn open_in_browser(url: &str) -> Result<(), BrowserError> {
    let link = web_link(url)?;
    webbrowser::open(link.as_str())?;
    info!("Opened article in browser");
    Ok(())
}
