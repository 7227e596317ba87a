//! Small string helpers shared by the API client and the terminal output.

use chrono::DateTime;

/// Display format for publication times, e.g. `14:30 • 06 May 2025`.
pub const PUBLISHED_FORMAT: &str = "%H:%M • %d %b %Y";

/// Reformat an RFC 3339 timestamp for display.
///
/// The offset in the timestamp is kept as-is (NewsAPI sends UTC). Input that
/// does not parse is returned unchanged.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_published("2025-05-06T14:30:00Z"), "14:30 • 06 May 2025");
/// assert_eq!(format_published("yesterday"), "yesterday");
/// ```
pub fn format_published(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format(PUBLISHED_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Shorten a title to `max` characters, marking the cut with `...`.
pub fn truncate_title(title: &str, max: usize) -> String {
    if title.chars().count() <= max {
        title.to_string()
    } else {
        let kept: String = title.chars().take(max).collect();
        format!("{kept}...")
    }
}

/// Truncate a string for logging purposes.
///
/// Keeps the first `max` characters and appends `"…(+N chars)"`.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max).collect();
        format!("{kept}…(+{} chars)", total - max)
    }
}
