//! URL handling module for Sustain-Scraper
//!
//! This module turns raw `href` attributes into absolute URLs and reduces absolute
//! URLs to the canonical form used as the exploration de-duplication key.

mod normalize;
mod resolve;

// Re-export main functions
pub use normalize::canonicalize_url;
pub use resolve::resolve_href;

/// Returns the canonical string form of an absolute URL, or `None` when the URL
/// cannot be crawled (unparseable, non-HTTP scheme, no host)
pub fn canonical_key(url: &str) -> Option<String> {
    match canonicalize_url(url) {
        Ok(u) => Some(u.to_string()),
        Err(e) => {
            tracing::debug!("Dropping URL {}: {}", url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_key_strips_fragment() {
        assert_eq!(
            canonical_key("https://example.com/about#team"),
            Some("https://example.com/about".to_string())
        );
    }

    #[test]
    fn test_canonical_key_rejects_non_http() {
        assert_eq!(canonical_key("ftp://example.com/file"), None);
        assert_eq!(canonical_key("not a url"), None);
    }
}
