//! Link classification
//!
//! Decides, from nothing but a link's text and URL, whether the crawler should
//! follow it for the active section, skip it, or treat it as a document candidate.

use crate::url::resolve_href;

/// Extension that marks an href as a document without probing
pub const DOCUMENT_EXTENSION: &str = ".pdf";

/// Link text fragments that suggest a document behind an ambiguous href
const DOCUMENT_HINTS: &[&str] = &["pdf", "download"];

/// Classification of a hyperlink relative to a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkClass {
    /// No href worth resolving, or the text matches none of the section keywords
    Irrelevant,
    /// The text or URL contains an exclusion keyword
    Excluded,
    /// The text contains at least one section keyword
    Relevant,
}

impl LinkClass {
    /// Returns true if the crawler may follow this link for the section
    pub fn should_follow(&self) -> bool {
        matches!(self, Self::Relevant)
    }
}

/// Result of classifying a link: its class and, when resolvable, its absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClassification {
    pub class: LinkClass,
    pub url: Option<String>,
}

/// Classifies a link for a section
///
/// Checks are applied in the following priority order:
/// 1. Unresolvable href (empty, `#fragment`, `mailto:` and friends) → `Irrelevant`
/// 2. Exclusion keyword in the lower-cased `text + " " + url` → `Excluded`
/// 3. Section keyword as a substring of the lower-cased text → `Relevant`
/// 4. Otherwise → `Irrelevant`
///
/// Matching is plain substring search, so the keyword `"report"` matches the
/// text `"Sustainability Report 2024"`.
///
/// # Arguments
///
/// * `text` - The visible link text
/// * `href` - The raw `href` attribute
/// * `base` - Base URL relative hrefs are joined to
/// * `keywords` - The active section's keywords
/// * `exclusions` - Keywords that disqualify a link
///
/// # Examples
///
/// ```
/// use sustain_scraper::classify::{classify_link, LinkClass};
///
/// let keywords = vec!["sustainability".to_string()];
/// let exclusions = vec!["blog".to_string()];
/// let result = classify_link(
///     "Sustainability Blog Post",
///     "/blog/sust",
///     "https://example.com",
///     &keywords,
///     &exclusions,
/// );
/// assert_eq!(result.class, LinkClass::Excluded);
/// ```
pub fn classify_link(
    text: &str,
    href: &str,
    base: &str,
    keywords: &[String],
    exclusions: &[String],
) -> LinkClassification {
    let url = match resolve_href(href, base) {
        Some(url) => url,
        None => {
            return LinkClassification {
                class: LinkClass::Irrelevant,
                url: None,
            }
        }
    };

    let class = if is_excluded(text, &url, exclusions) {
        LinkClass::Excluded
    } else if matches_keywords(text, keywords) {
        LinkClass::Relevant
    } else {
        LinkClass::Irrelevant
    };

    LinkClassification {
        class,
        url: Some(url),
    }
}

/// Returns true if any exclusion keyword occurs in the link text or URL
pub fn is_excluded(text: &str, url: &str, exclusions: &[String]) -> bool {
    let combined = format!("{} {}", text, url).to_lowercase();
    exclusions
        .iter()
        .any(|keyword| combined.contains(&keyword.to_lowercase()))
}

/// Returns true if the lower-cased text contains any of the keywords
pub fn matches_keywords(text: &str, keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    keywords
        .iter()
        .any(|keyword| text.contains(&keyword.to_lowercase()))
}

/// Returns true if the href's path ends in a document extension
///
/// Query strings and fragments are ignored, so `/a.pdf?v=2` is a document.
pub fn is_document_href(href: &str) -> bool {
    let path = href
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    path.ends_with(DOCUMENT_EXTENSION)
}

/// Returns true if the link text suggests the href serves a document
///
/// Such links are worth a HEAD probe even though the href itself has no
/// document extension.
pub fn is_document_candidate(text: &str, report_keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    DOCUMENT_HINTS.iter().any(|hint| text.contains(hint))
        || report_keywords
            .iter()
            .any(|keyword| text.contains(&keyword.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com";

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn exclusions() -> Vec<String> {
        crate::config::Config::default().exclusion_keywords
    }

    #[test]
    fn test_relevant_link() {
        let result = classify_link(
            "About Us",
            "/about",
            BASE,
            &strings(&["about"]),
            &exclusions(),
        );
        assert_eq!(result.class, LinkClass::Relevant);
        assert_eq!(result.url.as_deref(), Some("https://example.com/about"));
    }

    #[test]
    fn test_substring_semantics() {
        let result = classify_link(
            "Sustainability Report",
            "/sr",
            BASE,
            &strings(&["report"]),
            &exclusions(),
        );
        assert_eq!(result.class, LinkClass::Relevant);
    }

    #[test]
    fn test_irrelevant_link() {
        let result = classify_link(
            "Our Team",
            "/team",
            BASE,
            &strings(&["annual report"]),
            &exclusions(),
        );
        assert_eq!(result.class, LinkClass::Irrelevant);
        assert!(result.url.is_some());
    }

    #[test]
    fn test_exclusion_precedence() {
        let result = classify_link(
            "Sustainability Blog Post",
            "/blog/sust",
            BASE,
            &strings(&["sustainability", "sustainability report"]),
            &exclusions(),
        );
        assert_eq!(result.class, LinkClass::Excluded);
        assert!(!result.class.should_follow());
    }

    #[test]
    fn test_exclusion_matches_url() {
        let result = classify_link(
            "Annual Report",
            "/careers/annual-report",
            BASE,
            &strings(&["annual report"]),
            &exclusions(),
        );
        assert_eq!(result.class, LinkClass::Excluded);
    }

    #[test]
    fn test_fragment_and_empty_href_irrelevant() {
        for href in ["", "#reports", "mailto:ir@example.com"] {
            let result = classify_link(
                "Annual Report",
                href,
                BASE,
                &strings(&["annual report"]),
                &exclusions(),
            );
            assert_eq!(result.class, LinkClass::Irrelevant, "href {:?}", href);
            assert_eq!(result.url, None);
        }
    }

    #[test]
    fn test_case_insensitive_keywords() {
        let result = classify_link(
            "ANNUAL REPORT 2024",
            "/ar",
            BASE,
            &strings(&["Annual Report"]),
            &[],
        );
        assert_eq!(result.class, LinkClass::Relevant);
    }

    #[test]
    fn test_is_document_href() {
        assert!(is_document_href("/files/2024.pdf"));
        assert!(is_document_href("https://example.com/A.PDF"));
        assert!(is_document_href("/report.pdf?version=2"));
        assert!(!is_document_href("/reports"));
        assert!(!is_document_href("/pdf-library"));
    }

    #[test]
    fn test_is_document_candidate() {
        let report_keywords = strings(&["annual report"]);
        assert!(is_document_candidate("Download", &report_keywords));
        assert!(is_document_candidate("Fact sheet (PDF)", &report_keywords));
        assert!(is_document_candidate("2023 Annual Report", &report_keywords));
        assert!(!is_document_candidate("Our history", &report_keywords));
    }
}
