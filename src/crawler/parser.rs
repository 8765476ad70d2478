//! HTML parser for extracting page text and anchors
//!
//! This module handles parsing HTML content to extract:
//! - The page's paragraph text
//! - Every `<a href>` anchor, with its visible text and raw href
//! - The anchors inside the first `<nav>` region
//!
//! Hrefs are returned raw; resolving and classifying them is left to the caller,
//! since both depend on the section being crawled.

use scraper::{ElementRef, Html, Selector};

/// A hyperlink as it appears in the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Visible link text, whitespace-trimmed
    pub text: String,
    /// Raw `href` attribute value
    pub href: String,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Trimmed text of every `<p>`, joined with `\n`
    pub content: String,

    /// All anchors with an `href`, in document order
    pub anchors: Vec<Anchor>,

    /// Anchors inside the first `<nav>` element, in document order
    pub nav_anchors: Vec<Anchor>,
}

/// Parses HTML content and extracts paragraph text and anchors
///
/// Parsing never fails: malformed markup yields whatever the HTML5 parser
/// recovers, possibly an empty page.
///
/// # Example
///
/// ```
/// use sustain_scraper::crawler::parse_html;
///
/// let html = r#"<html><body><p>Hello</p><a href="/about">About us</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.content, "Hello");
/// assert_eq!(parsed.anchors[0].href, "/about");
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        content: extract_content(&document),
        anchors: extract_anchors(&document),
        nav_anchors: extract_nav_anchors(&document),
    }
}

fn extract_content(document: &Html) -> String {
    let Ok(selector) = Selector::parse("p") else {
        return String::new();
    };

    document
        .select(&selector)
        .map(|p| element_text(&p))
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_anchors(document: &Html) -> Vec<Anchor> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| anchor_of(&element))
        .collect()
}

fn extract_nav_anchors(document: &Html) -> Vec<Anchor> {
    let (Ok(nav_selector), Ok(a_selector)) = (Selector::parse("nav"), Selector::parse("a[href]"))
    else {
        return Vec::new();
    };

    match document.select(&nav_selector).next() {
        Some(nav) => nav
            .select(&a_selector)
            .filter_map(|element| anchor_of(&element))
            .collect(),
        None => {
            tracing::debug!("Navigation menu not found");
            Vec::new()
        }
    }
}

fn anchor_of(element: &ElementRef) -> Option<Anchor> {
    let href = element.value().attr("href")?;
    Some(Anchor {
        text: element_text(element),
        href: href.to_string(),
    })
}

/// Concatenates an element's text nodes, each trimmed, separated by single spaces
fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
