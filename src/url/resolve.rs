/// Schemes that never point at crawlable content
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves a raw `href` against the crawl's base URL
///
/// An href that already carries an HTTP(S) scheme is returned unchanged. Any
/// other href is appended to the base URL with exactly one `/` between them,
/// so `"/files/a.pdf"` and `"files/a.pdf"` resolve to the same URL.
/// Protocol-relative hrefs (`//cdn.example.com/x`) take the base URL's scheme.
///
/// # Returns
///
/// * `Some(String)` - The absolute URL
/// * `None` - The href is empty, fragment-only, or uses a non-navigable scheme
///
/// # Examples
///
/// ```
/// use sustain_scraper::url::resolve_href;
///
/// let base = "https://example.com/";
/// assert_eq!(
///     resolve_href("/files/2024.pdf", base).as_deref(),
///     Some("https://example.com/files/2024.pdf")
/// );
/// assert_eq!(resolve_href("#top", base), None);
/// ```
pub fn resolve_href(href: &str, base: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_lowercase();
    if SKIPPED_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return None;
    }

    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(href.to_string());
    }

    if let Some(rest) = href.strip_prefix("//") {
        let scheme = base.split("://").next().unwrap_or("https");
        return Some(format!("{}://{}", scheme, rest));
    }

    Some(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        href.trim_start_matches('/')
    ))
}
