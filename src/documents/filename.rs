use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Name used when a document URL has no usable last path segment
pub const FALLBACK_FILE_NAME: &str = "downloaded.pdf";

/// Number of hex characters kept from the identity hash
const ID_LENGTH: usize = 10;

/// Replaces every character that is not alphanumeric, a space, `.` or `_` with `_`
///
/// The transform maps characters one to one, so the result has as many
/// characters as the input, and applying it twice changes nothing.
///
/// # Examples
///
/// ```
/// use sustain_scraper::documents::make_safe_filename;
///
/// assert_eq!(make_safe_filename("Q3 Report (2024)!.pdf"), "Q3 Report _2024__.pdf");
/// ```
pub fn make_safe_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '.' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Short hex identifier over a timestamp and a discriminator (URL or company name)
pub fn unique_id(discriminator: &str, at: DateTime<Utc>) -> String {
    let nanos = at.timestamp_nanos_opt().unwrap_or_else(|| at.timestamp_micros());
    let mut hasher = Sha256::new();
    hasher.update(format!("{}_{}", nanos, discriminator).as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(ID_LENGTH);
    id
}

/// Builds the on-disk name for a document downloaded from `url`
///
/// Format: `<id>_<safe last path segment>`, with `.pdf` appended when the
/// segment lacks it.
pub fn document_file_name(url: &str, at: DateTime<Utc>) -> String {
    let mut name = last_path_segment(url).unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
    if !name.to_lowercase().ends_with(".pdf") {
        name.push_str(".pdf");
    }
    format!("{}_{}", unique_id(url, at), make_safe_filename(&name))
}

/// Builds the on-disk name for a company's filing report: `<Company_Name>_<id>.pdf`
pub fn report_file_name(company: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}_{}.pdf",
        make_safe_filename(&company.replace(' ', "_")),
        unique_id(company, at)
    )
}

/// Percent-decoded last non-empty path segment of a URL
fn last_path_segment(url: &str) -> Option<String> {
    let path = match ::url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    let segment = path.rsplit('/').find(|s| !s.is_empty())?;
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    if decoded.trim().is_empty() {
        None
    } else {
        Some(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_make_safe_filename_example() {
        assert_eq!(
            make_safe_filename("Q3 Report (2024)!.pdf"),
            "Q3 Report _2024__.pdf"
        );
    }

    #[test]
    fn test_make_safe_filename_idempotent() {
        for name in ["Q3 Report (2024)!.pdf", "a/b\\c:d*e?.pdf", "énergie-2024.pdf", ""] {
            let once = make_safe_filename(name);
            assert_eq!(make_safe_filename(&once), once);
            assert_eq!(once.chars().count(), name.chars().count());
        }
    }

    #[test]
    fn test_document_file_name_uses_last_segment() {
        let name = document_file_name("https://example.com/files/2024.pdf", fixed_time());
        let (id, rest) = name.split_once('_').unwrap();
        assert_eq!(id.len(), 10);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(rest, "2024.pdf");
    }

    #[test]
    fn test_document_file_name_forces_extension() {
        let name = document_file_name("https://example.com/download?id=7", fixed_time());
        assert!(name.ends_with("_download.pdf"));
    }

    #[test]
    fn test_document_file_name_fallback() {
        let name = document_file_name("https://example.com/", fixed_time());
        assert!(name.ends_with("_downloaded.pdf"));
    }

    #[test]
    fn test_document_file_name_decodes_and_sanitizes() {
        let name = document_file_name(
            "https://example.com/files/Annual%20Report%20(2024).PDF",
            fixed_time(),
        );
        assert!(name.ends_with("_Annual Report _2024_.PDF"));
    }

    #[test]
    fn test_same_base_name_different_urls_do_not_collide() {
        let a = document_file_name("https://example.com/2023/report.pdf", fixed_time());
        let b = document_file_name("https://example.com/2024/report.pdf", fixed_time());
        assert_ne!(a, b);
    }

    #[test]
    fn test_unique_id_changes_with_time() {
        let t1 = fixed_time();
        let t2 = t1 + chrono::Duration::nanoseconds(1);
        assert_ne!(unique_id("https://example.com/a.pdf", t1), unique_id("https://example.com/a.pdf", t2));
    }

    #[test]
    fn test_report_file_name() {
        let name = report_file_name("Acme Corp", fixed_time());
        assert!(name.starts_with("Acme_Corp_"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(name.len(), "Acme_Corp_".len() + 10 + ".pdf".len());
    }
}
