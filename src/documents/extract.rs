//! Text extraction from downloaded documents using the poppler tools.

use std::path::Path;
use std::process::{Command, Output};
use thiserror::Error;

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Could not determine page count of {0}")]
    UnknownPageCount(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of document text
///
/// Implementations are synchronous; the pipeline runs them on the blocking pool.
pub trait TextExtractor: Send + Sync {
    /// Extracts the text of every page, joined with newlines
    fn extract(&self, file_path: &Path) -> Result<String, ExtractionError>;
}

/// Extracts PDF text page by page with `pdfinfo` and `pdftotext`
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Get the page count of a PDF.
    pub fn page_count(&self, file_path: &Path) -> Result<u32, ExtractionError> {
        let output = run_tool(
            Command::new("pdfinfo").arg(file_path).output(),
            "pdfinfo (install poppler-utils)",
            "pdfinfo failed",
        )?;

        output
            .lines()
            .find_map(|line| line.strip_prefix("Pages:"))
            .and_then(|count| count.trim().parse().ok())
            .ok_or_else(|| ExtractionError::UnknownPageCount(file_path.display().to_string()))
    }

    /// Run pdftotext on a single page of a PDF file.
    pub fn page_text(&self, file_path: &Path, page: u32) -> Result<String, ExtractionError> {
        let page_str = page.to_string();
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
            .arg(file_path)
            .arg("-") // Output to stdout
            .output();

        let text = run_tool(
            output,
            "pdftotext (install poppler-utils)",
            &format!("pdftotext failed on page {}", page),
        )?;

        // pdftotext terminates every page with a form feed
        Ok(text.trim_end_matches('\u{c}').to_string())
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, file_path: &Path) -> Result<String, ExtractionError> {
        let pages = self.page_count(file_path)?;
        let mut texts = Vec::with_capacity(pages as usize);
        for page in 1..=pages {
            texts.push(self.page_text(file_path, page)?);
        }
        Ok(texts.join("\n"))
    }
}

/// Handle command output, extracting stdout on success or returning appropriate error.
fn run_tool(
    result: std::io::Result<Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, ExtractionError> {
    match result {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => Err(ExtractionError::ExtractionFailed(format!(
            "{}: {}",
            error_prefix,
            String::from_utf8_lossy(&output.stderr).trim()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}
