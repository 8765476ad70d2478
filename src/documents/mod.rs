//! Document acquisition
//!
//! This module handles:
//! - Downloading confirmed documents and storing them under collision-free names
//! - Extracting their text page by page
//! - Searching extracted text for keywords

mod extract;
mod filename;
mod keywords;
mod pipeline;

pub use extract::{ExtractionError, PdfTextExtractor, TextExtractor};
pub use filename::{
    document_file_name, make_safe_filename, report_file_name, unique_id, FALLBACK_FILE_NAME,
};
pub use keywords::{find_keyword_lines, KeywordHits, FILING_KEYWORDS};
pub use pipeline::DocumentPipeline;

use serde::{Deserialize, Serialize};

/// A downloaded document, where it was stored, and its extracted text
///
/// Only built after the file was written, so every artifact in a result tree
/// points at a file that exists. `content` is empty when extraction failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentArtifact {
    pub url: String,
    pub file_path: String,
    pub content: String,
}
