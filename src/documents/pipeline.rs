use crate::crawler::fetch_document;
use crate::documents::extract::{PdfTextExtractor, TextExtractor};
use crate::documents::filename::document_file_name;
use crate::documents::DocumentArtifact;
use crate::output::CrawlStatistics;
use chrono::Utc;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Downloads, stores and text-mines documents
///
/// Every failure is logged and turned into `None` (download, storage) or an
/// empty `content` (extraction); nothing propagates to the caller.
#[derive(Clone)]
pub struct DocumentPipeline {
    client: Client,
    documents_dir: PathBuf,
    timeout: Duration,
    extractor: Arc<dyn TextExtractor>,
    stats: Arc<CrawlStatistics>,
}

impl DocumentPipeline {
    /// Creates a pipeline writing into `documents_dir`, extracting text with poppler
    pub fn new(client: Client, documents_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            client,
            documents_dir: documents_dir.into(),
            timeout,
            extractor: Arc::new(PdfTextExtractor::new()),
            stats: Arc::new(CrawlStatistics::default()),
        }
    }

    /// Replaces the text extractor
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Records acquisitions in the given statistics
    pub fn with_statistics(mut self, stats: Arc<CrawlStatistics>) -> Self {
        self.stats = stats;
        self
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    /// Downloads the document at `url` and stores it
    ///
    /// # Returns
    ///
    /// * `Some(DocumentArtifact)` - The document was downloaded and written to disk
    /// * `None` - Download or storage failed (logged)
    pub async fn acquire(&self, url: &str) -> Option<DocumentArtifact> {
        tracing::info!("Processing PDF: {}", url);

        match fetch_document(&self.client, url, self.timeout).await {
            Ok(bytes) => self.store(url, &bytes).await,
            Err(e) => {
                tracing::warn!("Error downloading PDF from {}: {}", url, e);
                self.stats.record_document_failed();
                None
            }
        }
    }

    /// Stores already-downloaded document bytes and extracts their text
    ///
    /// The file is named `<id>_<safe name>.pdf`, where the id hashes the current
    /// time and `url`, so documents sharing a base name never overwrite each other.
    pub async fn store(&self, url: &str, bytes: &[u8]) -> Option<DocumentArtifact> {
        let file_name = document_file_name(url, Utc::now());
        let path = self.documents_dir.join(file_name);

        if let Err(e) = write_file(&path, bytes).await {
            tracing::warn!("Error saving PDF from {} to {}: {}", url, path.display(), e);
            self.stats.record_document_failed();
            return None;
        }

        let content = self.extract_text(&path).await;
        self.stats.record_document_acquired();

        Some(DocumentArtifact {
            url: url.to_string(),
            file_path: path.display().to_string(),
            content,
        })
    }

    /// Extracts a stored document's text, returning an empty string on failure
    pub async fn extract_text(&self, path: &Path) -> String {
        let extractor = Arc::clone(&self.extractor);
        let owned = path.to_path_buf();

        match tokio::task::spawn_blocking(move || extractor.extract(&owned)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!("Error extracting text from {}: {}", path.display(), e);
                String::new()
            }
            Err(e) => {
                tracing::warn!("Text extraction task for {} failed: {}", path.display(), e);
                String::new()
            }
        }
    }
}

/// Writes a file, creating its parent directory on demand
async fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}
