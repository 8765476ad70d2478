//! Sustain-Scraper: a keyword-guided company website crawler
//!
//! This crate crawls a company's website section by section, following only links
//! whose text matches a section's keywords, downloads the PDF documents it finds,
//! extracts their text, and merges the website results with the output of other
//! workflows (such as a regulatory filing report) into one combined JSON record.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod documents;
pub mod output;
pub mod state;
pub mod url;
pub mod workflow;

use thiserror::Error;

/// Main error type for Sustain-Scraper operations
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Text extraction error: {0}")]
    Extraction(#[from] documents::ExtractionError),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("Workflow '{workflow}' failed: {message}")]
    Workflow { workflow: String, message: String },

    #[error("Run was cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sustain-Scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use classify::{classify_link, LinkClass, LinkClassification};
pub use config::{Config, Section};
pub use crawler::{PageCrawler, PageNode, SectionOrchestrator, SectionResults};
pub use documents::{DocumentArtifact, DocumentPipeline};
pub use output::{combine, combine_directory, AggregatedResult};
pub use state::ExplorationState;
pub use url::{canonicalize_url, resolve_href};
pub use workflow::{run_workflows, Workflow, WorkflowRunner};
