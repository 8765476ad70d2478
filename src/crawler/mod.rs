//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with per-request timeouts
//! - HTML parsing and anchor extraction
//! - Bounded HEAD probing of document candidates
//! - Recursive, depth-bounded page exploration
//! - Per-section orchestration from the site's root page

mod fetcher;
mod orchestrator;
mod page_crawler;
mod parser;
mod prober;

pub use fetcher::{
    build_http_client, fetch_document, fetch_url, probe_content_type, FetchResult,
    DOCUMENT_MEDIA_TYPE,
};
pub use orchestrator::{SectionOrchestrator, SectionResults};
pub use page_crawler::{PageCrawler, PageNode};
pub use parser::{parse_html, Anchor, ParsedPage};
pub use prober::DocumentProber;

use crate::config::Config;
use crate::documents::TextExtractor;
use crate::output::CrawlStatistics;
use crate::state::ExplorationState;
use crate::ScraperError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Crawls every configured section of a website
///
/// This is the main entry point for a website crawl. It will:
/// 1. Build the HTTP client
/// 2. Create one exploration state for the whole run
/// 3. Fetch the root page and crawl each section's entry links
///
/// # Arguments
///
/// * `base_url` - The site's root URL
/// * `config` - The scraper configuration
/// * `cancel` - Stops the crawl between requests when fired
/// * `extractor` - Text extractor for downloaded documents, poppler when `None`
///
/// # Returns
///
/// * `Ok((SectionResults, Arc<CrawlStatistics>))` - The section tree and run counters
/// * `Err(ScraperError)` - The HTTP client could not be built
pub async fn crawl_website(
    base_url: &str,
    config: &Config,
    cancel: CancellationToken,
    extractor: Option<Arc<dyn TextExtractor>>,
) -> Result<(SectionResults, Arc<CrawlStatistics>), ScraperError> {
    let client = build_http_client(&config.crawler)?;
    let stats = Arc::new(CrawlStatistics::default());

    let mut crawler = PageCrawler::new(client, base_url, config)
        .with_state(Arc::new(ExplorationState::new()))
        .with_statistics(Arc::clone(&stats))
        .with_cancellation(cancel);
    if let Some(extractor) = extractor {
        crawler = crawler.with_extractor(extractor);
    }

    let orchestrator = SectionOrchestrator::new(crawler, config.sections.clone());
    let results = orchestrator.run(base_url).await;

    tracing::info!(
        "Explored {} URLs, evaluated {} document links",
        orchestrator.crawler().state().explored_count(),
        orchestrator.crawler().state().probed_count()
    );

    Ok((results, stats))
}
