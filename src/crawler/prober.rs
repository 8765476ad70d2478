//! Document prober
//!
//! Confirms whether ambiguous links point at documents by sending HEAD requests
//! and inspecting the declared Content-Type. Probes share one semaphore, so no
//! more than `width` are ever in flight for a crawl, however many pages ask.

use crate::crawler::fetcher::{probe_content_type, DOCUMENT_MEDIA_TYPE};
use crate::output::CrawlStatistics;
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Bounded pool of HEAD probes
#[derive(Clone)]
pub struct DocumentProber {
    client: Client,
    timeout: Duration,
    semaphore: Arc<Semaphore>,
    width: usize,
    cancel: CancellationToken,
    stats: Arc<CrawlStatistics>,
}

impl DocumentProber {
    /// Creates a prober allowing at most `width` concurrent probes
    ///
    /// A width of zero is raised to one.
    pub fn new(client: Client, timeout: Duration, width: usize) -> Self {
        let width = width.max(1);
        Self {
            client,
            timeout,
            semaphore: Arc::new(Semaphore::new(width)),
            width,
            cancel: CancellationToken::new(),
            stats: Arc::new(CrawlStatistics::default()),
        }
    }

    /// Stops issuing probes once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Records probes in the given statistics
    pub fn with_statistics(mut self, stats: Arc<CrawlStatistics>) -> Self {
        self.stats = stats;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Probes every candidate and returns the confirmed documents, in input order
    ///
    /// Callers are expected to have claimed each URL in the exploration state's
    /// probed set first, so a URL is probed at most once per crawl.
    pub async fn confirm(&self, candidates: Vec<String>) -> Vec<String> {
        let probes = candidates.into_iter().map(|url| async move {
            let confirmed = self.probe(&url).await;
            confirmed.then_some(url)
        });

        join_all(probes).await.into_iter().flatten().collect()
    }

    /// Probes a single URL; any failure counts as "not a document"
    pub async fn probe(&self, url: &str) -> bool {
        let Ok(_permit) = self.semaphore.acquire().await else {
            return false;
        };

        if self.cancel.is_cancelled() {
            tracing::debug!("Skipping probe of {}: run cancelled", url);
            return false;
        }

        let confirmed = match probe_content_type(&self.client, url, self.timeout).await {
            Ok(content_type) => content_type.contains(DOCUMENT_MEDIA_TYPE),
            Err(e) => {
                tracing::debug!("Error checking {}: {}", url, e);
                false
            }
        };

        self.stats.record_probe(confirmed);
        if confirmed {
            tracing::debug!("Confirmed document: {}", url);
        }
        confirmed
    }
}
