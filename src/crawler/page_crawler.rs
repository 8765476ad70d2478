//! Recursive page crawler
//!
//! Explores a page, collects the documents it links to, and descends into the
//! links that match the active section's keywords until the depth bound is hit.
//! Every URL is visited at most once per run: the exploration state is claimed
//! before any request is made, so concurrent branches cannot race each other.

use crate::classify::{classify_link, is_document_candidate, is_document_href, is_excluded};
use crate::config::Config;
use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::{parse_html, Anchor};
use crate::crawler::prober::DocumentProber;
use crate::documents::{DocumentArtifact, DocumentPipeline, TextExtractor};
use crate::output::CrawlStatistics;
use crate::state::ExplorationState;
use crate::url::{canonical_key, resolve_href};
use futures::future::{join_all, BoxFuture};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One explored page and everything found beneath it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNode {
    pub url: String,
    /// Paragraph text of the page; empty for documents
    pub content: String,
    /// Documents acquired from this page, in link order
    pub pdfs: Vec<DocumentArtifact>,
    /// Explored child pages keyed by their link text
    pub links: BTreeMap<String, PageNode>,
}

impl PageNode {
    fn document(url: &str, artifact: Option<DocumentArtifact>) -> Self {
        Self {
            url: url.to_string(),
            content: String::new(),
            pdfs: artifact.into_iter().collect(),
            links: BTreeMap::new(),
        }
    }
}

/// Depth-bounded, keyword-guided crawler for one site
pub struct PageCrawler {
    client: Client,
    base: String,
    state: Arc<ExplorationState>,
    prober: DocumentProber,
    pipeline: DocumentPipeline,
    exclusions: Vec<String>,
    report_keywords: Vec<String>,
    page_timeout: Duration,
    cancel: CancellationToken,
    stats: Arc<CrawlStatistics>,
}

impl PageCrawler {
    /// Creates a crawler for the site rooted at `base`
    ///
    /// Relative hrefs are joined to `base`, not to the page they appear on. The
    /// crawler starts with a fresh exploration state, its own statistics and
    /// a cancellation token that never fires; use the `with_*` methods to share
    /// them.
    pub fn new(client: Client, base: &str, config: &Config) -> Self {
        let crawler_config = &config.crawler;
        let stats = Arc::new(CrawlStatistics::default());

        let prober = DocumentProber::new(
            client.clone(),
            Duration::from_secs(crawler_config.probe_timeout_secs),
            crawler_config.probe_concurrency,
        )
        .with_statistics(Arc::clone(&stats));

        let pipeline = DocumentPipeline::new(
            client.clone(),
            &config.output.documents_dir,
            Duration::from_secs(crawler_config.document_timeout_secs),
        )
        .with_statistics(Arc::clone(&stats));

        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            state: Arc::new(ExplorationState::new()),
            prober,
            pipeline,
            exclusions: config.exclusion_keywords.clone(),
            report_keywords: config.report_keywords(),
            page_timeout: Duration::from_secs(crawler_config.page_timeout_secs),
            cancel: CancellationToken::new(),
            stats,
        }
    }

    /// Shares an exploration state with other crawlers of the same run
    pub fn with_state(mut self, state: Arc<ExplorationState>) -> Self {
        self.state = state;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.prober = self.prober.with_cancellation(cancel.clone());
        self.cancel = cancel;
        self
    }

    pub fn with_statistics(mut self, stats: Arc<CrawlStatistics>) -> Self {
        self.prober = self.prober.with_statistics(Arc::clone(&stats));
        self.pipeline = self.pipeline.with_statistics(Arc::clone(&stats));
        self.stats = stats;
        self
    }

    /// Replaces the document text extractor
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.pipeline = self.pipeline.with_extractor(extractor);
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    pub fn page_timeout(&self) -> Duration {
        self.page_timeout
    }

    pub fn state(&self) -> &Arc<ExplorationState> {
        &self.state
    }

    pub fn statistics(&self) -> &Arc<CrawlStatistics> {
        &self.stats
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Crawls `url` and, while `depth < max_depth`, its keyword-matching links
    ///
    /// # Returns
    ///
    /// * `Some(PageNode)` - The page was claimed and fetched
    /// * `None` - Depth exceeded, already explored, fetch failed, or cancelled
    ///
    /// Failures never propagate: a failing page only removes its own subtree.
    pub fn crawl<'a>(
        &'a self,
        url: &'a str,
        keywords: &'a [String],
        depth: u32,
        max_depth: u32,
    ) -> BoxFuture<'a, Option<PageNode>> {
        Box::pin(async move {
            if depth > max_depth {
                return None;
            }
            if self.cancel.is_cancelled() {
                tracing::debug!("Not exploring {}: run cancelled", url);
                return None;
            }

            let key = canonical_key(url)?;
            if !self.state.claim_explored(&key) {
                return None;
            }
            tracing::info!("Exploring: {} (depth {}/{})", url, depth, max_depth);

            if is_document_href(url) {
                let artifact = self.acquire_claimed(url).await;
                return Some(PageNode::document(url, artifact));
            }

            let fetched = fetch_url(&self.client, url, self.page_timeout).await;
            let is_document = fetched.is_document();
            let body = match fetched {
                FetchResult::Success { body, .. } => body,
                FetchResult::HttpError { status_code } => {
                    tracing::warn!("Error fetching {}: HTTP {}", url, status_code);
                    self.stats.record_page_failed();
                    return None;
                }
                FetchResult::NetworkError { error, .. } => {
                    tracing::warn!("Error fetching {}: {}", url, error);
                    self.stats.record_page_failed();
                    return None;
                }
            };
            self.stats.record_page_visited();

            if is_document {
                let artifact = if self.state.claim_acquired(&key) {
                    self.pipeline.store(url, &body).await
                } else {
                    tracing::debug!("Document {} already acquired elsewhere", url);
                    None
                };
                return Some(PageNode::document(url, artifact));
            }

            let parsed = parse_html(&String::from_utf8_lossy(&body));
            let documents = self.discover_documents(&parsed.anchors).await;
            let pdfs = self.acquire_all(&documents).await;

            let links = if depth < max_depth {
                self.crawl_children(&parsed.anchors, &documents, keywords, depth, max_depth)
                    .await
            } else {
                BTreeMap::new()
            };

            Some(PageNode {
                url: url.to_string(),
                content: parsed.content,
                pdfs,
                links,
            })
        })
    }

    /// Finds the documents a page links to, in anchor order
    ///
    /// Anchors that are excluded are ignored. `.pdf` hrefs count directly;
    /// anchors whose text hints at a document are confirmed with a HEAD probe,
    /// sent only by the first page to claim the URL in the probed set.
    async fn discover_documents(&self, anchors: &[Anchor]) -> Vec<String> {
        let mut found: Vec<(String, bool)> = Vec::new();

        for anchor in anchors {
            let Some(url) = resolve_href(&anchor.href, &self.base) else {
                continue;
            };
            if is_excluded(&anchor.text, &url, &self.exclusions) {
                continue;
            }
            if found.iter().any(|(seen, _)| *seen == url) {
                continue;
            }

            if is_document_href(&anchor.href) {
                found.push((url, true));
            } else if is_document_candidate(&anchor.text, &self.report_keywords)
                && canonical_key(&url).is_some_and(|key| self.state.claim_probed(&key))
            {
                found.push((url, false));
            }
        }

        let candidates: Vec<String> = found
            .iter()
            .filter(|(_, direct)| !direct)
            .map(|(url, _)| url.clone())
            .collect();
        let confirmed: HashSet<String> = self.prober.confirm(candidates).await.into_iter().collect();

        found
            .into_iter()
            .filter(|(url, direct)| *direct || confirmed.contains(url))
            .map(|(url, _)| url)
            .collect()
    }

    /// Acquires the documents no other page has claimed yet, concurrently
    async fn acquire_all(&self, documents: &[String]) -> Vec<DocumentArtifact> {
        if self.cancel.is_cancelled() {
            return Vec::new();
        }

        let unclaimed: Vec<&String> = documents
            .iter()
            .filter(|url| canonical_key(url).is_some_and(|key| self.state.claim_acquired(&key)))
            .collect();

        join_all(unclaimed.into_iter().map(|url| self.pipeline.acquire(url)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Acquires a crawled document URL, unless another page already claimed it
    async fn acquire_claimed(&self, url: &str) -> Option<DocumentArtifact> {
        let key = canonical_key(url)?;
        if !self.state.claim_acquired(&key) {
            tracing::debug!("Document {} already acquired elsewhere", url);
            return None;
        }
        self.pipeline.acquire(url).await
    }

    async fn crawl_children(
        &self,
        anchors: &[Anchor],
        documents: &[String],
        keywords: &[String],
        depth: u32,
        max_depth: u32,
    ) -> BTreeMap<String, PageNode> {
        let mut children: Vec<(String, String)> = Vec::new();

        for anchor in anchors {
            if is_document_href(&anchor.href) {
                continue;
            }

            let classification =
                classify_link(&anchor.text, &anchor.href, &self.base, keywords, &self.exclusions);
            if !classification.class.should_follow() {
                continue;
            }
            let Some(url) = classification.url else {
                continue;
            };
            if documents.contains(&url) {
                continue;
            }
            if canonical_key(&url).is_some_and(|key| self.state.is_explored(&key)) {
                continue;
            }

            children.push((anchor.text.clone(), url));
        }

        let nodes = join_all(
            children
                .iter()
                .map(|(_, url)| self.crawl(url, keywords, depth + 1, max_depth)),
        )
        .await;

        let mut links = BTreeMap::new();
        for ((text, _), node) in children.into_iter().zip(nodes) {
            if let Some(node) = node {
                links.entry(text).or_insert(node);
            }
        }
        links
    }
}
