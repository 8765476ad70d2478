//! Section orchestration
//!
//! Drives the page crawler once per configured section, starting from the
//! entry links the root page offers for that section's keywords.

use crate::classify::classify_link;
use crate::config::Section;
use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::page_crawler::{PageCrawler, PageNode};
use crate::crawler::parser::{parse_html, Anchor, ParsedPage};
use std::collections::BTreeMap;

/// Section name → entry link text → crawled subtree
pub type SectionResults = BTreeMap<String, BTreeMap<String, PageNode>>;

/// Crawls every section of one site with a shared exploration state
pub struct SectionOrchestrator {
    crawler: PageCrawler,
    sections: Vec<Section>,
}

impl SectionOrchestrator {
    pub fn new(crawler: PageCrawler, sections: Vec<Section>) -> Self {
        Self { crawler, sections }
    }

    pub fn crawler(&self) -> &PageCrawler {
        &self.crawler
    }

    /// Crawls all sections, in configuration order, from the root page
    ///
    /// The root is fetched once and is not itself recorded as explored. Entry
    /// links of a section are crawled one after another at depth 0; a URL
    /// claimed by an earlier section or entry is not visited again, so the
    /// result depends on section order. Sections that produced no page are
    /// absent from the result.
    pub async fn run(&self, root: &str) -> SectionResults {
        let mut results = SectionResults::new();

        let Some(root_page) = self.fetch_root(root).await else {
            return results;
        };

        for section in &self.sections {
            if self.crawler.cancellation().is_cancelled() {
                tracing::warn!("Run cancelled, skipping remaining sections");
                break;
            }

            tracing::info!("Scraping section: {}", section.name);
            let entries = self.entry_links(&root_page, section);
            tracing::debug!(
                "Section '{}' has {} entry links",
                section.name,
                entries.len()
            );

            for (name, url) in entries {
                if self.crawler.cancellation().is_cancelled() {
                    break;
                }

                let node = self
                    .crawler
                    .crawl(&url, &section.keywords, 0, section.max_depth)
                    .await;
                if let Some(node) = node {
                    results
                        .entry(section.name.clone())
                        .or_default()
                        .insert(name, node);
                }
            }
        }

        results
    }

    async fn fetch_root(&self, root: &str) -> Option<ParsedPage> {
        match fetch_url(self.crawler.client(), root, self.crawler.page_timeout()).await {
            FetchResult::Success { body, .. } => Some(parse_html(&String::from_utf8_lossy(&body))),
            FetchResult::HttpError { status_code } => {
                tracing::error!("Error fetching root page {}: HTTP {}", root, status_code);
                None
            }
            FetchResult::NetworkError { error, .. } => {
                tracing::error!("Error fetching root page {}: {}", root, error);
                None
            }
        }
    }

    /// Collects a section's entry links from the root page
    ///
    /// Body anchors are keyed by lower-cased text; with `include_navigation`,
    /// matching `<nav>` anchors are added under their original text. A repeated
    /// key keeps its first position and takes the last URL.
    fn entry_links(&self, root_page: &ParsedPage, section: &Section) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = Vec::new();

        for anchor in &root_page.anchors {
            if let Some(url) = self.relevant_url(anchor, section) {
                upsert(&mut entries, anchor.text.to_lowercase(), url);
            }
        }

        if section.include_navigation {
            for anchor in &root_page.nav_anchors {
                if let Some(url) = self.relevant_url(anchor, section) {
                    upsert(&mut entries, anchor.text.clone(), url);
                }
            }
        }

        entries
    }

    fn relevant_url(&self, anchor: &Anchor, section: &Section) -> Option<String> {
        let classification = classify_link(
            &anchor.text,
            &anchor.href,
            self.crawler.base(),
            &section.keywords,
            self.crawler.exclusions(),
        );
        if classification.class.should_follow() {
            classification.url
        } else {
            None
        }
    }
}

fn upsert(entries: &mut Vec<(String, String)>, key: String, url: String) {
    match entries.iter_mut().find(|(existing, _)| *existing == key) {
        Some(entry) => entry.1 = url,
        None => entries.push((key, url)),
    }
}
