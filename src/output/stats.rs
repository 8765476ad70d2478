//! Crawl statistics
//!
//! Counters shared by every component of a website crawl. They are updated with
//! relaxed atomics and read once, when the crawl finishes.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for one crawl run
#[derive(Debug, Default)]
pub struct CrawlStatistics {
    pages_visited: AtomicU64,
    pages_failed: AtomicU64,
    probes_sent: AtomicU64,
    probes_confirmed: AtomicU64,
    documents_acquired: AtomicU64,
    documents_failed: AtomicU64,
}

/// Point-in-time copy of [`CrawlStatistics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    pub pages_visited: u64,
    pub pages_failed: u64,
    pub probes_sent: u64,
    pub probes_confirmed: u64,
    pub documents_acquired: u64,
    pub documents_failed: u64,
}

impl CrawlStatistics {
    pub fn record_page_visited(&self) {
        self.pages_visited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page_failed(&self) {
        self.pages_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_probe(&self, confirmed: bool) {
        self.probes_sent.fetch_add(1, Ordering::Relaxed);
        if confirmed {
            self.probes_confirmed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_document_acquired(&self) {
        self.documents_acquired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_document_failed(&self) {
        self.documents_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            pages_visited: self.pages_visited.load(Ordering::Relaxed),
            pages_failed: self.pages_failed.load(Ordering::Relaxed),
            probes_sent: self.probes_sent.load(Ordering::Relaxed),
            probes_confirmed: self.probes_confirmed.load(Ordering::Relaxed),
            documents_acquired: self.documents_acquired.load(Ordering::Relaxed),
            documents_failed: self.documents_failed.load(Ordering::Relaxed),
        }
    }
}

/// Logs a statistics snapshot at info level
pub fn log_statistics(label: &str, stats: &StatisticsSnapshot) {
    tracing::info!(
        "{}: {} pages visited, {} failed; {} probes ({} confirmed); {} documents acquired, {} failed",
        label,
        stats.pages_visited,
        stats.pages_failed,
        stats.probes_sent,
        stats.probes_confirmed,
        stats.documents_acquired,
        stats.documents_failed
    );
}
