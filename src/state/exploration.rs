use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// URLs a single crawl run has already dealt with
///
/// `explored` holds canonical URLs claimed for page visitation, `probed` the
/// URLs already sent a HEAD probe, and `acquired` the documents already handed
/// to the download pipeline. Each claim is a single check-and-insert under the
/// set's lock, so concurrent crawl branches can never both win the same URL.
///
/// A failed or inconclusive probe only claims `probed`; the same URL can still
/// be acquired later if a GET reveals it is a document.
#[derive(Debug, Default)]
pub struct ExplorationState {
    explored: Mutex<HashSet<String>>,
    probed: Mutex<HashSet<String>>,
    acquired: Mutex<HashSet<String>>,
}

impl ExplorationState {
    /// Creates an empty state for a new crawl run
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a URL for page visitation
    ///
    /// # Returns
    ///
    /// * `true` - The caller is the first to claim the URL and must visit it
    /// * `false` - The URL was already claimed; the caller must skip it
    pub fn claim_explored(&self, url: &str) -> bool {
        lock(&self.explored).insert(url.to_string())
    }

    /// Claims a URL for a HEAD probe
    ///
    /// Same semantics as [`claim_explored`](Self::claim_explored), over the
    /// `probed` set.
    pub fn claim_probed(&self, url: &str) -> bool {
        lock(&self.probed).insert(url.to_string())
    }

    /// Claims a document URL for download
    ///
    /// Same semantics as [`claim_explored`](Self::claim_explored), over the
    /// `acquired` set.
    pub fn claim_acquired(&self, url: &str) -> bool {
        lock(&self.acquired).insert(url.to_string())
    }

    /// Returns true if the URL has been claimed for page visitation
    pub fn is_explored(&self, url: &str) -> bool {
        lock(&self.explored).contains(url)
    }

    /// Number of URLs claimed for page visitation
    pub fn explored_count(&self) -> usize {
        lock(&self.explored).len()
    }

    /// Number of URLs sent a HEAD probe
    pub fn probed_count(&self) -> usize {
        lock(&self.probed).len()
    }

    /// Number of documents handed to the download pipeline
    pub fn acquired_count(&self) -> usize {
        lock(&self.acquired).len()
    }
}

/// Locks a set, recovering it if another thread panicked while holding the lock
///
/// Set insertions cannot leave the set half-updated, so a poisoned lock still
/// guards consistent data.
fn lock(set: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_claim_wins() {
        let state = ExplorationState::new();
        assert!(state.claim_explored("https://example.com/a"));
        assert!(!state.claim_explored("https://example.com/a"));
        assert!(state.is_explored("https://example.com/a"));
        assert_eq!(state.explored_count(), 1);
    }

    #[test]
    fn test_sets_are_independent() {
        let state = ExplorationState::new();
        assert!(state.claim_probed("https://example.com/a.pdf"));
        assert!(!state.is_explored("https://example.com/a.pdf"));
        assert!(state.claim_explored("https://example.com/a.pdf"));
        assert!(state.claim_acquired("https://example.com/a.pdf"));
        assert!(!state.claim_acquired("https://example.com/a.pdf"));
        assert_eq!(state.probed_count(), 1);
        assert_eq!(state.acquired_count(), 1);
    }

    #[test]
    fn test_concurrent_claims_single_winner() {
        let state = Arc::new(ExplorationState::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let state = Arc::clone(&state);
                std::thread::spawn(move || {
                    (0..100)
                        .filter(|i| state.claim_explored(&format!("https://example.com/{}", i)))
                        .count()
                })
            })
            .collect();

        let total_wins: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total_wins, 100);
        assert_eq!(state.explored_count(), 100);
    }
}
