//! State module for tracking crawl progress
//!
//! A crawl run owns exactly one `ExplorationState`, shared by reference with
//! every component that fetches or probes URLs. It is never persisted.

mod exploration;

pub use exploration::ExplorationState;
