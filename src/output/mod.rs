//! Output module for run artifacts
//!
//! This module handles:
//! - Writing and reading the per-workflow JSON artifacts
//! - Resetting the output directories before a run
//! - Merging every artifact of a run into `combined_results.json`
//! - Recording crawl statistics

mod aggregate;
mod artifacts;
pub mod stats;

pub use aggregate::{artifact_files, combine, combine_directory, write_combined, AggregatedResult};
pub use artifacts::{
    artifact_file_name, read_artifact, reset_directory, write_artifact, COMBINED_FILE_NAME,
    FILING_ARTIFACT_SUFFIX, WEBSITE_ARTIFACT_SUFFIX,
};
pub use stats::{log_statistics, CrawlStatistics, StatisticsSnapshot};
