//! Workflow runner
//!
//! A run executes one or more independent workflows for a company in parallel,
//! each producing a single JSON artifact in the results directory, then merges
//! every artifact into `combined_results.json`. A failing workflow is logged
//! and does not stop the others or the merge.

use crate::config::Config;
use crate::crawler::crawl_website;
use crate::documents::{
    find_keyword_lines, report_file_name, PdfTextExtractor, TextExtractor, FILING_KEYWORDS,
};
use crate::output::{
    artifact_file_name, log_statistics, reset_directory, write_artifact, write_combined,
    FILING_ARTIFACT_SUFFIX, WEBSITE_ARTIFACT_SUFFIX,
};
use crate::ScraperError;
use chrono::Utc;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// An independent data source for a company
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Workflow {
    /// Crawl the company's website section by section
    Website,
    /// Mine an annual report downloaded from a regulatory filing portal
    Filing { report_path: PathBuf },
}

impl Workflow {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Filing { .. } => "filing",
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Website => write!(f, "website"),
            Self::Filing { report_path } => write!(f, "filing ({})", report_path.display()),
        }
    }
}

/// Runs workflows for one company against one configuration
#[derive(Clone)]
pub struct WorkflowRunner {
    company: String,
    base_url: String,
    config: Arc<Config>,
    cancel: CancellationToken,
    extractor: Arc<dyn TextExtractor>,
}

impl WorkflowRunner {
    pub fn new(company: &str, base_url: &str, config: Config) -> Self {
        Self {
            company: company.trim().to_string(),
            base_url: base_url.to_string(),
            config: Arc::new(config),
            cancel: CancellationToken::new(),
            extractor: Arc::new(PdfTextExtractor::new()),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Replaces the document text extractor used by every workflow
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    fn results_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.output.results_dir)
    }

    fn documents_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.output.documents_dir)
    }

    /// Runs the workflows in parallel, then writes the combined artifact
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of `combined_results.json`
    /// * `Err(ScraperError)` - The output directories could not be prepared or
    ///   the combined artifact could not be written
    pub async fn run(&self, workflows: Vec<Workflow>) -> Result<PathBuf, ScraperError> {
        if self.config.output.clear_on_start {
            reset_directory(&self.documents_dir()).await?;
            reset_directory(&self.results_dir()).await?;
            tracing::info!("Cleared output directories");
        } else {
            tokio::fs::create_dir_all(self.results_dir()).await?;
        }

        let mut tasks = JoinSet::new();
        for workflow in workflows {
            tracing::info!("Running {} workflow for {}", workflow, self.company);
            let runner = self.clone();
            tasks.spawn(async move {
                let name = workflow.name();
                (name, runner.run_one(&workflow).await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(path))) => {
                    tracing::info!("Workflow '{}' wrote {}", name, path.display());
                }
                Ok((name, Err(e))) => {
                    tracing::error!("Workflow '{}' failed: {}", name, e);
                }
                Err(e) => {
                    tracing::error!("Workflow task failed: {}", e);
                }
            }
        }

        write_combined(&self.results_dir()).await
    }

    /// Runs a single workflow and returns the path of its artifact
    pub async fn run_one(&self, workflow: &Workflow) -> Result<PathBuf, ScraperError> {
        if self.cancel.is_cancelled() {
            return Err(ScraperError::Cancelled);
        }

        match workflow {
            Workflow::Website => self.run_website().await,
            Workflow::Filing { report_path } => self.run_filing(report_path).await,
        }
    }

    async fn run_website(&self) -> Result<PathBuf, ScraperError> {
        let (results, stats) = crawl_website(
            &self.base_url,
            &self.config,
            self.cancel.clone(),
            Some(Arc::clone(&self.extractor)),
        )
        .await?;

        log_statistics("Website crawl", &stats.snapshot());

        let name = artifact_file_name(&self.company, WEBSITE_ARTIFACT_SUFFIX);
        write_artifact(&self.results_dir(), &name, &results).await
    }

    async fn run_filing(&self, report_path: &Path) -> Result<PathBuf, ScraperError> {
        let documents_dir = self.documents_dir();
        tokio::fs::create_dir_all(&documents_dir).await?;

        let stored = documents_dir.join(report_file_name(&self.company, Utc::now()));
        move_file(report_path, &stored).await?;
        tracing::info!("Stored filing report at {}", stored.display());

        let extractor = Arc::clone(&self.extractor);
        let path = stored.clone();
        let text = tokio::task::spawn_blocking(move || extractor.extract(&path))
            .await
            .map_err(|e| ScraperError::Workflow {
                workflow: "filing".to_string(),
                message: e.to_string(),
            })??;

        let hits = find_keyword_lines(&text, FILING_KEYWORDS);
        tracing::info!(
            "Filing report matched {} of {} keywords",
            hits.len(),
            FILING_KEYWORDS.len()
        );

        let mut artifact = BTreeMap::new();
        artifact.insert(self.company.clone(), hits);

        let name = artifact_file_name(&self.company, FILING_ARTIFACT_SUFFIX);
        write_artifact(&self.results_dir(), &name, &artifact).await
    }
}

/// Runs the given workflows for a company with the default text extractor
pub async fn run_workflows(
    company: &str,
    base_url: &str,
    workflows: Vec<Workflow>,
    config: Config,
    cancel: CancellationToken,
) -> Result<PathBuf, ScraperError> {
    WorkflowRunner::new(company, base_url, config)
        .with_cancellation(cancel)
        .run(workflows)
        .await
}

/// Moves a file, copying across filesystems when a rename is not possible
async fn move_file(from: &Path, to: &Path) -> Result<(), ScraperError> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    tokio::fs::copy(from, to).await?;
    tokio::fs::remove_file(from).await?;
    Ok(())
}
