//! Sustain-Scraper main entry point
//!
//! This is the command-line interface for the Sustain-Scraper company crawler.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use sustain_scraper::config::{load_config_with_hash, Config};
use sustain_scraper::output::write_combined;
use sustain_scraper::url::canonicalize_url;
use sustain_scraper::workflow::{run_workflows, Workflow};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sustain-Scraper: a keyword-guided company website crawler
///
/// Crawls a company's website section by section, downloads and text-mines the
/// PDF documents it links to, optionally mines an annual filing report, and
/// merges everything into one combined JSON record.
#[derive(Parser, Debug)]
#[command(name = "sustain-scraper")]
#[command(version = "1.0.0")]
#[command(about = "A keyword-guided company website crawler", long_about = None)]
struct Cli {
    /// Company name, used for artifact file names and as the filing result key
    #[arg(value_name = "COMPANY")]
    company: String,

    /// Root URL of the company's website
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Workflows to run (repeatable)
    #[arg(long = "workflow", value_enum, default_values_t = [WorkflowKind::Website])]
    workflows: Vec<WorkflowKind>,

    /// Annual report PDF produced by the filing portal download
    #[arg(long, value_name = "PATH")]
    filing_report: Option<PathBuf>,

    /// Validate config and show what would be run without running it
    #[arg(long, conflicts_with = "combine_only")]
    dry_run: bool,

    /// Only merge the artifacts already in the results directory
    #[arg(long, conflicts_with = "dry_run")]
    combine_only: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WorkflowKind {
    Website,
    Filing,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    if cli.combine_only {
        let path = write_combined(Path::new(&config.output.results_dir))
            .await
            .context("Failed to combine results")?;
        println!("✓ Combined results written to: {}", path.display());
        return Ok(());
    }

    let workflows = resolve_workflows(&cli)?;
    let base_url = match &cli.url {
        Some(url) => canonicalize_url(url)
            .with_context(|| format!("Invalid website URL: {}", url))?
            .to_string(),
        None if workflows.contains(&Workflow::Website) => {
            bail!("--url is required for the website workflow")
        }
        None => String::new(),
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli.company, &base_url, &workflows);
        return Ok(());
    }

    handle_run(config, &cli.company, &base_url, workflows).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sustain_scraper=info,warn"),
            1 => EnvFilter::new("sustain_scraper=debug,info"),
            2 => EnvFilter::new("sustain_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using built-in defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

fn resolve_workflows(cli: &Cli) -> anyhow::Result<Vec<Workflow>> {
    let mut workflows = Vec::new();
    for kind in &cli.workflows {
        let workflow = match kind {
            WorkflowKind::Website => Workflow::Website,
            WorkflowKind::Filing => match &cli.filing_report {
                Some(report_path) => Workflow::Filing {
                    report_path: report_path.clone(),
                },
                None => bail!("--filing-report is required for the filing workflow"),
            },
        };
        if !workflows.contains(&workflow) {
            workflows.push(workflow);
        }
    }
    Ok(workflows)
}

/// Handles the --dry-run mode: shows the resolved configuration and planned workflows
fn handle_dry_run(config: &Config, company: &str, base_url: &str, workflows: &[Workflow]) {
    println!("=== Sustain-Scraper Dry Run ===\n");

    println!("Company: {}", company);
    if !base_url.is_empty() {
        println!("Website: {}", base_url);
    }

    println!("\nCrawler Configuration:");
    println!("  User agent: {}", config.crawler.user_agent);
    println!("  Page timeout: {}s", config.crawler.page_timeout_secs);
    println!("  Probe timeout: {}s", config.crawler.probe_timeout_secs);
    println!("  Document timeout: {}s", config.crawler.document_timeout_secs);
    println!("  Probe concurrency: {}", config.crawler.probe_concurrency);

    println!("\nOutput:");
    println!("  Documents: {}", config.output.documents_dir);
    println!("  Results: {}", config.output.results_dir);
    println!("  Clear on start: {}", config.output.clear_on_start);

    println!("\nSections ({}):", config.sections.len());
    for section in &config.sections {
        println!(
            "  - {} (max depth {}{})",
            section.name,
            section.max_depth,
            if section.include_navigation {
                ", with navigation"
            } else {
                ""
            }
        );
        println!("    keywords: {}", section.keywords.join(", "));
    }

    println!(
        "\nExclusion keywords ({}): {}",
        config.exclusion_keywords.len(),
        config.exclusion_keywords.join(", ")
    );

    println!("\n✓ Configuration is valid");
    println!("✓ Would run {} workflow(s):", workflows.len());
    for workflow in workflows {
        println!("  - {}", workflow);
    }
}

/// Handles the main run: executes the workflows until done or interrupted
async fn handle_run(
    config: Config,
    company: &str,
    base_url: &str,
    workflows: Vec<Workflow>,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight requests");
            interrupt.cancel();
        }
    });

    match run_workflows(company, base_url, workflows, config, cancel).await {
        Ok(path) => {
            tracing::info!("All workflows completed");
            println!("✓ Combined results written to: {}", path.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
