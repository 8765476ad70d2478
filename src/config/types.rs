use serde::Deserialize;

/// Main configuration structure for Sustain-Scraper
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Keywords that disqualify a link when found in its text or URL
    #[serde(default = "default_exclusion_keywords")]
    pub exclusion_keywords: Vec<String>,

    /// Sections crawled in order
    #[serde(rename = "section", default = "default_sections")]
    pub sections: Vec<Section>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            output: OutputConfig::default(),
            exclusion_keywords: default_exclusion_keywords(),
            sections: default_sections(),
        }
    }
}

impl Config {
    /// Keywords of the `reports` section, used to spot document-like links
    pub fn report_keywords(&self) -> Vec<String> {
        self.sections
            .iter()
            .find(|s| s.name == "reports")
            .map(|s| s.keywords.clone())
            .unwrap_or_default()
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for page fetches (seconds)
    #[serde(default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    /// Timeout for document HEAD probes (seconds)
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Timeout for document downloads (seconds)
    #[serde(default = "default_document_timeout")]
    pub document_timeout_secs: u64,

    /// Maximum number of document probes in flight
    #[serde(default = "default_probe_concurrency")]
    pub probe_concurrency: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            page_timeout_secs: default_page_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            document_timeout_secs: default_document_timeout(),
            probe_concurrency: default_probe_concurrency(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory downloaded documents are written to
    #[serde(default = "default_documents_dir")]
    pub documents_dir: String,

    /// Directory JSON artifacts are written to
    #[serde(default = "default_results_dir")]
    pub results_dir: String,

    /// Remove and recreate both directories before a run
    #[serde(default = "default_clear_on_start")]
    pub clear_on_start: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            documents_dir: default_documents_dir(),
            results_dir: default_results_dir(),
            clear_on_start: default_clear_on_start(),
        }
    }
}

/// A named part of a website crawled with its own keywords and depth limit
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Section {
    /// Section name, used as the top-level key of the website artifact
    pub name: String,

    /// Keywords matched case-insensitively as substrings of link text
    pub keywords: Vec<String>,

    /// How many hops below an entry link the crawler may follow
    pub max_depth: u32,

    /// Also harvest matching links from the root page's `<nav>` region
    #[serde(default)]
    pub include_navigation: bool,
}

impl Section {
    pub fn new(name: &str, keywords: &[&str], max_depth: u32) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            max_depth,
            include_navigation: false,
        }
    }

    pub fn with_navigation(mut self) -> Self {
        self.include_navigation = true;
        self
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_page_timeout() -> u64 {
    10
}

fn default_probe_timeout() -> u64 {
    10
}

fn default_document_timeout() -> u64 {
    30
}

fn default_probe_concurrency() -> usize {
    10
}

fn default_documents_dir() -> String {
    "downloaded_pdfs".to_string()
}

fn default_results_dir() -> String {
    "json_files".to_string()
}

fn default_clear_on_start() -> bool {
    true
}

pub(crate) fn default_exclusion_keywords() -> Vec<String> {
    [
        "login",
        "sign in",
        "sign_in",
        "signin",
        "sign-in",
        "privacy policy",
        "terms",
        "terms of service",
        "terms-of-service",
        "careers",
        "jobs",
        "employment",
        "support",
        "help",
        "faq",
        "documentation",
        "customer service",
        "contact us",
        "contactus",
        "contact-us",
        "blog",
        "newsletter",
        "what's new",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

pub(crate) fn default_sections() -> Vec<Section> {
    vec![
        Section::new("about", &["about", "our story", "company", "about us"], 2),
        Section::new(
            "sustainability",
            &["sustainability", "csr", "environment", "climate"],
            2,
        ),
        Section::new(
            "reports",
            &[
                "annual report",
                "sustainability report",
                "investor relations",
                "financial report",
                "pdf",
                "download",
            ],
            1,
        ),
        Section::new(
            "products",
            &[
                "product",
                "products",
                "services",
                "offerings",
                "solutions",
                "features",
            ],
            1,
        )
        .with_navigation(),
    ]
}
