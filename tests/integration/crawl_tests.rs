//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full section crawl and workflow cycle end-to-end.

use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use sustain_scraper::config::{Config, Section};
use sustain_scraper::crawler::{build_http_client, PageCrawler, SectionOrchestrator};
use sustain_scraper::documents::{ExtractionError, TextExtractor};
use sustain_scraper::output::{combine, read_artifact};
use sustain_scraper::workflow::{Workflow, WorkflowRunner};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct FixedExtractor(&'static str);

impl TextExtractor for FixedExtractor {
    fn extract(&self, _file_path: &Path) -> Result<String, ExtractionError> {
        Ok(self.0.to_string())
    }
}

/// Creates a test configuration writing into the given directory
fn create_test_config(root: &Path, sections: Vec<Section>) -> Config {
    let mut config = Config::default();
    config.output.documents_dir = root.join("downloaded_pdfs").display().to_string();
    config.output.results_dir = root.join("json_files").display().to_string();
    config.sections = sections;
    config
}

fn create_orchestrator(server: &MockServer, config: &Config) -> SectionOrchestrator {
    let client = build_http_client(&config.crawler).expect("client builds");
    let crawler = PageCrawler::new(client, &server.uri(), config)
        .with_extractor(Arc::new(FixedExtractor("annual report text")));
    SectionOrchestrator::new(crawler, config.sections.clone())
}

async fn mount_page(server: &MockServer, at: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.to_string(), "text/html"))
        .mount(server)
        .await;
}

async fn mount_pdf(server: &MockServer, at: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4 report", "application/pdf"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_report_link_yields_one_document() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/files/2024.pdf">2024 Annual Report PDF</a></body></html>"#,
    )
    .await;
    mount_pdf(&mock_server, "/files/2024.pdf").await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        dir.path(),
        vec![Section::new("reports", &["annual report"], 1)],
    );
    let results = create_orchestrator(&mock_server, &config).run(&base_url).await;

    let node = &results["reports"]["2024 annual report pdf"];
    assert_eq!(node.pdfs.len(), 1);
    assert_eq!(node.pdfs[0].url, format!("{}/files/2024.pdf", base_url));
    assert_eq!(node.pdfs[0].content, "annual report text");
    assert!(Path::new(&node.pdfs[0].file_path).exists());
}

#[tokio::test]
async fn test_page_visited_once_across_sections() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/shared">About our sustainability</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>Shared page</p>", "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        dir.path(),
        vec![
            Section::new("about", &["about"], 2),
            Section::new("sustainability", &["sustainability"], 2),
        ],
    );
    let results = create_orchestrator(&mock_server, &config)
        .run(&mock_server.uri())
        .await;

    assert_eq!(
        results["about"]["about our sustainability"].content,
        "Shared page"
    );
    assert!(!results.contains_key("sustainability"));
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/level0">About</a>"#).await;
    mount_page(
        &mock_server,
        "/level0",
        r#"<p>Level 0</p><a href="/level1">About more</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/level1",
        r#"<p>Level 1</p><a href="/level2">About even more</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>Level 2</p>", "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path(), vec![Section::new("about", &["about"], 1)]);
    let results = create_orchestrator(&mock_server, &config)
        .run(&mock_server.uri())
        .await;

    let level0 = &results["about"]["about"];
    assert_eq!(level0.content, "Level 0");
    let level1 = &level0.links["About more"];
    assert_eq!(level1.content, "Level 1");
    assert!(level1.links.is_empty());
}

#[tokio::test]
async fn test_excluded_links_not_followed() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/blog/sust">Sustainability Blog Post</a>
           <a href="/careers">Sustainability careers</a>
           <a href="/impact">Sustainability impact</a>"#,
    )
    .await;
    mount_page(&mock_server, "/impact", "<p>Impact</p>").await;
    Mock::given(method("GET"))
        .and(path("/blog/sust"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/careers"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        dir.path(),
        vec![Section::new("sustainability", &["sustainability"], 2)],
    );
    let results = create_orchestrator(&mock_server, &config)
        .run(&mock_server.uri())
        .await;

    let section = &results["sustainability"];
    assert_eq!(section.len(), 1);
    assert_eq!(section["sustainability impact"].content, "Impact");
}

#[tokio::test]
async fn test_full_run_combines_workflows() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/about">About us</a><a href="/files/2024.pdf">Annual report</a>"#,
    )
    .await;
    mount_page(&mock_server, "/about", "<p>Founded in 1990</p>").await;
    mount_pdf(&mock_server, "/files/2024.pdf").await;

    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("filing.pdf");
    std::fs::write(&report, b"%PDF-1.4 filing").unwrap();

    let config = create_test_config(
        dir.path(),
        vec![
            Section::new("about", &["about"], 2),
            Section::new("reports", &["annual report"], 1),
        ],
    );
    let runner = WorkflowRunner::new("Acme Corp", &mock_server.uri(), config)
        .with_extractor(Arc::new(FixedExtractor("Net Zero by 2040")));

    let combined_path = runner
        .run(vec![
            Workflow::Website,
            Workflow::Filing {
                report_path: report,
            },
        ])
        .await
        .expect("run completes");

    let combined = read_artifact(&combined_path).unwrap();
    assert_eq!(
        combined["about"]["about us"]["content"],
        json!("Founded in 1990")
    );
    assert_eq!(
        combined["reports"]["annual report"]["pdfs"][0]["content"],
        json!("Net Zero by 2040")
    );
    assert_eq!(
        combined["Acme Corp"]["Net Zero"],
        json!(["Net Zero by 2040"])
    );

    let results_dir = dir.path().join("json_files");
    assert!(results_dir.join("Acme_Corp_scraped_data.json").exists());
    assert!(results_dir.join("Acme_Corp_sustainability_data.json").exists());
}

#[tokio::test]
async fn test_aggregation_last_writer_wins() {
    let dir = tempfile::tempdir().unwrap();
    let website = dir.path().join("Acme_scraped_data.json");
    let filing = dir.path().join("Acme_sustainability_data.json");
    let broken = dir.path().join("broken.json");
    std::fs::write(&website, r#"{"Acme": {"source": "website"}, "about": {}}"#).unwrap();
    std::fs::write(&filing, r#"{"Acme": {"source": "filing"}}"#).unwrap();
    std::fs::write(&broken, "not json").unwrap();

    let combined = combine(&[website, broken, filing]);

    assert_eq!(
        Value::Object(combined),
        json!({"Acme": {"source": "filing"}, "about": {}})
    );
}
