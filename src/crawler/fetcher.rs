//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client
//! - GET requests for pages and documents, each with its own timeout
//! - HEAD requests to read a URL's declared Content-Type
//! - Error classification
//!
//! Nothing here retries: a failed request is final for that URL.

use crate::config::CrawlerConfig;
use crate::ScraperError;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client, Response};
use std::time::Duration;

/// Media-type fragment identifying a document response
pub const DOCUMENT_MEDIA_TYPE: &str = "pdf";

/// Maximum redirect hops followed for any request
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the resource
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value (lower-cased, empty if absent)
        content_type: String,
        /// Response body
        body: Vec<u8>,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request hit its timeout
        timed_out: bool,
    },
}

impl FetchResult {
    /// Returns true if the response declares a document media type
    pub fn is_document(&self) -> bool {
        matches!(self, Self::Success { content_type, .. } if content_type.contains(DOCUMENT_MEDIA_TYPE))
    }
}

/// Builds the HTTP client shared by pages, probes and documents
///
/// Timeouts are applied per request, because documents get a longer budget
/// than pages and probes.
///
/// # Example
///
/// ```no_run
/// use sustain_scraper::config::CrawlerConfig;
/// use sustain_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(Duration::from_secs(config.page_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a GET request
///
/// # Error Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | Success |
/// | any other status | HttpError |
/// | Timeout | NetworkError (timed_out) |
/// | Connection refused, TLS, body read failure | NetworkError |
pub async fn fetch_url(client: &Client, url: &str, timeout: Duration) -> FetchResult {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    let content_type = content_type_of(&response);

    match response.bytes().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body: body.to_vec(),
        },
        Err(e) => classify_error(e),
    }
}

/// Sends a HEAD request and returns the declared Content-Type
///
/// # Returns
///
/// * `Ok(String)` - Lower-cased Content-Type header value (empty if absent)
/// * `Err(ScraperError)` - Request failed, timed out, or returned a non-2xx status
pub async fn probe_content_type(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<String, ScraperError> {
    let response = client
        .head(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| request_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScraperError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(content_type_of(&response))
}

/// Downloads a document's bytes
pub async fn fetch_document(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<Vec<u8>, ScraperError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| request_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScraperError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(|e| request_error(url, e))?;
    Ok(body.to_vec())
}

fn content_type_of(response: &Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase()
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: "Connection refused".to_string(),
            timed_out: false,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: false,
        }
    }
}

fn request_error(url: &str, e: reqwest::Error) -> ScraperError {
    if e.is_timeout() {
        ScraperError::Timeout {
            url: url.to_string(),
        }
    } else {
        ScraperError::Http {
            url: url.to_string(),
            source: e,
        }
    }
}
