//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with a descriptive user agent
//! - Single GET requests, no retry
//! - Classifying the outcome: transport failure is fatal, an HTTP error
//!   status is simply "nothing to parse"

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::{HarvestError, Result};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Result of a fetch that reached the server
#[derive(Debug)]
pub enum FetchOutcome {
    /// The server answered with a non-error status
    Body {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with status >= 400; there is nothing to parse
    Empty {
        /// The HTTP status code
        status_code: u16,
    },
}

impl FetchOutcome {
    /// The page body, or an empty string for error statuses
    pub fn into_body(self) -> String {
        match self {
            Self::Body { body, .. } => body,
            Self::Empty { .. } => String::new(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Body { status_code, .. } | Self::Empty { status_code } => *status_code,
        }
    }
}

/// Formats the user agent: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use blog_harvester::config::{CrawlerConfig, UserAgentConfig};
/// use blog_harvester::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "BlogHarvester".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&user_agent, &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx / 3xx | `Ok(Body)` |
/// | HTTP >= 400 | `Ok(Empty)` |
/// | Connection refused, DNS, TLS, timeout | `Err(Unreachable)` |
/// | Body could not be read | `Err(Unreachable)` |
pub async fn fetch_url(client: &Client, url: &Url) -> Result<FetchOutcome> {
    let unreachable = |source: reqwest::Error| HarvestError::Unreachable {
        url: url.to_string(),
        source,
    };

    let response = client.get(url.clone()).send().await.map_err(unreachable)?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        tracing::warn!("{} answered HTTP {}; nothing to parse", url, status.as_u16());
        return Ok(FetchOutcome::Empty {
            status_code: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let body = response.text().await.map_err(unreachable)?;
    tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());

    Ok(FetchOutcome::Body {
        final_url,
        status_code: status.as_u16(),
        body,
    })
}
