//! Crawler module: fetching, extraction and orchestration
//!
//! This module contains the crawl-and-extract pipeline:
//! - HTTP fetching (transport failure is fatal, HTTP errors are empty)
//! - Structural extraction over parsed HTML
//! - Reading article cards under the two-children layout invariant
//! - The orchestrator that persists cards into storage

mod card;
mod extractor;
mod fetcher;
mod orchestrator;

pub use card::{read_card, Card, CardLink, CARD_CHILD_COUNT};
pub use extractor::{extract_text, Document, ElementHandle, StructuralQuery};
pub use fetcher::{build_http_client, fetch_url, user_agent_string, FetchOutcome};
pub use orchestrator::{CrawlReport, Orchestrator, SiteProfile};

use crate::config::Config;
use crate::storage::SqliteStorage;
use crate::Result;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Runs one crawl of the configured listing page
///
/// Opens the configured database, crawls, and returns the report.
///
/// # Example
///
/// ```no_run
/// use blog_harvester::config::load_config;
/// use blog_harvester::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("blog-harvester.toml"))?;
/// let report = crawl(&config).await?;
/// println!("{} new articles", report.articles_created);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config) -> Result<CrawlReport> {
    let storage = SqliteStorage::new(Path::new(&config.database.path))?;
    let orchestrator = Orchestrator::from_config(config, Arc::new(Mutex::new(storage)))?;
    orchestrator.crawl().await
}
