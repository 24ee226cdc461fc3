//! Crawl orchestration
//!
//! The orchestrator walks one listing page end to end:
//! - fetch the listing
//! - extract the article cards
//! - for each card, upsert the article, then each category, then the link
//!
//! Any failure aborts the whole run. Records committed before the failure
//! stay; running the crawl again is the recovery path and is idempotent.

use crate::config::Config;
use crate::crawler::card::read_card;
use crate::crawler::extractor::{extract_text, Document, StructuralQuery};
use crate::crawler::fetcher::{build_http_client, fetch_url};
use crate::storage::{ArticleRecord, RecordId, SqliteStorage, Storage, StorageError};
use crate::url::parse_http_url;
use crate::{HarvestError, Result};
use reqwest::Client;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use url::Url;

/// Everything the orchestrator needs to know about the crawled site
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Relative hrefs are resolved against this
    pub base_url: Url,
    /// Listing page crawled by [`Orchestrator::crawl`]
    pub listing_url: Url,
    /// Locates each article card on the listing page
    pub listing_query: StructuralQuery,
    /// Locates category links inside a card's categories block
    pub category_query: StructuralQuery,
    /// Locates the content container on an article page
    pub article_text_query: StructuralQuery,
}

impl SiteProfile {
    /// Builds a profile from the `[site]` configuration section
    pub fn from_config(config: &Config) -> Result<Self> {
        let site = &config.site;
        Ok(Self {
            base_url: parse_http_url(&site.base_url)?,
            listing_url: parse_http_url(&site.listing_url)?,
            listing_query: StructuralQuery::parse(&site.listing_query)?,
            category_query: StructuralQuery::parse(&site.category_query)?,
            article_text_query: StructuralQuery::parse(&site.article_text_query)?,
        })
    }
}

/// Counts from one successful crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub cards: usize,
    pub articles_created: usize,
    pub categories_created: usize,
    pub links_created: usize,
    pub texts_fetched: usize,
}

/// Drives the fetch → extract → persist pipeline for one site
pub struct Orchestrator {
    site: SiteProfile,
    storage: Arc<Mutex<SqliteStorage>>,
    client: Client,
    fetch_article_text: bool,
}

impl Orchestrator {
    /// Creates an orchestrator over an explicit site profile
    pub fn new(site: SiteProfile, storage: Arc<Mutex<SqliteStorage>>, client: Client) -> Self {
        Self {
            site,
            storage,
            client,
            fetch_article_text: false,
        }
    }

    /// Creates an orchestrator from configuration, sharing `storage`
    pub fn from_config(config: &Config, storage: Arc<Mutex<SqliteStorage>>) -> Result<Self> {
        let site = SiteProfile::from_config(config)?;
        let client = build_http_client(&config.user_agent, &config.crawler)?;

        Ok(Self::new(site, storage, client)
            .with_article_text(config.crawler.fetch_article_text))
    }

    /// Also fetch and store the body text of listed articles that have none
    pub fn with_article_text(mut self, enabled: bool) -> Self {
        self.fetch_article_text = enabled;
        self
    }

    pub fn storage(&self) -> Arc<Mutex<SqliteStorage>> {
        self.storage.clone()
    }

    fn lock_storage(&self) -> Result<MutexGuard<'_, SqliteStorage>> {
        self.storage
            .lock()
            .map_err(|_| StorageError::Database("storage lock poisoned".to_string()).into())
    }

    /// Crawls the configured listing page
    pub async fn crawl(&self) -> Result<CrawlReport> {
        let listing_url = self.site.listing_url.clone();
        self.crawl_all(&listing_url).await
    }

    /// Crawls one listing page end to end
    ///
    /// # Errors
    ///
    /// * `Unreachable` - the listing (or, with article text enabled, an
    ///   article page) could not be fetched
    /// * `MalformedDocument` - empty listing, zero cards, or a card that
    ///   breaks the two-children layout
    /// * `Storage` - the store rejected a write
    pub async fn crawl_all(&self, listing_url: &Url) -> Result<CrawlReport> {
        tracing::info!("Starting crawl of {}", listing_url);

        let result = self.run(listing_url).await;
        match &result {
            Ok(report) => tracing::info!(
                "Crawl of {} complete: {} cards, {} new articles, {} new categories, {} new links",
                listing_url,
                report.cards,
                report.articles_created,
                report.categories_created,
                report.links_created
            ),
            Err(e) => tracing::error!("Crawl of {} aborted: {}", listing_url, e),
        }
        result
    }

    async fn run(&self, listing_url: &Url) -> Result<CrawlReport> {
        let listing = fetch_url(&self.client, listing_url).await?.into_body();

        let (mut report, missing_text) = self.ingest_listing(&listing)?;

        if self.fetch_article_text {
            for (id, url) in missing_text {
                let text = self.article_text(&url).await?;
                self.lock_storage()?.set_article_text(&id, &text)?;
                report.texts_fetched += 1;
            }
        }

        Ok(report)
    }

    /// Parses the listing and persists every card, in document order
    ///
    /// Synchronous on purpose: the parsed document and the storage guard
    /// never cross an await point. Returns the report and the articles on
    /// this listing that still have no body text, which includes those left
    /// empty by an earlier aborted run.
    fn ingest_listing(&self, listing: &str) -> Result<(CrawlReport, Vec<(RecordId, Url)>)> {
        let document = Document::parse(listing)?;
        let cards = document.select(&self.site.listing_query);

        if cards.is_empty() {
            return Err(HarvestError::MalformedDocument(format!(
                "listing has no cards matching '{}'",
                self.site.listing_query.as_str()
            )));
        }

        let mut report = CrawlReport {
            cards: cards.len(),
            ..CrawlReport::default()
        };
        let mut missing_text = Vec::new();
        let mut storage = self.lock_storage()?;

        for (index, element) in cards.iter().enumerate() {
            let card = read_card(index, element, &self.site.category_query, &self.site.base_url)?;
            tracing::debug!(
                "Card {}: '{}' with {} categories",
                index,
                card.article.title,
                card.categories.len()
            );

            let article = storage.upsert_article(&card.article.title, card.article.url.as_str())?;
            if article.created {
                report.articles_created += 1;
            }
            if article.created || article.record.text.is_empty() {
                missing_text.push((article.record.id.clone(), card.article.url.clone()));
            }

            for link in &card.categories {
                let category = storage.upsert_category(&link.title, link.url.as_str())?;
                if category.created {
                    report.categories_created += 1;
                }

                if storage.link_article_to_category(&article.record.id, &category.record.id)? {
                    report.links_created += 1;
                }
            }
        }

        Ok((report, missing_text))
    }

    /// Fetches an article page and returns its body text
    ///
    /// Concatenates the text of every element matching the article-text
    /// query; an HTTP error status or no match gives an empty string.
    pub async fn article_text(&self, article_url: &Url) -> Result<String> {
        let page = fetch_url(&self.client, article_url).await?.into_body();
        extract_text(&page, &self.site.article_text_query)
    }

    /// Re-fetches one stored article's body text and saves it
    pub async fn refresh_article_text(&self, id: &str) -> Result<ArticleRecord> {
        let article = self.lock_storage()?.get_article_by_id(id)?;
        let url = parse_http_url(&article.source_url)?;

        let text = self.article_text(&url).await?;

        let mut storage = self.lock_storage()?;
        storage.set_article_text(&article.id, &text)?;
        Ok(storage.get_article_by_id(article.id.as_str())?)
    }
}
