//! Blog Harvester: a blog crawler and article/category store
//!
//! This crate fetches a blog's listing page, extracts article cards and their
//! category links with structural queries, and persists them into a SQLite
//! document store where both articles and categories are unique by title.

pub mod api;
pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Blog Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Server unreachable for {url}: {source}")]
    Unreachable { url: String, source: reqwest::Error },

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[source] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API server error: {0}")]
    ApiServer(String),
}

impl HarvestError {
    /// Returns true for errors that abort the current operation
    ///
    /// Only `NotFound` is scoped to the single request that produced it.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }
}

impl From<storage::StorageError> for HarvestError {
    fn from(err: storage::StorageError) -> Self {
        match err {
            storage::StorageError::NotFound(what) => Self::NotFound(what),
            other => Self::Storage(other),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid structural query: {0}")]
    InvalidQuery(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Link has no target: {0:?}")]
    EmptyLink(String),
}

/// Result type alias for Blog Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Orchestrator, SiteProfile};
pub use storage::{ArticleRecord, CategoryRecord, RecordId, SqliteStorage, Storage};
