//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{ArticleRecord, CategoryRecord, RecordId, Upserted};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Both collections are keyed by title. Upserts are a single atomic call:
/// implementations must never let two records share a title, however many
/// callers race on the same one.
pub trait Storage {
    // ===== Categories =====

    /// Looks up a category by its exact title
    fn find_category_by_title(&self, title: &str) -> StorageResult<Option<CategoryRecord>>;

    /// Returns the category titled `title`, creating it if absent
    ///
    /// An existing record is returned unchanged; `source_url` only applies
    /// when the record is created.
    fn upsert_category(
        &mut self,
        title: &str,
        source_url: &str,
    ) -> StorageResult<Upserted<CategoryRecord>>;

    /// Gets a category by id; malformed ids are `NotFound`
    fn get_category_by_id(&self, id: &str) -> StorageResult<CategoryRecord>;

    /// All categories ordered by title
    fn list_categories(&self) -> StorageResult<Vec<CategoryRecord>>;

    // ===== Articles =====

    /// Looks up an article by its exact title
    fn find_article_by_title(&self, title: &str) -> StorageResult<Option<ArticleRecord>>;

    /// Returns the article titled `title`, creating it (no categories, empty
    /// text) if absent
    fn upsert_article(
        &mut self,
        title: &str,
        source_url: &str,
    ) -> StorageResult<Upserted<ArticleRecord>>;

    /// Gets an article by id; malformed ids are `NotFound`
    fn get_article_by_id(&self, id: &str) -> StorageResult<ArticleRecord>;

    /// Replaces an article's body text
    fn set_article_text(&mut self, id: &RecordId, text: &str) -> StorageResult<()>;

    /// All articles ordered by title
    fn list_articles(&self) -> StorageResult<Vec<ArticleRecord>>;

    /// Articles linked to the category titled `category_title`
    ///
    /// An unknown category yields an empty list.
    fn list_articles_by_category(&self, category_title: &str) -> StorageResult<Vec<ArticleRecord>>;

    // ===== Links =====

    /// Adds `category_id` to the article's category set
    ///
    /// Returns true if a link was added, false if it already existed.
    fn link_article_to_category(
        &mut self,
        article_id: &RecordId,
        category_id: &RecordId,
    ) -> StorageResult<bool>;

    // ===== Statistics =====

    fn count_categories(&self) -> StorageResult<u64>;

    fn count_articles(&self) -> StorageResult<u64>;

    fn count_links(&self) -> StorageResult<u64>;
}
