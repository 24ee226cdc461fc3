//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{ArticleRecord, CategoryRecord, RecordId, Upserted};
use crate::HarvestError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Params, Row, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

/// How long a writer waits on another connection's lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CATEGORY_COLUMNS: &str = "id, title, source_url, created_at";
const ARTICLE_COLUMNS: &str = "id, title, text, source_url, created_at";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// Several instances may open the same file; the title constraints and the
    /// busy timeout keep concurrent upserts from producing duplicates.
    pub fn new(path: &Path) -> Result<Self, HarvestError> {
        let conn = Connection::open(path).map_err(StorageError::from)?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(StorageError::from)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(StorageError::from)?;

        initialize_schema(&conn).map_err(StorageError::from)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (tests and dry runs)
    pub fn open_in_memory() -> Result<Self, HarvestError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(StorageError::from)?;
        initialize_schema(&conn).map_err(StorageError::from)?;
        Ok(Self { conn })
    }

    fn query_categories<P: Params>(&self, sql: &str, params: P) -> StorageResult<Vec<CategoryRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let categories = stmt
            .query_map(params, category_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn query_articles<P: Params>(&self, sql: &str, params: P) -> StorageResult<Vec<ArticleRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut articles = stmt
            .query_map(params, article_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        for article in &mut articles {
            article.categories = load_category_ids(&self.conn, &article.id)?;
        }

        Ok(articles)
    }
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<CategoryRecord> {
    Ok(CategoryRecord {
        id: RecordId(row.get(0)?),
        title: row.get(1)?,
        source_url: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Maps an article row; categories are filled in separately
fn article_from_row(row: &Row<'_>) -> rusqlite::Result<ArticleRecord> {
    Ok(ArticleRecord {
        id: RecordId(row.get(0)?),
        title: row.get(1)?,
        text: row.get(2)?,
        source_url: row.get(3)?,
        categories: Vec::new(),
        created_at: row.get(4)?,
    })
}

fn load_category_ids(conn: &Connection, article_id: &RecordId) -> rusqlite::Result<Vec<RecordId>> {
    let mut stmt = conn.prepare_cached(
        "SELECT category_id FROM article_categories WHERE article_id = ?1 ORDER BY rowid",
    )?;
    let ids = stmt
        .query_map(params![article_id.as_str()], |row| Ok(RecordId(row.get(0)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

impl Storage for SqliteStorage {
    // ===== Categories =====

    fn find_category_by_title(&self, title: &str) -> StorageResult<Option<CategoryRecord>> {
        let category = self
            .conn
            .query_row(
                &format!("SELECT {} FROM categories WHERE title = ?1", CATEGORY_COLUMNS),
                params![title],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    fn upsert_category(
        &mut self,
        title: &str,
        source_url: &str,
    ) -> StorageResult<Upserted<CategoryRecord>> {
        let now = Utc::now().to_rfc3339();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let inserted = tx.execute(
            "INSERT INTO categories (id, title, source_url, created_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(title) DO NOTHING",
            params![RecordId::generate().as_str(), title, source_url, now],
        )?;

        let record = tx.query_row(
            &format!("SELECT {} FROM categories WHERE title = ?1", CATEGORY_COLUMNS),
            params![title],
            category_from_row,
        )?;
        tx.commit()?;

        Ok(Upserted {
            record,
            created: inserted == 1,
        })
    }

    fn get_category_by_id(&self, id: &str) -> StorageResult<CategoryRecord> {
        let not_found = || StorageError::NotFound(format!("category {}", id));
        let record_id = RecordId::parse(id).ok_or_else(not_found)?;

        self.conn
            .query_row(
                &format!("SELECT {} FROM categories WHERE id = ?1", CATEGORY_COLUMNS),
                params![record_id.as_str()],
                category_from_row,
            )
            .optional()?
            .ok_or_else(not_found)
    }

    fn list_categories(&self) -> StorageResult<Vec<CategoryRecord>> {
        self.query_categories(
            &format!("SELECT {} FROM categories ORDER BY title", CATEGORY_COLUMNS),
            [],
        )
    }

    // ===== Articles =====

    fn find_article_by_title(&self, title: &str) -> StorageResult<Option<ArticleRecord>> {
        let articles = self.query_articles(
            &format!("SELECT {} FROM articles WHERE title = ?1", ARTICLE_COLUMNS),
            params![title],
        )?;
        Ok(articles.into_iter().next())
    }

    fn upsert_article(
        &mut self,
        title: &str,
        source_url: &str,
    ) -> StorageResult<Upserted<ArticleRecord>> {
        let now = Utc::now().to_rfc3339();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let inserted = tx.execute(
            "INSERT INTO articles (id, title, text, source_url, created_at) VALUES (?1, ?2, '', ?3, ?4)
             ON CONFLICT(title) DO NOTHING",
            params![RecordId::generate().as_str(), title, source_url, now],
        )?;

        let mut record = tx.query_row(
            &format!("SELECT {} FROM articles WHERE title = ?1", ARTICLE_COLUMNS),
            params![title],
            article_from_row,
        )?;
        record.categories = load_category_ids(&tx, &record.id)?;
        tx.commit()?;

        Ok(Upserted {
            record,
            created: inserted == 1,
        })
    }

    fn get_article_by_id(&self, id: &str) -> StorageResult<ArticleRecord> {
        let not_found = || StorageError::NotFound(format!("article {}", id));
        let record_id = RecordId::parse(id).ok_or_else(not_found)?;

        self.query_articles(
            &format!("SELECT {} FROM articles WHERE id = ?1", ARTICLE_COLUMNS),
            params![record_id.as_str()],
        )?
        .into_iter()
        .next()
        .ok_or_else(not_found)
    }

    fn set_article_text(&mut self, id: &RecordId, text: &str) -> StorageResult<()> {
        let updated = self.conn.execute(
            "UPDATE articles SET text = ?1 WHERE id = ?2",
            params![text, id.as_str()],
        )?;

        if updated == 0 {
            return Err(StorageError::NotFound(format!("article {}", id)));
        }
        Ok(())
    }

    fn list_articles(&self) -> StorageResult<Vec<ArticleRecord>> {
        self.query_articles(
            &format!("SELECT {} FROM articles ORDER BY title", ARTICLE_COLUMNS),
            [],
        )
    }

    fn list_articles_by_category(&self, category_title: &str) -> StorageResult<Vec<ArticleRecord>> {
        self.query_articles(
            "SELECT a.id, a.title, a.text, a.source_url, a.created_at
             FROM articles a
             JOIN article_categories ac ON ac.article_id = a.id
             JOIN categories c ON c.id = ac.category_id
             WHERE c.title = ?1
             ORDER BY a.title",
            params![category_title],
        )
    }

    // ===== Links =====

    fn link_article_to_category(
        &mut self,
        article_id: &RecordId,
        category_id: &RecordId,
    ) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO article_categories (article_id, category_id, linked_at)
             VALUES (?1, ?2, ?3)",
            params![article_id.as_str(), category_id.as_str(), now],
        )?;
        Ok(inserted == 1)
    }

    // ===== Statistics =====

    fn count_categories(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_articles(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_links(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM article_categories", [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }
}
