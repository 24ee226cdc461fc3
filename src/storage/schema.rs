//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Blog Harvester database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Categories, unique by title
CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL UNIQUE,
    source_url TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Articles, unique by title
CREATE TABLE IF NOT EXISTS articles (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL UNIQUE,
    text TEXT NOT NULL DEFAULT '',
    source_url TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Each article's category set; one row per distinct pair
CREATE TABLE IF NOT EXISTS article_categories (
    article_id TEXT NOT NULL REFERENCES articles(id),
    category_id TEXT NOT NULL REFERENCES categories(id),
    linked_at TEXT NOT NULL,
    PRIMARY KEY (article_id, category_id)
);

CREATE INDEX IF NOT EXISTS idx_article_categories_category ON article_categories(category_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
