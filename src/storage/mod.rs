//! Storage module for persisting articles and categories
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Atomic insert-or-fetch upserts keyed by title
//! - The article/category link relation
//! - Read queries for the API and statistics

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

/// Length of a record id in hex characters
pub const RECORD_ID_LEN: usize = 24;

static ID_COUNTER: AtomicU32 = AtomicU32::new(0);
static PROCESS_BYTES: OnceLock<[u8; 5]> = OnceLock::new();

/// Opaque store-generated identifier
///
/// Twelve bytes rendered as 24 lowercase hex characters: 4 bytes of Unix
/// seconds, 5 process-unique bytes, and a 3-byte counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generates a fresh identifier
    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        let seconds = Utc::now().timestamp() as u32;
        let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(process_bytes());
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);

        Self(hex::encode(bytes))
    }

    /// Accepts exactly 24 hex characters (either case)
    ///
    /// # Examples
    ///
    /// ```
    /// use blog_harvester::storage::RecordId;
    ///
    /// assert!(RecordId::parse("5F1D7B2C9A0E4D3B8C6A1F20").is_some());
    /// assert!(RecordId::parse("5f1d7b2c").is_none());
    /// assert!(RecordId::parse("zzzzzzzzzzzzzzzzzzzzzzzz").is_none());
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        if value.len() == RECORD_ID_LEN && value.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(value.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn process_bytes() -> &'static [u8; 5] {
    PROCESS_BYTES.get_or_init(|| {
        let mut hasher = Sha256::new();
        hasher.update(std::process::id().to_be_bytes());
        hasher.update(
            Utc::now()
                .timestamp_nanos_opt()
                .unwrap_or_default()
                .to_be_bytes(),
        );
        let digest = hasher.finalize();
        let mut out = [0u8; 5];
        out.copy_from_slice(&digest[..5]);
        out
    })
}

/// A category in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRecord {
    pub id: RecordId,
    pub title: String,
    pub source_url: String,
    pub created_at: String,
}

/// An article in the database, with the ids of its categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    pub id: RecordId,
    pub title: String,
    pub text: String,
    pub source_url: String,
    pub categories: Vec<RecordId>,
    pub created_at: String,
}

/// The record an upsert resolved to, and whether this call created it
#[derive(Debug, Clone)]
pub struct Upserted<T> {
    pub record: T,
    pub created: bool,
}
