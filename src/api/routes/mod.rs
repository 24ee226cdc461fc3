//! Route handlers for the HTTP API
//!
//! Handlers are organized by domain:
//! - [`crawl`] - Triggering crawls and the statistics view
//! - [`records`] - Articles and categories
//! - [`system`] - Health

use serde::{Deserialize, Serialize};

mod crawl;
mod records;
mod system;

pub use crawl::*;
pub use records::*;
pub use system::*;

/// Query parameters for GET /articles
///
/// `category` takes precedence when both are given.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ArticlesQuery {
    /// Only articles linked to the category with this title
    pub category: Option<String>,
    /// A single article by id
    pub article: Option<String>,
}
