//! Statistics generation from the article database
//!
//! This module provides functionality for extracting and displaying
//! record counts from the storage layer.

use crate::storage::Storage;
use crate::HarvestError;
use serde::Serialize;

/// Record counts for the status view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HarvestStatistics {
    /// Number of distinct categories
    pub categories: u64,

    /// Number of distinct articles
    pub articles: u64,

    /// Number of article/category links
    pub links: u64,
}

impl HarvestStatistics {
    /// Average number of categories per article
    pub fn links_per_article(&self) -> f64 {
        if self.articles == 0 {
            0.0
        } else {
            self.links as f64 / self.articles as f64
        }
    }
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> Result<HarvestStatistics, HarvestError> {
    Ok(HarvestStatistics {
        categories: storage.count_categories()?,
        articles: storage.count_articles()?,
        links: storage.count_links()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Categories: {}", stats.categories);
    println!("  Articles: {}", stats.articles);
    println!("  Article/category links: {}", stats.links);
    println!(
        "  Categories per article: {:.2}",
        stats.links_per_article()
    );
}
