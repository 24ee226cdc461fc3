//! Output module for reporting on the harvested data
//!
//! This module handles:
//! - Record counts for the status view and `--stats`
//! - Printing crawl reports

pub mod stats;

pub use stats::{load_statistics, print_statistics, HarvestStatistics};

use crate::crawler::CrawlReport;

/// Prints a crawl report to stdout
pub fn print_crawl_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");
    println!("  Cards read: {}", report.cards);
    println!("  New articles: {}", report.articles_created);
    println!("  New categories: {}", report.categories_created);
    println!("  New links: {}", report.links_created);
    if report.texts_fetched > 0 {
        println!("  Article bodies fetched: {}", report.texts_fetched);
    }
}
