//! Configuration module for Blog Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use blog_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("blog-harvester.toml")).unwrap();
//! println!("Listing page: {}", config.site.listing_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, DatabaseConfig, ServerConfig, SiteConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
