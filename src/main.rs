//! Blog Harvester main entry point
//!
//! This is the command-line interface for the Blog Harvester crawler.

use blog_harvester::config::{load_config_with_hash, Config};
use blog_harvester::crawler::crawl;
use blog_harvester::output::print_crawl_report;
use blog_harvester::{Orchestrator, SqliteStorage};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Blog Harvester: a blog article and category crawler
///
/// Blog Harvester reads a blog's listing page, extracts every article card
/// and its category links, and stores them in a SQLite database where
/// articles and categories are unique by title.
#[derive(Parser, Debug)]
#[command(name = "blog-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A blog article and category crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "serve"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "serve"])]
    stats: bool,

    /// Serve the HTTP API until interrupted
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    serve: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The config's debug flag picks the default log level, so read it first
    let loaded = load_config_with_hash(&cli.config);
    let debug = loaded
        .as_ref()
        .map(|(config, _)| config.server.debug)
        .unwrap_or(false);
    setup_logging(cli.verbose, cli.quiet, debug);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match loaded {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.serve {
        handle_serve(config).await?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, debug: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match (verbose, debug) {
            (0, false) => EnvFilter::new("blog_harvester=info,warn"),
            (0, true) | (1, _) => EnvFilter::new("blog_harvester=debug,tower_http=debug,info"),
            (2, _) => EnvFilter::new("blog_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Blog Harvester Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Listing URL: {}", config.site.listing_url);
    println!("  Card query: {}", config.site.listing_query);
    println!("  Category query: {}", config.site.category_query);
    println!("  Article text query: {}", config.site.article_text_query);

    println!("\nCrawler Configuration:");
    println!("  Fetch article text: {}", config.crawler.fetch_article_text);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nStorage:");
    println!("  Database: {}", config.database.path);

    println!("\nServer:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  Debug: {}", config.server.debug);
    println!(
        "  Secret key: {}",
        if config.server.secret_key.is_some() { "set" } else { "not set" }
    );

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {}", config.site.listing_url);

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use blog_harvester::output::{load_statistics, print_statistics};

    println!("Database: {}\n", config.database.path);

    let storage = SqliteStorage::new(Path::new(&config.database.path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --serve mode: runs the HTTP API
async fn handle_serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Opening database: {}", config.database.path);
    let storage = SqliteStorage::new(Path::new(&config.database.path))?;
    let orchestrator = Orchestrator::from_config(&config, Arc::new(Mutex::new(storage)))?;

    blog_harvester::api::start_api_server(Arc::new(orchestrator), Arc::new(config)).await?;
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Listing page: {}", config.site.listing_url);
    tracing::info!("Database: {}", config.database.path);

    match crawl(config).await {
        Ok(report) => {
            print_crawl_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
