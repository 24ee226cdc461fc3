//! HTTP API server module
//!
//! A JSON front end over the crawler and the article/category store.

use crate::{Config, HarvestError, Orchestrator, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod routes;
pub mod state;

pub use error_response::{ApiError, ErrorDetail};
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Crawling
/// - `GET /` - Store statistics
/// - `POST /crawl` - Run a crawl, then redirect to `/`
/// - `POST /api/crawl` - Run a crawl and return its report
///
/// ## Records
/// - `GET /categories` - List categories
/// - `GET /articles` - List articles (`?category=<title>` or `?article=<id>`)
/// - `GET /articles/:id` - Get single article
/// - `POST /articles/:id/text` - Re-fetch an article's body text
///
/// ## System
/// - `GET /health` - Health check
pub fn create_router(orchestrator: Arc<Orchestrator>, config: Arc<Config>) -> Router {
    let state = AppState::new(orchestrator);

    let router = Router::new()
        // Crawling
        .route("/", get(routes::index))
        .route("/crawl", post(routes::trigger_crawl))
        .route("/api/crawl", post(routes::run_crawl))
        // Records
        .route("/categories", get(routes::list_categories))
        .route("/articles", get(routes::list_articles))
        .route("/articles/:id", get(routes::get_article))
        .route("/articles/:id/text", post(routes::refresh_article_text))
        // System
        .route("/health", get(routes::health_check))
        .with_state(state);

    if config.server.debug {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Start the API server on the configured host and port
///
/// Runs until the server stops, either due to an error or shutdown.
///
/// # Example
///
/// ```no_run
/// use blog_harvester::config::load_config;
/// use blog_harvester::{Orchestrator, SqliteStorage};
/// use std::path::Path;
/// use std::sync::{Arc, Mutex};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(load_config(Path::new("blog-harvester.toml"))?);
/// let storage = SqliteStorage::new(Path::new(&config.database.path))?;
/// let orchestrator = Orchestrator::from_config(&config, Arc::new(Mutex::new(storage)))?;
///
/// blog_harvester::api::start_api_server(Arc::new(orchestrator), config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(orchestrator: Arc<Orchestrator>, config: Arc<Config>) -> Result<()> {
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(orchestrator, config);

    let listener = TcpListener::bind(&bind_address).await?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| HarvestError::ApiServer(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

#[cfg(test)]
mod tests;
