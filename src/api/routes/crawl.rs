//! Crawl trigger and statistics handlers.

use crate::api::AppState;
use crate::crawler::CrawlReport;
use crate::output::{load_statistics, HarvestStatistics};
use crate::HarvestError;
use axum::{extract::State, response::Redirect, Json};

/// GET / - Record counts for the store
pub async fn index(
    State(state): State<AppState>,
) -> Result<Json<HarvestStatistics>, HarvestError> {
    let storage = state.storage()?;
    Ok(Json(load_statistics(&*storage)?))
}

/// POST /crawl - Run one crawl, then send the client back to `/`
///
/// The crawl completes before the redirect is sent; a failed crawl is a 500.
pub async fn trigger_crawl(State(state): State<AppState>) -> Result<Redirect, HarvestError> {
    state.orchestrator.crawl().await?;
    Ok(Redirect::to("/"))
}

/// POST /api/crawl - Run one crawl and return its report
pub async fn run_crawl(State(state): State<AppState>) -> Result<Json<CrawlReport>, HarvestError> {
    let report = state.orchestrator.crawl().await?;
    Ok(Json(report))
}
