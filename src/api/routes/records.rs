//! Article and category handlers.

use crate::api::routes::ArticlesQuery;
use crate::api::AppState;
use crate::storage::{ArticleRecord, CategoryRecord, Storage};
use crate::HarvestError;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};

/// GET /categories - List categories ordered by title
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryRecord>>, HarvestError> {
    let categories = state.storage()?.list_categories()?;
    Ok(Json(categories))
}

/// GET /articles - List articles
///
/// With `?category=<title>` only that category's articles are listed; an
/// unknown category gives an empty list. With `?article=<id>` the single
/// article is returned instead of a list. Empty values are ignored.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticlesQuery>,
) -> Result<Response, HarvestError> {
    let storage = state.storage()?;

    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        let articles = storage.list_articles_by_category(category)?;
        return Ok(Json(articles).into_response());
    }

    if let Some(id) = query.article.as_deref().filter(|a| !a.is_empty()) {
        let article = storage.get_article_by_id(id)?;
        return Ok(Json(article).into_response());
    }

    Ok(Json(storage.list_articles()?).into_response())
}

/// GET /articles/:id - Get single article
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticleRecord>, HarvestError> {
    let article = state.storage()?.get_article_by_id(&id)?;
    Ok(Json(article))
}

/// POST /articles/:id/text - Re-fetch the article page and store its text
pub async fn refresh_article_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticleRecord>, HarvestError> {
    let article = state.orchestrator.refresh_article_text(&id).await?;
    Ok(Json(article))
}
