use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{Movie, ResolveOutcome};
use crate::services::{catalog, resolve};

use super::AppState;

// Request/Response types

/// Raw query string pairs, in the order they were sent
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<Movie>,
}

/// Query parameters are required but unvalidated: any string, even empty,
/// is accepted and a repeated parameter keeps its last value. Only an absent
/// parameter or an unparseable query string is rejected.
fn required(params: QueryPairs, name: &str) -> AppResult<String> {
    let Query(pairs) = params.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    pairs
        .into_iter()
        .rev()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
        .ok_or_else(|| AppError::InvalidInput(format!("missing query parameter `{}`", name)))
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Trending movies (IMDB Top 250, first 20)
pub async fn trending(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<ResultsResponse>> {
    let results = catalog::trending(state.scraper.as_ref())
        .await
        .inspect_err(|e| tracing::error!(request_id = %request_id, error = %e, "Trending fetch failed"))?;

    Ok(Json(ResultsResponse { results }))
}

/// Recently released movies (first 20)
pub async fn recent(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<ResultsResponse>> {
    let results = catalog::recent(state.scraper.as_ref())
        .await
        .inspect_err(|e| tracing::error!(request_id = %request_id, error = %e, "Recent fetch failed"))?;

    Ok(Json(ResultsResponse { results }))
}

/// Free-text movie search
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    params: QueryPairs,
) -> AppResult<Json<ResultsResponse>> {
    let q = required(params, "q")?;

    tracing::info!(request_id = %request_id, query = %q, "Processing search request");

    let results = catalog::search(state.scraper.as_ref(), &q)
        .await
        .inspect_err(|e| tracing::error!(request_id = %request_id, error = %e, "Search failed"))?;

    Ok(Json(ResultsResponse { results }))
}

/// Resolve a movie into stream links, or an embed fallback
pub async fn resolve(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    params: QueryPairs,
) -> AppResult<Json<ResolveOutcome>> {
    let movie_id = required(params, "movie_id")?;

    tracing::info!(request_id = %request_id, movie_id = %movie_id, "Processing resolve request");

    let outcome = resolve::resolve(state.scraper.as_ref(), &movie_id, &state.fallback).await;

    tracing::info!(
        request_id = %request_id,
        source = %outcome.source(),
        fallback = outcome.is_fallback(),
        "Resolve completed"
    );

    Ok(Json(outcome))
}
