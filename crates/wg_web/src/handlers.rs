use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use wg_core::{ArticleSummary, GatewayError, Language, SearchLimit, SearchResult};

use crate::error::ApiError;
use crate::AppState;

pub const SERVICE_NAME: &str = "Wikipedia API Wrapper";

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RandomParams {
    pub language: Option<String>,
}

pub async fn root() -> Json<RootResponse> {
    info!("Root endpoint requested");
    Json(RootResponse {
        message: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        backend: state.gateway.backend_name().to_string(),
    })
}

pub async fn search_articles(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResult>, ApiError> {
    let Path(query) = path?;
    let Query(params) = params?;
    let limit = params
        .limit
        .map(SearchLimit::clamped)
        .unwrap_or_default();
    info!("API request: search {:?} with limit {}", query, limit.get());

    Ok(Json(state.gateway.search(&query, limit).await?))
}

pub async fn get_article_summary(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ArticleSummary>, ApiError> {
    let Path(title) = path?;
    info!("API request: summary of {:?}", title);
    Ok(Json(state.gateway.summary(&title).await?))
}

pub async fn get_random_article(
    State(state): State<Arc<AppState>>,
    params: Result<Query<RandomParams>, QueryRejection>,
) -> Result<Json<ArticleSummary>, ApiError> {
    let Query(params) = params?;
    let language = match params.language.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(code) => Some(
            code.parse::<Language>()
                .map_err(|_| GatewayError::InvalidLanguage(code.to_string()))?,
        ),
    };
    info!(
        "API request: random article in {}",
        language.as_ref().unwrap_or(state.gateway.default_language())
    );

    Ok(Json(state.gateway.random(language.as_ref()).await?))
}
