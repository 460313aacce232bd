//! Language catalog endpoints (read-only, open)

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::language::Language;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_languages))
        .route("/{id}", get(get_language))
        .route("/code/{code}", get(get_language_by_code))
        .route("/starting", get(get_starting_languages))
        .route("/search", get(search_languages))
}

/// A catalog entry returned to clients
#[derive(Debug, Serialize)]
pub struct LanguageResponse {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub flag_url: String,
    pub created_at: DateTime<Utc>,
}

impl LanguageResponse {
    fn from_language(language: &Language) -> Self {
        Self {
            id: language.id().unwrap_or_default(),
            name: language.name().to_string(),
            code: language.code().to_string(),
            flag_url: language.flag_url().to_string(),
            created_at: language.created_at(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
}

/// GET /languages
async fn list_languages(
    State(state): State<AppState>,
) -> Result<Json<Vec<LanguageResponse>>, ApiError> {
    let languages = state.catalog_service.list().await?;
    Ok(Json(
        languages.iter().map(LanguageResponse::from_language).collect(),
    ))
}

/// GET /languages/{id}
async fn get_language(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LanguageResponse>, ApiError> {
    let language = state
        .catalog_service
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Language with id {id} not found")))?;

    Ok(Json(LanguageResponse::from_language(&language)))
}

/// GET /languages/code/{code}
async fn get_language_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LanguageResponse>, ApiError> {
    let language = state
        .catalog_service
        .get_by_code(&code)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Language with code '{code}' not found")))?;

    Ok(Json(LanguageResponse::from_language(&language)))
}

/// GET /languages/starting
async fn get_starting_languages(
    State(state): State<AppState>,
) -> Result<Json<Vec<LanguageResponse>>, ApiError> {
    let languages = state.catalog_service.starting_languages().await?;
    Ok(Json(
        languages.iter().map(LanguageResponse::from_language).collect(),
    ))
}

/// GET /languages/search?q=term
async fn search_languages(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<LanguageResponse>>, ApiError> {
    let languages = state.catalog_service.search(&params.q).await?;
    Ok(Json(
        languages.iter().map(LanguageResponse::from_language).collect(),
    ))
}
