//! User-language association endpoints, nested under /users

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user_language::UserLanguage;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/languages", get(get_user_languages).post(add_language))
        .route("/{id}/languages/native", get(get_native_language))
        .route("/{id}/languages/learning", get(get_learning_languages))
        .route("/{id}/languages/{language_id}/native", patch(set_native))
        .route("/{id}/languages/{language_id}", delete(remove_language))
}

/// Request body for adding a language to a user
#[derive(Debug, Deserialize)]
pub struct AddLanguageRequest {
    pub language_id: i64,
}

/// A user-language association returned to clients
#[derive(Debug, Serialize)]
pub struct UserLanguageResponse {
    pub id: i64,
    pub user_id: i64,
    pub language_id: i64,
    pub is_native: bool,
    pub added_at: DateTime<Utc>,
}

impl UserLanguageResponse {
    pub fn from_entity(association: &UserLanguage) -> Self {
        Self {
            id: association.id().unwrap_or_default(),
            user_id: association.user_id(),
            language_id: association.language_id(),
            is_native: association.is_native(),
            added_at: association.added_at(),
        }
    }
}

/// GET /users/{user_id}/languages
async fn get_user_languages(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<UserLanguageResponse>>, ApiError> {
    let associations = state
        .user_language_service
        .get_user_languages(user_id)
        .await?;

    Ok(Json(
        associations
            .iter()
            .map(UserLanguageResponse::from_entity)
            .collect(),
    ))
}

/// POST /users/{user_id}/languages
async fn add_language(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path(user_id): Path<i64>,
    Json(request): Json<AddLanguageRequest>,
) -> Result<(StatusCode, Json<UserLanguageResponse>), ApiError> {
    let association = state
        .user_language_service
        .add_language_to_user(user_id, request.language_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserLanguageResponse::from_entity(&association)),
    ))
}

/// GET /users/{user_id}/languages/native
///
/// "No native language set" is an ordinary domain state; at the HTTP layer
/// it surfaces as 404.
async fn get_native_language(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserLanguageResponse>, ApiError> {
    let native = state
        .user_language_service
        .get_native_language(user_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("User {user_id} has no native language set"))
        })?;

    Ok(Json(UserLanguageResponse::from_entity(&native)))
}

/// GET /users/{user_id}/languages/learning
async fn get_learning_languages(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<UserLanguageResponse>>, ApiError> {
    let associations = state
        .user_language_service
        .get_learning_languages(user_id)
        .await?;

    Ok(Json(
        associations
            .iter()
            .map(UserLanguageResponse::from_entity)
            .collect(),
    ))
}

/// PATCH /users/{user_id}/languages/{language_id}/native
async fn set_native(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path((user_id, language_id)): Path<(i64, i64)>,
) -> Result<Json<UserLanguageResponse>, ApiError> {
    let association = state
        .user_language_service
        .set_native_language(user_id, language_id)
        .await?;

    Ok(Json(UserLanguageResponse::from_entity(&association)))
}

/// DELETE /users/{user_id}/languages/{language_id}
async fn remove_language(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path((user_id, language_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state
        .user_language_service
        .remove_language_from_user(user_id, language_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_from_entity() {
        let association = UserLanguage::learning(1, 5).unwrap().with_id(9);
        let response = UserLanguageResponse::from_entity(&association);

        assert_eq!(response.id, 9);
        assert_eq!(response.user_id, 1);
        assert_eq!(response.language_id, 5);
        assert!(!response.is_native);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"is_native\":false"));
    }
}
