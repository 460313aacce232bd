//! Account management endpoints
//!
//! Everything here requires a valid session token; self-registration
//! without one lives under /auth.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::api::user_languages::UserLanguageResponse;
use crate::domain::user::{User, UserRole};
use crate::infrastructure::user::{RegisterUserRequest, UpdateProfileRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/email/{email}", get(get_user_by_email))
        .route("/{id}/activate", patch(activate_user))
        .route("/{id}/deactivate", patch(deactivate_user))
        .route("/{id}/password", patch(change_password))
        .route("/{id}/email", patch(change_email))
        .route("/{id}/profile", get(get_user_profile))
}

/// Request body for creating a user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Request body for updating profile fields
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Option<Vec<UserRole>>,
}

/// Request body for changing the password
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Request body for changing the login email
#[derive(Debug, Deserialize)]
pub struct ChangeEmailRequest {
    pub new_email: String,
}

/// Public part of a user returned to clients
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_seed: String,
    pub roles: Vec<UserRole>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id().unwrap_or_default(),
            email: user.email().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            avatar_seed: user.avatar_seed().to_string(),
            roles: user.roles().iter().copied().collect(),
            status: format!("{:?}", user.status()).to_lowercase(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// User together with their language associations
#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub languages: Vec<UserLanguageResponse>,
}

async fn list_users(
    State(state): State<AppState>,
    _auth: RequireUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.user_service.list().await?;
    Ok(Json(users.iter().map(UserResponse::from_user).collect()))
}

async fn create_user(
    State(state): State<AppState>,
    _auth: RequireUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

async fn get_user(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User with id {id} not found")))?;

    Ok(Json(UserResponse::from_user(&user)))
}

async fn get_user_by_email(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .get_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User with email {email} not found")))?;

    Ok(Json(UserResponse::from_user(&user)))
}

async fn update_user(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .update_profile(
            id,
            UpdateProfileRequest {
                first_name: request.first_name,
                last_name: request.last_name,
                roles: request.roles.map(|roles| roles.into_iter().collect()),
            },
        )
        .await?;

    Ok(Json(UserResponse::from_user(&user)))
}

async fn delete_user(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.user_service.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("User with id {id} not found")))
    }
}

async fn activate_user(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.user_service.activate(id).await?;
    Ok(Json(UserResponse::from_user(&user)))
}

async fn deactivate_user(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.user_service.deactivate(id).await?;
    Ok(Json(UserResponse::from_user(&user)))
}

async fn change_password(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path(id): Path<i64>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .change_password(id, &request.current_password, &request.new_password)
        .await?;

    Ok(Json(UserResponse::from_user(&user)))
}

async fn change_email(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path(id): Path<i64>,
    Json(request): Json<ChangeEmailRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.user_service.change_email(id, &request.new_email).await?;
    Ok(Json(UserResponse::from_user(&user)))
}

async fn get_user_profile(
    State(state): State<AppState>,
    _auth: RequireUser,
    Path(id): Path<i64>,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let user = state
        .user_service
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User with id {id} not found")))?;

    let languages = state.user_language_service.get_user_languages(id).await?;

    Ok(Json(UserProfileResponse {
        user: UserResponse::from_user(&user),
        languages: languages.iter().map(UserLanguageResponse::from_entity).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserRole;

    #[test]
    fn test_user_response_from_user() {
        let user = User::new(
            "alice@example.com",
            "hash",
            "Alice",
            "Moreno",
            "seed",
            UserRole::Learner,
        )
        .with_id(3);

        let response = UserResponse::from_user(&user);

        assert_eq!(response.id, 3);
        assert_eq!(response.status, "active");
        assert_eq!(response.roles, vec![UserRole::Learner]);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("alice@example.com"));
        assert!(!json.contains("hash\""));
    }
}
