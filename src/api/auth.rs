//! Authentication endpoints
//!
//! Login, self-registration and the OAuth upsert flow; all open, except
//! /me which requires the token it inspects.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::api::users::UserResponse;
use crate::domain::user::{AuthProvider, User};
use crate::infrastructure::auth::OAuthLoginRequest;
use crate::infrastructure::user::RegisterUserRequest;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/oauth", post(oauth_login))
        .route("/me", get(get_current_user))
}

/// Request body for credential login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for self-registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Identity assertion from an OAuth callback
#[derive(Debug, Deserialize)]
pub struct OAuthRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub provider: AuthProvider,
    pub provider_id: String,
}

/// Response returned after a successful login or registration
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new_user: Option<bool>,
}

impl LoginResponse {
    fn new(token: String, user: &User) -> Self {
        Self {
            token,
            user_id: user.id().unwrap_or_default(),
            email: user.email().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            is_new_user: None,
        }
    }

    fn with_is_new_user(mut self, is_new_user: bool) -> Self {
        self.is_new_user = Some(is_new_user);
        self
    }
}

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let authenticated = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse::new(
        authenticated.token,
        &authenticated.user,
    )))
}

/// POST /auth/register
///
/// Creates the account and logs it in right away.
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
        })
        .await?;

    let token = state.jwt_service.generate(&user)?;

    Ok((StatusCode::CREATED, Json(LoginResponse::new(token, &user))))
}

/// POST /auth/oauth
///
/// Upsert login: 201 when the assertion created an account, 200 otherwise.
async fn oauth_login(
    State(state): State<AppState>,
    Json(request): Json<OAuthRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    let result = state
        .auth_service
        .login_with_oauth(OAuthLoginRequest {
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            provider: request.provider,
            provider_id: request.provider_id,
        })
        .await?;

    let status = if result.is_new_user {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let response = LoginResponse::new(result.token, &result.user)
        .with_is_new_user(result.is_new_user);

    Ok((status, Json(response)))
}

/// GET /auth/me
async fn get_current_user(RequireUser(user): RequireUser) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(UserResponse::from_user(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserRole;

    #[test]
    fn test_login_response_serialization() {
        let user = User::new(
            "alice@example.com",
            "hash",
            "Alice",
            "Moreno",
            "seed",
            UserRole::Learner,
        )
        .with_id(1);

        let response = LoginResponse::new("token-123".to_string(), &user);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("token-123"));
        assert!(json.contains("\"user_id\":1"));
        // absent flag is omitted entirely
        assert!(!json.contains("is_new_user"));

        let with_flag = LoginResponse::new("t".to_string(), &user).with_is_new_user(true);
        let json = serde_json::to_string(&with_flag).unwrap();
        assert!(json.contains("\"is_new_user\":true"));
    }
}
