//! HTTP error responses and the domain-error mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::DomainError;

/// JSON body returned for every error
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "Conflict", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            timestamp: Utc::now(),
            status: self.status.as_u16(),
            error: self.error,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();

        match err {
            DomainError::UserNotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "User Not Found", message)
            }
            DomainError::LanguageNotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "Language Not Found", message)
            }
            DomainError::LanguageAlreadyAdded { .. } => {
                Self::new(StatusCode::CONFLICT, "Language Already Added", message)
            }
            DomainError::LanguageNotAddedToUser { .. } => {
                Self::new(StatusCode::CONFLICT, "Language Not Added", message)
            }
            DomainError::NativeLanguageCannotBeRemoved { .. } => Self::new(
                StatusCode::CONFLICT,
                "Native Language Cannot Be Removed",
                message,
            ),
            DomainError::MultipleNativeLanguages { .. } => {
                Self::new(StatusCode::CONFLICT, "Multiple Native Languages", message)
            }
            DomainError::InvalidCredentials { .. } => {
                Self::new(StatusCode::UNAUTHORIZED, "Invalid Credentials", message)
            }
            DomainError::Validation { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "Validation Error", message)
            }
            DomainError::Conflict { .. } => Self::new(StatusCode::CONFLICT, "Conflict", message),
            DomainError::Storage { .. } | DomainError::Internal { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An unexpected error occurred".to_string(),
            ),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_mapping() {
        let err: ApiError = DomainError::user_not_found(1).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: ApiError = DomainError::language_not_found(2).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_mappings() {
        let conflicts = [
            DomainError::language_already_added(1, 5),
            DomainError::language_not_added(1, 5),
            DomainError::native_language_cannot_be_removed(1, 5),
            DomainError::multiple_native_languages(1),
            DomainError::conflict("duplicate"),
        ];

        for domain_err in conflicts {
            let err: ApiError = domain_err.into();
            assert_eq!(err.status, StatusCode::CONFLICT);
        }
    }

    #[test]
    fn test_invalid_credentials_maps_to_401() {
        let err: ApiError = DomainError::invalid_credentials("a@b.co").into();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Invalid credentials");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err: ApiError = DomainError::storage("connection refused to 10.0.0.5").into();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("10.0.0.5"));
    }

    #[test]
    fn test_error_response_serialization() {
        let err = ApiError::bad_request("Invalid email");
        let body = ErrorResponse {
            timestamp: Utc::now(),
            status: err.status.as_u16(),
            error: err.error.clone(),
            message: err.message.clone(),
        };

        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"status\":400"));
        assert!(json.contains("Invalid email"));
    }
}
