use thiserror::Error;

/// Core domain errors
///
/// Every variant is a caller-recoverable business-rule violation. The API
/// layer maps them to HTTP statuses; the domain never swallows or retries.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("User with id {user_id} not found")]
    UserNotFound { user_id: i64 },

    #[error("Language with id {language_id} not found in the catalog")]
    LanguageNotFound { language_id: i64 },

    #[error("User {user_id} already has language {language_id}")]
    LanguageAlreadyAdded { user_id: i64, language_id: i64 },

    #[error("Language {language_id} has not been added to user {user_id}")]
    LanguageNotAddedToUser { user_id: i64, language_id: i64 },

    #[error("Language {language_id} is the native language of user {user_id} and cannot be removed")]
    NativeLanguageCannotBeRemoved { user_id: i64, language_id: i64 },

    #[error("User {user_id} already has a native language; only one is allowed")]
    MultipleNativeLanguages { user_id: i64 },

    // Deliberately uniform: the message must not reveal whether the email
    // exists, the account is inactive, or the password was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials { email: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn user_not_found(user_id: i64) -> Self {
        Self::UserNotFound { user_id }
    }

    pub fn language_not_found(language_id: i64) -> Self {
        Self::LanguageNotFound { language_id }
    }

    pub fn language_already_added(user_id: i64, language_id: i64) -> Self {
        Self::LanguageAlreadyAdded {
            user_id,
            language_id,
        }
    }

    pub fn language_not_added(user_id: i64, language_id: i64) -> Self {
        Self::LanguageNotAddedToUser {
            user_id,
            language_id,
        }
    }

    pub fn native_language_cannot_be_removed(user_id: i64, language_id: i64) -> Self {
        Self::NativeLanguageCannotBeRemoved {
            user_id,
            language_id,
        }
    }

    pub fn multiple_native_languages(user_id: i64) -> Self {
        Self::MultipleNativeLanguages { user_id }
    }

    pub fn invalid_credentials(email: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            email: email.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
