//! Application state for shared services

use std::sync::Arc;

use crate::domain::language::{Language, LanguageRepository};
use crate::domain::user::{User, UserRepository};
use crate::domain::user_language::{UserLanguage, UserLanguageRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::{
    AuthService, AuthenticatedUser, JwtGenerator, OAuthLoginRequest, OAuthLoginResult,
};
use crate::infrastructure::language::LanguageCatalogService;
use crate::infrastructure::user::{
    PasswordHasher, RegisterUserRequest, UpdateProfileRequest, UserService,
};
use crate::infrastructure::user_language::UserLanguageService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub catalog_service: Arc<dyn CatalogServiceTrait>,
    pub user_language_service: Arc<dyn UserLanguageServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<dyn AuthServiceTrait>,
        user_service: Arc<dyn UserServiceTrait>,
        catalog_service: Arc<dyn CatalogServiceTrait>,
        user_language_service: Arc<dyn UserLanguageServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            catalog_service,
            user_language_service,
            jwt_service,
        }
    }
}

/// Trait for the login flows
#[async_trait::async_trait]
pub trait AuthServiceTrait: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, DomainError>;
    async fn login_with_oauth(
        &self,
        request: OAuthLoginRequest,
    ) -> Result<OAuthLoginResult, DomainError>;
}

/// Trait for account management operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError>;
    async fn get(&self, id: i64) -> Result<Option<User>, DomainError>;
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn list(&self) -> Result<Vec<User>, DomainError>;
    async fn update_profile(
        &self,
        id: i64,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError>;
    async fn activate(&self, id: i64) -> Result<User, DomainError>;
    async fn deactivate(&self, id: i64) -> Result<User, DomainError>;
    async fn change_password(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<User, DomainError>;
    async fn change_email(&self, id: i64, new_email: &str) -> Result<User, DomainError>;
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

/// Trait for catalog queries
#[async_trait::async_trait]
pub trait CatalogServiceTrait: Send + Sync {
    async fn list(&self) -> Result<Vec<Language>, DomainError>;
    async fn get(&self, id: i64) -> Result<Option<Language>, DomainError>;
    async fn get_by_code(&self, code: &str) -> Result<Option<Language>, DomainError>;
    async fn starting_languages(&self) -> Result<Vec<Language>, DomainError>;
    async fn search(&self, term: &str) -> Result<Vec<Language>, DomainError>;
}

/// Trait for the user-language manager
#[async_trait::async_trait]
pub trait UserLanguageServiceTrait: Send + Sync {
    async fn add_language_to_user(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<UserLanguage, DomainError>;
    async fn set_native_language(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<UserLanguage, DomainError>;
    async fn remove_language_from_user(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<(), DomainError>;
    async fn get_user_languages(&self, user_id: i64) -> Result<Vec<UserLanguage>, DomainError>;
    async fn get_native_language(&self, user_id: i64)
        -> Result<Option<UserLanguage>, DomainError>;
    async fn get_learning_languages(&self, user_id: i64)
        -> Result<Vec<UserLanguage>, DomainError>;
}

// Implement the traits for the actual services

#[async_trait::async_trait]
impl<R, H, J> AuthServiceTrait for AuthService<R, H, J>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
    J: JwtGenerator + 'static,
{
    async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, DomainError> {
        AuthService::login(self, email, password).await
    }

    async fn login_with_oauth(
        &self,
        request: OAuthLoginRequest,
    ) -> Result<OAuthLoginResult, DomainError> {
        AuthService::login_with_oauth(self, request).await
    }
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn get(&self, id: i64) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        UserService::get_by_email(self, email).await
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        UserService::list(self).await
    }

    async fn update_profile(
        &self,
        id: i64,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        UserService::update_profile(self, id, request).await
    }

    async fn activate(&self, id: i64) -> Result<User, DomainError> {
        UserService::activate(self, id).await
    }

    async fn deactivate(&self, id: i64) -> Result<User, DomainError> {
        UserService::deactivate(self, id).await
    }

    async fn change_password(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<User, DomainError> {
        UserService::change_password(self, id, current_password, new_password).await
    }

    async fn change_email(&self, id: i64, new_email: &str) -> Result<User, DomainError> {
        UserService::change_email(self, id, new_email).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        UserService::delete(self, id).await
    }
}

#[async_trait::async_trait]
impl<R: LanguageRepository + 'static> CatalogServiceTrait for LanguageCatalogService<R> {
    async fn list(&self) -> Result<Vec<Language>, DomainError> {
        LanguageCatalogService::list(self).await
    }

    async fn get(&self, id: i64) -> Result<Option<Language>, DomainError> {
        LanguageCatalogService::get(self, id).await
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<Language>, DomainError> {
        LanguageCatalogService::get_by_code(self, code).await
    }

    async fn starting_languages(&self) -> Result<Vec<Language>, DomainError> {
        LanguageCatalogService::starting_languages(self).await
    }

    async fn search(&self, term: &str) -> Result<Vec<Language>, DomainError> {
        LanguageCatalogService::search(self, term).await
    }
}

#[async_trait::async_trait]
impl<UL, L, U> UserLanguageServiceTrait for UserLanguageService<UL, L, U>
where
    UL: UserLanguageRepository + 'static,
    L: LanguageRepository + 'static,
    U: UserRepository + 'static,
{
    async fn add_language_to_user(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<UserLanguage, DomainError> {
        UserLanguageService::add_language_to_user(self, user_id, language_id).await
    }

    async fn set_native_language(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<UserLanguage, DomainError> {
        UserLanguageService::set_native_language(self, user_id, language_id).await
    }

    async fn remove_language_from_user(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<(), DomainError> {
        UserLanguageService::remove_language_from_user(self, user_id, language_id).await
    }

    async fn get_user_languages(&self, user_id: i64) -> Result<Vec<UserLanguage>, DomainError> {
        UserLanguageService::get_user_languages(self, user_id).await
    }

    async fn get_native_language(
        &self,
        user_id: i64,
    ) -> Result<Option<UserLanguage>, DomainError> {
        UserLanguageService::get_native_language(self, user_id).await
    }

    async fn get_learning_languages(
        &self,
        user_id: i64,
    ) -> Result<Vec<UserLanguage>, DomainError> {
        UserLanguageService::get_learning_languages(self, user_id).await
    }
}
