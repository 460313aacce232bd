//! User-language association repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::UserLanguage;
use crate::domain::DomainError;

/// Repository trait for user-language associations
///
/// The store is expected to keep (user_id, language_id) unique and to give
/// multi-write operations a per-user serialization point (a transaction or
/// row lock keyed on user_id); the service layer relies on that when it
/// demotes one association and promotes another.
#[async_trait]
pub trait UserLanguageRepository: Send + Sync + Debug {
    /// Persist an association, assigning an id on first save
    async fn save(&self, user_language: UserLanguage) -> Result<UserLanguage, DomainError>;

    /// All associations of a user, native and learning
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<UserLanguage>, DomainError>;

    /// The association for a specific pair, if any
    async fn find_by_user_id_and_language_id(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<Option<UserLanguage>, DomainError>;

    /// The user's native association, if one is set
    async fn find_native_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Option<UserLanguage>, DomainError>;

    /// The user's learning associations (is_native = false)
    async fn find_learning_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Vec<UserLanguage>, DomainError>;

    /// Delete the association for a pair; absent pairs are a no-op
    async fn delete_by_user_id_and_language_id(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<(), DomainError>;

    /// Check whether the pair already has an association
    async fn exists_by_user_id_and_language_id(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<bool, DomainError> {
        Ok(self
            .find_by_user_id_and_language_id(user_id, language_id)
            .await?
            .is_some())
    }
}
