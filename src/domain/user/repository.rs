//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::User;
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// `save` upserts: a user without an id is inserted and returned with the
/// store-assigned id, a user with an id replaces the stored record.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Persist a user, assigning an id on first save
    async fn save(&self, user: User) -> Result<User, DomainError>;

    /// Get a user by id
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;

    /// Get a user by email (for login)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// List all users
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// Delete a user by id, reporting whether a record was removed
    async fn delete_by_id(&self, id: i64) -> Result<bool, DomainError>;

    /// Check whether an email is already registered
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
