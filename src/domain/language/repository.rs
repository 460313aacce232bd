//! Language catalog repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::Language;
use crate::domain::DomainError;

/// Repository trait for the language catalog
#[async_trait]
pub trait LanguageRepository: Send + Sync + Debug {
    /// Persist a catalog entry, assigning an id on first save
    async fn save(&self, language: Language) -> Result<Language, DomainError>;

    /// All languages, ordered alphabetically by name
    async fn find_all(&self) -> Result<Vec<Language>, DomainError>;

    /// Get a language by id
    async fn find_by_id(&self, id: i64) -> Result<Option<Language>, DomainError>;

    /// Get a language by ISO 639-1 code, case-insensitively
    async fn find_by_code(&self, code: &str) -> Result<Option<Language>, DomainError>;

    /// Languages whose name contains the term, case-insensitively
    async fn search_by_name(&self, term: &str) -> Result<Vec<Language>, DomainError>;

    /// Number of catalog entries
    async fn count(&self) -> Result<u64, DomainError>;

    /// Check whether a language id exists
    async fn exists_by_id(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
