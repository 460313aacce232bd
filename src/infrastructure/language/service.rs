//! Read-only language catalog service

use std::sync::Arc;

use crate::domain::language::{Language, LanguageRepository};
use crate::domain::DomainError;

/// Number of catalog entries returned as a starting list when no ids are
/// configured
const STARTING_FALLBACK_LIMIT: usize = 10;

/// Catalog queries used by the API and by the association manager.
///
/// The recommended starting list comes from configuration rather than a
/// constant baked into the code; missing ids are skipped silently.
#[derive(Debug)]
pub struct LanguageCatalogService<R: LanguageRepository> {
    repository: Arc<R>,
    starting_language_ids: Vec<i64>,
}

impl<R: LanguageRepository> LanguageCatalogService<R> {
    pub fn new(repository: Arc<R>, starting_language_ids: Vec<i64>) -> Self {
        Self {
            repository,
            starting_language_ids,
        }
    }

    pub async fn list(&self) -> Result<Vec<Language>, DomainError> {
        self.repository.find_all().await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Language>, DomainError> {
        self.repository.find_by_id(id).await
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Option<Language>, DomainError> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }
        self.repository.find_by_code(code).await
    }

    /// Recommended languages for new users, resolved from configured ids
    /// with a fallback to the first catalog entries
    pub async fn starting_languages(&self) -> Result<Vec<Language>, DomainError> {
        let mut starting = Vec::with_capacity(self.starting_language_ids.len());

        for id in &self.starting_language_ids {
            if let Some(language) = self.repository.find_by_id(*id).await? {
                starting.push(language);
            }
        }

        if starting.is_empty() {
            let mut all = self.repository.find_all().await?;
            all.truncate(STARTING_FALLBACK_LIMIT);
            return Ok(all);
        }

        Ok(starting)
    }

    pub async fn search(&self, term: &str) -> Result<Vec<Language>, DomainError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        self.repository.search_by_name(term).await
    }

    pub async fn exists(&self, id: i64) -> Result<bool, DomainError> {
        self.repository.exists_by_id(id).await
    }
}
