//! Read-through cache over a language repository
//!
//! The catalog is read-mostly (seeded at startup, queried on every
//! association check), so id lookups are cached with a TTL. Writes pass
//! through and flush the cache.

use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

use crate::domain::language::{Language, LanguageRepository};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct CachedLanguageRepository<R: LanguageRepository> {
    inner: R,
    by_id: Cache<i64, Language>,
}

impl<R: LanguageRepository> CachedLanguageRepository<R> {
    pub fn new(inner: R, ttl: Duration) -> Self {
        let by_id = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(1_000)
            .build();

        Self { inner, by_id }
    }

    pub fn entry_count(&self) -> u64 {
        self.by_id.entry_count()
    }
}

#[async_trait]
impl<R: LanguageRepository> LanguageRepository for CachedLanguageRepository<R> {
    async fn save(&self, language: Language) -> Result<Language, DomainError> {
        let saved = self.inner.save(language).await?;
        self.by_id.invalidate_all();
        Ok(saved)
    }

    async fn find_all(&self) -> Result<Vec<Language>, DomainError> {
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Language>, DomainError> {
        if let Some(cached) = self.by_id.get(&id).await {
            tracing::debug!(language_id = id, "catalog cache hit");
            return Ok(Some(cached));
        }

        let found = self.inner.find_by_id(id).await?;
        if let Some(language) = &found {
            self.by_id.insert(id, language.clone()).await;
        }

        Ok(found)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Language>, DomainError> {
        self.inner.find_by_code(code).await
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Language>, DomainError> {
        self.inner.search_by_name(term).await
    }

    async fn count(&self) -> Result<u64, DomainError> {
        self.inner.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::language::InMemoryLanguageRepository;

    async fn seeded_cache() -> CachedLanguageRepository<InMemoryLanguageRepository> {
        let inner = InMemoryLanguageRepository::new();
        inner
            .save(Language::new("Spanish", "es", "url").unwrap())
            .await
            .unwrap();
        CachedLanguageRepository::new(inner, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_find_by_id_populates_cache() {
        let repo = seeded_cache().await;

        let first = repo.find_by_id(1).await.unwrap().unwrap();
        let second = repo.find_by_id(1).await.unwrap().unwrap();

        assert_eq!(first, second);
        repo.by_id.run_pending_tasks().await;
        assert_eq!(repo.entry_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_cached() {
        let repo = seeded_cache().await;

        assert!(repo.find_by_id(99).await.unwrap().is_none());
        repo.by_id.run_pending_tasks().await;
        assert_eq!(repo.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_save_flushes_cache() {
        let repo = seeded_cache().await;
        repo.find_by_id(1).await.unwrap();

        repo.save(Language::new("French", "fr", "url").unwrap())
            .await
            .unwrap();

        repo.by_id.run_pending_tasks().await;
        assert_eq!(repo.entry_count(), 0);
    }
}
