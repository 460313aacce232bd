//! In-memory language catalog repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::language::{Language, LanguageRepository};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct InMemoryLanguageRepository {
    languages: RwLock<HashMap<i64, Language>>,
    next_id: AtomicI64,
}

impl InMemoryLanguageRepository {
    pub fn new() -> Self {
        Self {
            languages: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryLanguageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageRepository for InMemoryLanguageRepository {
    async fn save(&self, language: Language) -> Result<Language, DomainError> {
        let mut languages = self.languages.write().await;

        let (id, language) = match language.id() {
            Some(id) => {
                if !languages.contains_key(&id) {
                    return Err(DomainError::language_not_found(id));
                }
                (id, language)
            }
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                (id, language.with_id(id))
            }
        };

        let code_taken = languages
            .values()
            .any(|l| l.code() == language.code() && l.id() != Some(id));

        if code_taken {
            return Err(DomainError::conflict(format!(
                "Language code '{}' already exists",
                language.code()
            )));
        }

        languages.insert(id, language.clone());
        Ok(language)
    }

    async fn find_all(&self) -> Result<Vec<Language>, DomainError> {
        let languages = self.languages.read().await;
        let mut all: Vec<Language> = languages.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(all)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Language>, DomainError> {
        let languages = self.languages.read().await;
        Ok(languages.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Language>, DomainError> {
        let code = code.to_lowercase();
        let languages = self.languages.read().await;
        Ok(languages.values().find(|l| l.code() == code).cloned())
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Language>, DomainError> {
        let term = term.to_lowercase();
        let languages = self.languages.read().await;

        let mut matches: Vec<Language> = languages
            .values()
            .filter(|l| l.name().to_lowercase().contains(&term))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(matches)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let languages = self.languages.read().await;
        Ok(languages.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_repo() -> InMemoryLanguageRepository {
        let repo = InMemoryLanguageRepository::new();
        for (name, code) in [("Spanish", "es"), ("French", "fr"), ("German", "de")] {
            let language = Language::new(name, code, format!("https://flagcdn.com/{code}.svg"))
                .unwrap();
            repo.save(language).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_find_all_is_alphabetical() {
        let repo = seeded_repo().await;

        let all = repo.find_all().await.unwrap();
        let names: Vec<&str> = all.iter().map(|l| l.name()).collect();

        assert_eq!(names, vec!["French", "German", "Spanish"]);
    }

    #[tokio::test]
    async fn test_find_by_code_is_case_insensitive() {
        let repo = seeded_repo().await;

        let found = repo.find_by_code("ES").await.unwrap().unwrap();
        assert_eq!(found.name(), "Spanish");
    }

    #[tokio::test]
    async fn test_duplicate_code_is_rejected() {
        let repo = seeded_repo().await;

        let duplicate = Language::new("Castilian", "es", "url").unwrap();
        let result = repo.save(duplicate).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let repo = seeded_repo().await;

        let matches = repo.search_by_name("an").await.unwrap();
        let names: Vec<&str> = matches.iter().map(|l| l.name()).collect();

        assert_eq!(names, vec!["German", "Spanish"]);
        assert!(repo.search_by_name("xx").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_and_exists() {
        let repo = seeded_repo().await;

        assert_eq!(repo.count().await.unwrap(), 3);
        assert!(repo.exists_by_id(1).await.unwrap());
        assert!(!repo.exists_by_id(99).await.unwrap());
    }
}
