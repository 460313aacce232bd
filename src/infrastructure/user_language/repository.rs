//! In-memory user-language association repository
//!
//! Enforces the persistence-level guards the Postgres schema provides:
//! (user_id, language_id) uniqueness and at most one native row per user.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::user_language::{UserLanguage, UserLanguageRepository};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct InMemoryUserLanguageRepository {
    associations: RwLock<HashMap<i64, UserLanguage>>,
    next_id: AtomicI64,
}

impl InMemoryUserLanguageRepository {
    pub fn new() -> Self {
        Self {
            associations: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryUserLanguageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserLanguageRepository for InMemoryUserLanguageRepository {
    async fn save(&self, user_language: UserLanguage) -> Result<UserLanguage, DomainError> {
        let mut associations = self.associations.write().await;

        let (id, user_language) = match user_language.id() {
            Some(id) => {
                if !associations.contains_key(&id) {
                    return Err(DomainError::language_not_added(
                        user_language.user_id(),
                        user_language.language_id(),
                    ));
                }
                (id, user_language)
            }
            None => {
                let pair_exists = associations.values().any(|a| {
                    a.user_id() == user_language.user_id()
                        && a.language_id() == user_language.language_id()
                });

                if pair_exists {
                    return Err(DomainError::language_already_added(
                        user_language.user_id(),
                        user_language.language_id(),
                    ));
                }

                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                (id, user_language.with_id(id))
            }
        };

        if user_language.is_native() {
            let other_native = associations
                .values()
                .any(|a| a.user_id() == user_language.user_id() && a.is_native() && a.id() != Some(id));

            if other_native {
                return Err(DomainError::multiple_native_languages(
                    user_language.user_id(),
                ));
            }
        }

        associations.insert(id, user_language.clone());
        Ok(user_language)
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<UserLanguage>, DomainError> {
        let associations = self.associations.read().await;
        let mut result: Vec<UserLanguage> = associations
            .values()
            .filter(|a| a.user_id() == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|a| a.id());
        Ok(result)
    }

    async fn find_by_user_id_and_language_id(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<Option<UserLanguage>, DomainError> {
        let associations = self.associations.read().await;
        Ok(associations
            .values()
            .find(|a| a.user_id() == user_id && a.language_id() == language_id)
            .cloned())
    }

    async fn find_native_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Option<UserLanguage>, DomainError> {
        let associations = self.associations.read().await;
        Ok(associations
            .values()
            .find(|a| a.user_id() == user_id && a.is_native())
            .cloned())
    }

    async fn find_learning_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Vec<UserLanguage>, DomainError> {
        let associations = self.associations.read().await;
        let mut result: Vec<UserLanguage> = associations
            .values()
            .filter(|a| a.user_id() == user_id && a.is_learning())
            .cloned()
            .collect();
        result.sort_by_key(|a| a.id());
        Ok(result)
    }

    async fn delete_by_user_id_and_language_id(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<(), DomainError> {
        let mut associations = self.associations.write().await;
        associations.retain(|_, a| !(a.user_id() == user_id && a.language_id() == language_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_assigns_id_and_enforces_pair_uniqueness() {
        let repo = InMemoryUserLanguageRepository::new();

        let saved = repo
            .save(UserLanguage::learning(1, 5).unwrap())
            .await
            .unwrap();
        assert_eq!(saved.id(), Some(1));

        let duplicate = repo.save(UserLanguage::learning(1, 5).unwrap()).await;
        assert!(matches!(
            duplicate,
            Err(DomainError::LanguageAlreadyAdded {
                user_id: 1,
                language_id: 5
            })
        ));
    }

    #[tokio::test]
    async fn test_store_rejects_second_native_row() {
        let repo = InMemoryUserLanguageRepository::new();

        repo.save(UserLanguage::native(1, 5).unwrap()).await.unwrap();
        let second = repo.save(UserLanguage::native(1, 7).unwrap()).await;

        assert!(matches!(
            second,
            Err(DomainError::MultipleNativeLanguages { user_id: 1 })
        ));
    }

    #[tokio::test]
    async fn test_update_same_row_native_flag_is_allowed() {
        let repo = InMemoryUserLanguageRepository::new();

        let saved = repo
            .save(UserLanguage::learning(1, 5).unwrap())
            .await
            .unwrap();
        let promoted = repo.save(saved.as_native()).await.unwrap();

        assert!(promoted.is_native());
        assert_eq!(promoted.id(), Some(1));
    }

    #[tokio::test]
    async fn test_native_and_learning_projections() {
        let repo = InMemoryUserLanguageRepository::new();

        let first = repo
            .save(UserLanguage::learning(1, 5).unwrap())
            .await
            .unwrap();
        repo.save(UserLanguage::learning(1, 7).unwrap()).await.unwrap();
        repo.save(first.as_native()).await.unwrap();
        repo.save(UserLanguage::learning(2, 5).unwrap()).await.unwrap();

        let native = repo.find_native_by_user_id(1).await.unwrap().unwrap();
        assert_eq!(native.language_id(), 5);

        let learning = repo.find_learning_by_user_id(1).await.unwrap();
        assert_eq!(learning.len(), 1);
        assert_eq!(learning[0].language_id(), 7);

        assert_eq!(repo.find_by_user_id(1).await.unwrap().len(), 2);
        assert!(repo.find_native_by_user_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = InMemoryUserLanguageRepository::new();
        repo.save(UserLanguage::learning(1, 5).unwrap()).await.unwrap();

        repo.delete_by_user_id_and_language_id(1, 5).await.unwrap();
        repo.delete_by_user_id_and_language_id(1, 5).await.unwrap();

        assert!(repo
            .find_by_user_id_and_language_id(1, 5)
            .await
            .unwrap()
            .is_none());
    }
}
