//! User-language manager
//!
//! Mediates every change to a user's language set. A pair moves through
//! absent -> learning -> native and back; it is created as learning, must
//! be demoted before removal, and at most one pair per user is native.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::language::LanguageRepository;
use crate::domain::user::UserRepository;
use crate::domain::user_language::{UserLanguage, UserLanguageRepository};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct UserLanguageService<UL, L, U>
where
    UL: UserLanguageRepository,
    L: LanguageRepository,
    U: UserRepository,
{
    user_languages: Arc<UL>,
    languages: Arc<L>,
    users: Arc<U>,
}

impl<UL, L, U> UserLanguageService<UL, L, U>
where
    UL: UserLanguageRepository,
    L: LanguageRepository,
    U: UserRepository,
{
    pub fn new(user_languages: Arc<UL>, languages: Arc<L>, users: Arc<U>) -> Self {
        Self {
            user_languages,
            languages,
            users,
        }
    }

    /// Add a catalog language to a user's set, as a learning language.
    ///
    /// The pair must not already exist; promotion to native is a separate
    /// step.
    pub async fn add_language_to_user(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<UserLanguage, DomainError> {
        self.require_user(user_id).await?;
        self.require_language(language_id).await?;

        if self
            .user_languages
            .exists_by_user_id_and_language_id(user_id, language_id)
            .await?
        {
            return Err(DomainError::language_already_added(user_id, language_id));
        }

        let association = UserLanguage::learning(user_id, language_id)?;
        let saved = self.user_languages.save(association).await?;

        info!(user_id, language_id, "language added to user");
        Ok(saved)
    }

    /// Mark an already-added language as the user's native language.
    ///
    /// Demotes the previous native association first, if it is a different
    /// language; promoting the current native language is a no-op. Both
    /// writes must be covered by the store's per-user serialization point.
    pub async fn set_native_language(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<UserLanguage, DomainError> {
        self.require_user(user_id).await?;
        self.require_language(language_id).await?;

        let association = self
            .user_languages
            .find_by_user_id_and_language_id(user_id, language_id)
            .await?
            .ok_or_else(|| DomainError::language_not_added(user_id, language_id))?;

        if let Some(current_native) = self.user_languages.find_native_by_user_id(user_id).await? {
            if current_native.language_id() == language_id {
                debug!(user_id, language_id, "language is already native");
                return Ok(current_native);
            }

            let demoted_id = current_native.language_id();
            self.user_languages.save(current_native.as_learning()).await?;
            debug!(user_id, language_id = demoted_id, "demoted previous native language");
        }

        let promoted = self.user_languages.save(association.as_native()).await?;

        info!(user_id, language_id, "native language set");
        Ok(promoted)
    }

    /// Remove a language from a user's set.
    ///
    /// Removing an absent pair is a silent no-op; removing the native
    /// language is refused until it has been replaced or demoted.
    pub async fn remove_language_from_user(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<(), DomainError> {
        self.require_user(user_id).await?;

        let association = match self
            .user_languages
            .find_by_user_id_and_language_id(user_id, language_id)
            .await?
        {
            Some(association) => association,
            None => {
                debug!(user_id, language_id, "remove skipped: language not associated");
                return Ok(());
            }
        };

        if association.is_native() {
            return Err(DomainError::native_language_cannot_be_removed(
                user_id,
                language_id,
            ));
        }

        self.user_languages
            .delete_by_user_id_and_language_id(user_id, language_id)
            .await?;

        info!(user_id, language_id, "language removed from user");
        Ok(())
    }

    /// All of a user's associations, native and learning
    pub async fn get_user_languages(&self, user_id: i64) -> Result<Vec<UserLanguage>, DomainError> {
        self.require_user(user_id).await?;
        self.user_languages.find_by_user_id(user_id).await
    }

    /// The user's native association, or `None` when no native language is
    /// set (that is an ordinary state, not an error)
    pub async fn get_native_language(
        &self,
        user_id: i64,
    ) -> Result<Option<UserLanguage>, DomainError> {
        self.require_user(user_id).await?;
        self.user_languages.find_native_by_user_id(user_id).await
    }

    /// The user's learning associations only
    pub async fn get_learning_languages(
        &self,
        user_id: i64,
    ) -> Result<Vec<UserLanguage>, DomainError> {
        self.require_user(user_id).await?;
        self.user_languages.find_learning_by_user_id(user_id).await
    }

    async fn require_user(&self, user_id: i64) -> Result<(), DomainError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::user_not_found(user_id));
        }
        Ok(())
    }

    async fn require_language(&self, language_id: i64) -> Result<(), DomainError> {
        if !self.languages.exists_by_id(language_id).await? {
            return Err(DomainError::language_not_found(language_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::language::Language;
    use crate::domain::user::{User, UserRole};
    use crate::infrastructure::language::InMemoryLanguageRepository;
    use crate::infrastructure::user::InMemoryUserRepository;
    use crate::infrastructure::user_language::InMemoryUserLanguageRepository;

    type TestService = UserLanguageService<
        InMemoryUserLanguageRepository,
        InMemoryLanguageRepository,
        InMemoryUserRepository,
    >;

    /// One user (id 1) and languages 1-10 seeded, matching the catalog ids
    /// used throughout the tests
    async fn create_service() -> TestService {
        let users = Arc::new(InMemoryUserRepository::new());
        let languages = Arc::new(InMemoryLanguageRepository::new());
        let user_languages = Arc::new(InMemoryUserLanguageRepository::new());

        users
            .save(User::new(
                "alice@example.com",
                "hash",
                "Alice",
                "Moreno",
                "seed",
                UserRole::Learner,
            ))
            .await
            .unwrap();

        let codes = ["aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av"];
        for (i, code) in codes.iter().enumerate() {
            languages
                .save(Language::new(format!("Language {}", i + 1), *code, "url").unwrap())
                .await
                .unwrap();
        }

        UserLanguageService::new(user_languages, languages, users)
    }

    #[tokio::test]
    async fn test_add_language() {
        let service = create_service().await;

        let added = service.add_language_to_user(1, 5).await.unwrap();

        assert_eq!(added.user_id(), 1);
        assert_eq!(added.language_id(), 5);
        assert!(!added.is_native());

        let all = service.get_user_languages(1).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].language_id(), 5);
        assert!(all[0].is_learning());
    }

    #[tokio::test]
    async fn test_add_language_twice_fails() {
        let service = create_service().await;

        service.add_language_to_user(1, 5).await.unwrap();
        let second = service.add_language_to_user(1, 5).await;

        assert!(matches!(
            second,
            Err(DomainError::LanguageAlreadyAdded {
                user_id: 1,
                language_id: 5
            })
        ));
    }

    #[tokio::test]
    async fn test_add_language_unknown_user() {
        let service = create_service().await;

        let result = service.add_language_to_user(99, 5).await;
        assert!(matches!(result, Err(DomainError::UserNotFound { user_id: 99 })));
    }

    #[tokio::test]
    async fn test_add_language_unknown_language() {
        let service = create_service().await;

        let result = service.add_language_to_user(1, 99).await;
        assert!(matches!(
            result,
            Err(DomainError::LanguageNotFound { language_id: 99 })
        ));
    }

    #[tokio::test]
    async fn test_set_native_language() {
        let service = create_service().await;

        service.add_language_to_user(1, 5).await.unwrap();
        let promoted = service.set_native_language(1, 5).await.unwrap();

        assert!(promoted.is_native());

        let native = service.get_native_language(1).await.unwrap().unwrap();
        assert_eq!(native.language_id(), 5);
        assert!(service.get_learning_languages(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_native_requires_added_language() {
        let service = create_service().await;

        let result = service.set_native_language(1, 5).await;
        assert!(matches!(
            result,
            Err(DomainError::LanguageNotAddedToUser {
                user_id: 1,
                language_id: 5
            })
        ));
    }

    #[tokio::test]
    async fn test_set_native_demotes_previous_native() {
        let service = create_service().await;

        service.add_language_to_user(1, 5).await.unwrap();
        service.add_language_to_user(1, 7).await.unwrap();
        service.set_native_language(1, 5).await.unwrap();

        service.set_native_language(1, 7).await.unwrap();

        let native = service.get_native_language(1).await.unwrap().unwrap();
        assert_eq!(native.language_id(), 7);

        // the old native persists as a learning language
        let learning = service.get_learning_languages(1).await.unwrap();
        assert_eq!(learning.len(), 1);
        assert_eq!(learning[0].language_id(), 5);

        let natives: Vec<_> = service
            .get_user_languages(1)
            .await
            .unwrap()
            .into_iter()
            .filter(|a| a.is_native())
            .collect();
        assert_eq!(natives.len(), 1);
    }

    #[tokio::test]
    async fn test_set_native_is_idempotent_for_current_native() {
        let service = create_service().await;

        service.add_language_to_user(1, 5).await.unwrap();
        let first = service.set_native_language(1, 5).await.unwrap();
        let second = service.set_native_language(1, 5).await.unwrap();

        assert_eq!(first, second);
        assert!(second.is_native());
    }

    #[tokio::test]
    async fn test_remove_language() {
        let service = create_service().await;

        service.add_language_to_user(1, 5).await.unwrap();
        service.remove_language_from_user(1, 5).await.unwrap();

        assert!(service.get_user_languages(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_language_is_noop() {
        let service = create_service().await;

        // never added: both calls succeed without touching anything
        service.remove_language_from_user(1, 5).await.unwrap();
        service.remove_language_from_user(1, 5).await.unwrap();

        assert!(service.get_user_languages(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_native_language_fails() {
        let service = create_service().await;

        service.add_language_to_user(1, 5).await.unwrap();
        service.set_native_language(1, 5).await.unwrap();

        let result = service.remove_language_from_user(1, 5).await;
        assert!(matches!(
            result,
            Err(DomainError::NativeLanguageCannotBeRemoved {
                user_id: 1,
                language_id: 5
            })
        ));

        // still there, still native
        let native = service.get_native_language(1).await.unwrap().unwrap();
        assert_eq!(native.language_id(), 5);
    }

    #[tokio::test]
    async fn test_remove_after_demotion_succeeds() {
        let service = create_service().await;

        service.add_language_to_user(1, 5).await.unwrap();
        service.add_language_to_user(1, 7).await.unwrap();
        service.set_native_language(1, 5).await.unwrap();
        service.set_native_language(1, 7).await.unwrap();

        service.remove_language_from_user(1, 5).await.unwrap();

        let all = service.get_user_languages(1).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].language_id(), 7);
    }

    #[tokio::test]
    async fn test_projections_require_user() {
        let service = create_service().await;

        assert!(matches!(
            service.get_user_languages(99).await,
            Err(DomainError::UserNotFound { user_id: 99 })
        ));
        assert!(matches!(
            service.get_native_language(99).await,
            Err(DomainError::UserNotFound { user_id: 99 })
        ));
        assert!(matches!(
            service.get_learning_languages(99).await,
            Err(DomainError::UserNotFound { user_id: 99 })
        ));
    }

    #[tokio::test]
    async fn test_no_native_language_is_none_not_error() {
        let service = create_service().await;

        service.add_language_to_user(1, 5).await.unwrap();

        assert!(service.get_native_language(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_at_most_one_native_across_many_promotions() {
        let service = create_service().await;

        for language_id in 1..=4 {
            service.add_language_to_user(1, language_id).await.unwrap();
        }

        for language_id in 1..=4 {
            service.set_native_language(1, language_id).await.unwrap();

            let natives = service
                .get_user_languages(1)
                .await
                .unwrap()
                .into_iter()
                .filter(|a| a.is_native())
                .count();
            assert_eq!(natives, 1);
        }

        let native = service.get_native_language(1).await.unwrap().unwrap();
        assert_eq!(native.language_id(), 4);
        assert_eq!(service.get_learning_languages(1).await.unwrap().len(), 3);
    }
}
