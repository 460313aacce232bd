//! PostgreSQL user-language association repository
//!
//! Expects a `user_languages` table with a BIGSERIAL primary key, a unique
//! constraint on (user_id, language_id) and a partial unique index on
//! (user_id) WHERE is_native, so the one-native invariant also holds under
//! concurrent writers. The demote+promote sequence issued by the service
//! must run inside a caller-supplied transaction.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::user_language::{UserLanguage, UserLanguageRepository};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct PostgresUserLanguageRepository {
    pool: PgPool,
}

impl PostgresUserLanguageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COLUMNS: &str = "id, user_id, language_id, is_native, added_at";

#[async_trait]
impl UserLanguageRepository for PostgresUserLanguageRepository {
    async fn save(&self, user_language: UserLanguage) -> Result<UserLanguage, DomainError> {
        match user_language.id() {
            None => {
                let row = sqlx::query(
                    r#"
                    INSERT INTO user_languages (user_id, language_id, is_native, added_at)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(user_language.user_id())
                .bind(user_language.language_id())
                .bind(user_language.is_native())
                .bind(user_language.added_at())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_constraint_violation(e, &user_language))?;

                let id: i64 = row.get("id");
                Ok(user_language.with_id(id))
            }
            Some(id) => {
                let result = sqlx::query(
                    "UPDATE user_languages SET is_native = $2 WHERE id = $1",
                )
                .bind(id)
                .bind(user_language.is_native())
                .execute(&self.pool)
                .await
                .map_err(|e| map_constraint_violation(e, &user_language))?;

                if result.rows_affected() == 0 {
                    return Err(DomainError::language_not_added(
                        user_language.user_id(),
                        user_language.language_id(),
                    ));
                }

                Ok(user_language)
            }
        }
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<UserLanguage>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM user_languages WHERE user_id = $1 ORDER BY added_at"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list user languages: {e}")))?;

        Ok(rows.iter().map(row_to_user_language).collect())
    }

    async fn find_by_user_id_and_language_id(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<Option<UserLanguage>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM user_languages WHERE user_id = $1 AND language_id = $2"
        ))
        .bind(user_id)
        .bind(language_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user language: {e}")))?;

        Ok(row.as_ref().map(row_to_user_language))
    }

    async fn find_native_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Option<UserLanguage>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM user_languages WHERE user_id = $1 AND is_native"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get native language: {e}")))?;

        Ok(row.as_ref().map(row_to_user_language))
    }

    async fn find_learning_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Vec<UserLanguage>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM user_languages \
             WHERE user_id = $1 AND NOT is_native ORDER BY added_at"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list learning languages: {e}")))?;

        Ok(rows.iter().map(row_to_user_language).collect())
    }

    async fn delete_by_user_id_and_language_id(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM user_languages WHERE user_id = $1 AND language_id = $2")
            .bind(user_id)
            .bind(language_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user language: {e}")))?;

        Ok(())
    }

    async fn exists_by_user_id_and_language_id(
        &self,
        user_id: i64,
        language_id: i64,
    ) -> Result<bool, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_languages WHERE user_id = $1 AND language_id = $2",
        )
        .bind(user_id)
        .bind(language_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to check user language: {e}")))?;

        Ok(count > 0)
    }
}

fn map_constraint_violation(e: sqlx::Error, user_language: &UserLanguage) -> DomainError {
    let msg = e.to_string();

    if msg.contains("user_languages_native") {
        DomainError::multiple_native_languages(user_language.user_id())
    } else if msg.contains("duplicate key") || msg.contains("unique constraint") {
        DomainError::language_already_added(user_language.user_id(), user_language.language_id())
    } else {
        DomainError::storage(format!("Failed to save user language: {e}"))
    }
}

fn row_to_user_language(row: &sqlx::postgres::PgRow) -> UserLanguage {
    UserLanguage::restore(
        row.get("id"),
        row.get("user_id"),
        row.get("language_id"),
        row.get("is_native"),
        row.get("added_at"),
    )
}
