//! PostgreSQL language catalog repository

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::language::{Language, LanguageRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of LanguageRepository
///
/// Expects a `languages` table with a BIGSERIAL primary key and a unique
/// constraint on `code`.
#[derive(Debug, Clone)]
pub struct PostgresLanguageRepository {
    pool: PgPool,
}

impl PostgresLanguageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LanguageRepository for PostgresLanguageRepository {
    async fn save(&self, language: Language) -> Result<Language, DomainError> {
        match language.id() {
            None => {
                let row = sqlx::query(
                    r#"
                    INSERT INTO languages (name, code, flag_url, created_at)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(language.name())
                .bind(language.code())
                .bind(language.flag_url())
                .bind(language.created_at())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_unique_violation(e, language.code()))?;

                let id: i64 = row.get("id");
                Ok(language.with_id(id))
            }
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE languages
                    SET name = $2, code = $3, flag_url = $4
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(language.name())
                .bind(language.code())
                .bind(language.flag_url())
                .execute(&self.pool)
                .await
                .map_err(|e| map_unique_violation(e, language.code()))?;

                if result.rows_affected() == 0 {
                    return Err(DomainError::language_not_found(id));
                }

                Ok(language)
            }
        }
    }

    async fn find_all(&self) -> Result<Vec<Language>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, name, code, flag_url, created_at FROM languages ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list languages: {e}")))?;

        Ok(rows.iter().map(row_to_language).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Language>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, code, flag_url, created_at FROM languages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get language: {e}")))?;

        Ok(row.as_ref().map(row_to_language))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Language>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, code, flag_url, created_at FROM languages WHERE code = LOWER($1)",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get language by code: {e}")))?;

        Ok(row.as_ref().map(row_to_language))
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Language>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, code, flag_url, created_at
            FROM languages
            WHERE name ILIKE '%' || $1 || '%'
            ORDER BY name
            "#,
        )
        .bind(term)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to search languages: {e}")))?;

        Ok(rows.iter().map(row_to_language).collect())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM languages")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count languages: {e}")))?;

        Ok(count as u64)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM languages WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check language: {e}")))?;

        Ok(count > 0)
    }
}

fn map_unique_violation(e: sqlx::Error, code: &str) -> DomainError {
    let msg = e.to_string();

    if msg.contains("duplicate key") || msg.contains("unique constraint") {
        DomainError::conflict(format!("Language code '{code}' already exists"))
    } else {
        DomainError::storage(format!("Failed to save language: {e}"))
    }
}

fn row_to_language(row: &sqlx::postgres::PgRow) -> Language {
    Language::restore(
        row.get("id"),
        row.get("name"),
        row.get("code"),
        row.get("flag_url"),
        row.get("created_at"),
    )
}
