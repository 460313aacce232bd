//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::BTreeSet;

use crate::domain::user::{User, UserRepository, UserRole, UserStatus};
use crate::domain::DomainError;

/// PostgreSQL implementation of UserRepository
///
/// Expects a `users` table with a BIGSERIAL primary key and a unique
/// constraint on `email`.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, avatar_seed, \
                            roles, status, created_at, updated_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn save(&self, user: User) -> Result<User, DomainError> {
        match user.id() {
            None => {
                let row = sqlx::query(
                    r#"
                    INSERT INTO users (email, password_hash, first_name, last_name,
                                       avatar_seed, roles, status, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    RETURNING id
                    "#,
                )
                .bind(user.email())
                .bind(user.password_hash())
                .bind(user.first_name())
                .bind(user.last_name())
                .bind(user.avatar_seed())
                .bind(roles_to_str(user.roles()))
                .bind(status_to_str(user.status()))
                .bind(user.created_at())
                .bind(user.updated_at())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_unique_violation(e, user.email()))?;

                let id: i64 = row.get("id");
                Ok(user.with_id(id))
            }
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE users
                    SET email = $2, password_hash = $3, first_name = $4, last_name = $5,
                        roles = $6, status = $7, updated_at = $8
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(user.email())
                .bind(user.password_hash())
                .bind(user.first_name())
                .bind(user.last_name())
                .bind(roles_to_str(user.roles()))
                .bind(status_to_str(user.status()))
                .bind(user.updated_at())
                .execute(&self.pool)
                .await
                .map_err(|e| map_unique_violation(e, user.email()))?;

                if result.rows_affected() == 0 {
                    return Err(DomainError::user_not_found(id));
                }

                Ok(user)
            }
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by email: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {e}")))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check email: {e}")))?;

        Ok(count > 0)
    }
}

fn map_unique_violation(e: sqlx::Error, email: &str) -> DomainError {
    let msg = e.to_string();

    if msg.contains("duplicate key") || msg.contains("unique constraint") {
        DomainError::conflict(format!("Email '{email}' is already registered"))
    } else {
        DomainError::storage(format!("Failed to save user: {e}"))
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: i64 = row.get("id");
    let roles: String = row.get("roles");
    let status: String = row.get("status");

    Ok(User::restore(
        id,
        row.get("email"),
        row.get("password_hash"),
        row.get("first_name"),
        row.get("last_name"),
        row.get("avatar_seed"),
        str_to_roles(&roles),
        str_to_status(&status),
        row.get("created_at"),
        row.get("updated_at"),
    ))
}

fn status_to_str(status: UserStatus) -> &'static str {
    match status {
        UserStatus::Active => "active",
        UserStatus::Inactive => "inactive",
        UserStatus::Suspended => "suspended",
        UserStatus::Pending => "pending",
    }
}

fn str_to_status(s: &str) -> UserStatus {
    match s {
        "inactive" => UserStatus::Inactive,
        "suspended" => UserStatus::Suspended,
        "pending" => UserStatus::Pending,
        _ => UserStatus::Active,
    }
}

fn role_to_str(role: UserRole) -> &'static str {
    match role {
        UserRole::Learner => "learner",
        UserRole::Instructor => "instructor",
        UserRole::Admin => "admin",
    }
}

fn str_to_role(s: &str) -> UserRole {
    match s {
        "instructor" => UserRole::Instructor,
        "admin" => UserRole::Admin,
        _ => UserRole::Learner,
    }
}

fn roles_to_str(roles: &BTreeSet<UserRole>) -> String {
    roles
        .iter()
        .map(|r| role_to_str(*r))
        .collect::<Vec<_>>()
        .join(",")
}

fn str_to_roles(s: &str) -> BTreeSet<UserRole> {
    let roles: BTreeSet<UserRole> = s
        .split(',')
        .filter(|part| !part.is_empty())
        .map(str_to_role)
        .collect();

    if roles.is_empty() {
        BTreeSet::from([UserRole::Learner])
    } else {
        roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion() {
        assert_eq!(status_to_str(UserStatus::Active), "active");
        assert_eq!(status_to_str(UserStatus::Inactive), "inactive");
        assert_eq!(status_to_str(UserStatus::Suspended), "suspended");
        assert_eq!(status_to_str(UserStatus::Pending), "pending");

        assert_eq!(str_to_status("inactive"), UserStatus::Inactive);
        assert_eq!(str_to_status("unknown"), UserStatus::Active);
    }

    #[test]
    fn test_roles_round_trip() {
        let roles = BTreeSet::from([UserRole::Learner, UserRole::Admin]);
        let encoded = roles_to_str(&roles);

        assert_eq!(encoded, "learner,admin");
        assert_eq!(str_to_roles(&encoded), roles);
    }

    #[test]
    fn test_empty_roles_default_to_learner() {
        assert_eq!(str_to_roles(""), BTreeSet::from([UserRole::Learner]));
    }
}
