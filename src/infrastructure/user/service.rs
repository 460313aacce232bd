//! Account management service

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::user::validation::is_valid_email;
use crate::domain::user::{User, UserRepository, UserRole};
use crate::domain::DomainError;

use super::password::PasswordHasher;

const MIN_PASSWORD_LEN: usize = 8;

/// Request for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Request for updating profile fields; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Option<BTreeSet<UserRole>>,
}

/// Service for account lifecycle: registration, profile changes and
/// activation toggling. Login lives in the auth service.
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    default_role: UserRole,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>, default_role: UserRole) -> Self {
        Self {
            repository,
            hasher,
            default_role,
        }
    }

    /// Register a new account with a hashed credential and a fresh avatar seed
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        let email = request.email.trim().to_lowercase();

        if !is_valid_email(&email) {
            return Err(DomainError::validation(format!("Invalid email: {email}")));
        }

        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if self.repository.exists_by_email(&email).await? {
            return Err(DomainError::conflict(format!(
                "Email '{email}' is already registered"
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let avatar_seed = Uuid::new_v4().to_string();

        let user = User::new(
            email,
            password_hash,
            request.first_name,
            request.last_name,
            avatar_seed,
            self.default_role,
        );

        let user = self.repository.save(user).await?;
        info!(user_id = ?user.id(), email = %user.email(), "user registered");
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<Option<User>, DomainError> {
        self.repository.find_by_id(id).await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repository.find_by_email(email).await
    }

    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.find_all().await
    }

    /// Update name fields; email, avatar seed, status and credential are
    /// only changed through their dedicated operations
    pub async fn update_profile(
        &self,
        id: i64,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let mut user = self.require_user(id).await?;

        let first_name = request
            .first_name
            .unwrap_or_else(|| user.first_name().to_string());
        let last_name = request
            .last_name
            .unwrap_or_else(|| user.last_name().to_string());
        user.set_name(first_name, last_name);

        if let Some(roles) = request.roles {
            user.set_roles(roles);
        }

        self.repository.save(user).await
    }

    pub async fn activate(&self, id: i64) -> Result<User, DomainError> {
        let mut user = self.require_user(id).await?;
        user.activate();
        self.repository.save(user).await
    }

    pub async fn deactivate(&self, id: i64) -> Result<User, DomainError> {
        let mut user = self.require_user(id).await?;
        user.deactivate();
        self.repository.save(user).await
    }

    /// Change the password after checking the current one
    pub async fn change_password(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<User, DomainError> {
        let mut user = self.require_user(id).await?;

        if !self.hasher.verify(current_password, user.password_hash()) {
            return Err(DomainError::validation("Current password is incorrect"));
        }

        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let new_hash = self.hasher.hash(new_password)?;
        user.set_password_hash(new_hash);

        self.repository.save(user).await
    }

    /// Change the login email, keeping it unique and well-formed
    pub async fn change_email(&self, id: i64, new_email: &str) -> Result<User, DomainError> {
        let mut user = self.require_user(id).await?;
        let new_email = new_email.trim().to_lowercase();

        if !is_valid_email(&new_email) {
            return Err(DomainError::validation(format!(
                "Invalid email: {new_email}"
            )));
        }

        if self.repository.exists_by_email(&new_email).await? {
            return Err(DomainError::conflict(format!(
                "Email '{new_email}' is already registered"
            )));
        }

        user.set_email(new_email);
        self.repository.save(user).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.repository.delete_by_id(id).await
    }

    async fn require_user(&self, id: i64) -> Result<User, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserStatus;
    use crate::infrastructure::user::repository::InMemoryUserRepository;
    use crate::infrastructure::user::Argon2Hasher;

    fn create_service() -> UserService<InMemoryUserRepository, Argon2Hasher> {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::new()),
            UserRole::Learner,
        )
    }

    fn make_request(email: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            email: email.to_string(),
            password: "secure_password123".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register() {
        let service = create_service();

        let user = service.register(make_request("a@example.com")).await.unwrap();

        assert_eq!(user.id(), Some(1));
        assert_eq!(user.email(), "a@example.com");
        assert!(user.is_active());
        assert!(user.has_role(UserRole::Learner));
        assert!(!user.avatar_seed().is_empty());
        // credential is stored hashed
        assert_ne!(user.password_hash(), "secure_password123");
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let service = create_service();

        let user = service
            .register(make_request("  Alice@Example.COM "))
            .await
            .unwrap();

        assert_eq!(user.email(), "alice@example.com");
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let service = create_service();

        let result = service.register(make_request("not-an-email")).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let service = create_service();

        let mut request = make_request("a@example.com");
        request.password = "short".to_string();

        let result = service.register(request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let service = create_service();

        service.register(make_request("a@example.com")).await.unwrap();
        let result = service.register(make_request("a@example.com")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_unset_fields() {
        let service = create_service();
        let user = service.register(make_request("a@example.com")).await.unwrap();
        let id = user.id().unwrap();

        let updated = service
            .update_profile(
                id,
                UpdateProfileRequest {
                    first_name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name(), "Renamed");
        assert_eq!(updated.last_name(), "User");
        assert_eq!(updated.email(), user.email());
        assert_eq!(updated.avatar_seed(), user.avatar_seed());
    }

    #[tokio::test]
    async fn test_update_profile_replaces_roles() {
        let service = create_service();
        let user = service.register(make_request("a@example.com")).await.unwrap();

        let updated = service
            .update_profile(
                user.id().unwrap(),
                UpdateProfileRequest {
                    roles: Some(BTreeSet::from([UserRole::Learner, UserRole::Instructor])),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.has_role(UserRole::Instructor));
        assert_eq!(updated.roles().len(), 2);
    }

    #[tokio::test]
    async fn test_update_profile_unknown_user() {
        let service = create_service();

        let result = service.update_profile(99, UpdateProfileRequest::default()).await;
        assert!(matches!(result, Err(DomainError::UserNotFound { user_id: 99 })));
    }

    #[tokio::test]
    async fn test_activate_deactivate() {
        let service = create_service();
        let user = service.register(make_request("a@example.com")).await.unwrap();
        let id = user.id().unwrap();

        let deactivated = service.deactivate(id).await.unwrap();
        assert_eq!(deactivated.status(), UserStatus::Inactive);

        let activated = service.activate(id).await.unwrap();
        assert_eq!(activated.status(), UserStatus::Active);
    }

    #[tokio::test]
    async fn test_change_password() {
        let service = create_service();
        let user = service.register(make_request("a@example.com")).await.unwrap();
        let id = user.id().unwrap();

        service
            .change_password(id, "secure_password123", "new_password456")
            .await
            .unwrap();

        let stored = service.get(id).await.unwrap().unwrap();
        let hasher = Argon2Hasher::new();
        assert!(hasher.verify("new_password456", stored.password_hash()));
        assert!(!hasher.verify("secure_password123", stored.password_hash()));
    }

    #[tokio::test]
    async fn test_change_password_wrong_current() {
        let service = create_service();
        let user = service.register(make_request("a@example.com")).await.unwrap();

        let result = service
            .change_password(user.id().unwrap(), "wrong_current", "new_password456")
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_change_email() {
        let service = create_service();
        let user = service.register(make_request("a@example.com")).await.unwrap();
        let id = user.id().unwrap();

        let updated = service.change_email(id, "b@example.com").await.unwrap();
        assert_eq!(updated.email(), "b@example.com");
    }

    #[tokio::test]
    async fn test_change_email_rejects_taken_address() {
        let service = create_service();
        service.register(make_request("a@example.com")).await.unwrap();
        let user = service.register(make_request("b@example.com")).await.unwrap();

        let result = service
            .change_email(user.id().unwrap(), "a@example.com")
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = create_service();
        let user = service.register(make_request("a@example.com")).await.unwrap();
        let id = user.id().unwrap();

        assert!(service.delete(id).await.unwrap());
        assert!(service.get(id).await.unwrap().is_none());
    }
}
