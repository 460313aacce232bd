//! User entity and related types

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::is_valid_email;

/// Role a user holds on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular account learning languages
    #[default]
    Learner,
    /// Account allowed to author learning content
    Instructor,
    /// Platform administrator
    Admin,
}

/// Status of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// User is active and can log in
    #[default]
    Active,
    /// User deactivated their account
    Inactive,
    /// User is temporarily suspended
    Suspended,
    /// Account created but not yet confirmed
    Pending,
}

impl UserStatus {
    /// Check if the user can log in
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Identity provider asserted on an OAuth login.
///
/// Accepted on the wire but not persisted; verification of the assertion
/// happens upstream of this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthProvider {
    Local,
    Google,
    Microsoft,
    Facebook,
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Google => write!(f, "google"),
            Self::Microsoft => write!(f, "microsoft"),
            Self::Facebook => write!(f, "facebook"),
        }
    }
}

/// User entity
///
/// The id is `None` until the repository persists the record; `save` on an
/// id-less user inserts, `save` on an id-carrying user updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier, immutable once set
    id: Option<i64>,
    /// Unique login email
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    first_name: String,
    last_name: String,
    /// Seed for deterministic avatar generation, assigned once at creation
    avatar_seed: String,
    /// Non-empty role set
    roles: BTreeSet<UserRole>,
    status: UserStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new unpersisted user
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        avatar_seed: impl Into<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: None,
            email: email.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            avatar_seed: avatar_seed.into(),
            roles: BTreeSet::from([role]),
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a persisted row
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: i64,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        avatar_seed: String,
        roles: BTreeSet<UserRole>,
        status: UserStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            email,
            password_hash,
            first_name,
            last_name,
            avatar_seed,
            roles,
            status,
            created_at,
            updated_at,
        }
    }

    /// Copy of this user with the store-assigned id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    // Getters

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn avatar_seed(&self) -> &str {
        &self.avatar_seed
    }

    pub fn roles(&self) -> &BTreeSet<UserRole> {
        &self.roles
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Status checks

    pub fn is_active(&self) -> bool {
        self.status.can_login()
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_valid_email(&self) -> bool {
        is_valid_email(&self.email)
    }

    // Mutators

    /// Update first and last name
    pub fn set_name(&mut self, first_name: impl Into<String>, last_name: impl Into<String>) {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self.touch();
    }

    /// Update the password hash
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    /// Update the login email
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.touch();
    }

    /// Replace the role set; an empty set is ignored
    pub fn set_roles(&mut self, roles: BTreeSet<UserRole>) {
        if !roles.is_empty() {
            self.roles = roles;
            self.touch();
        }
    }

    /// Activate a deactivated user
    pub fn activate(&mut self) {
        if self.status == UserStatus::Inactive {
            self.status = UserStatus::Active;
            self.touch();
        }
    }

    /// Deactivate an active user
    pub fn deactivate(&mut self) {
        if self.status == UserStatus::Active {
            self.status = UserStatus::Inactive;
            self.touch();
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::new(
            "alice@example.com",
            "hashed_password",
            "Alice",
            "Moreno",
            "seed-1234",
            UserRole::Learner,
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let user = create_test_user();

        assert_eq!(user.id(), None);
        assert_eq!(user.email(), "alice@example.com");
        assert!(user.is_active());
        assert!(user.has_role(UserRole::Learner));
        assert!(!user.has_role(UserRole::Admin));
        assert_eq!(user.roles().len(), 1);
        assert!(user.has_valid_email());
    }

    #[test]
    fn test_full_name() {
        let user = create_test_user();
        assert_eq!(user.full_name(), "Alice Moreno");
    }

    #[test]
    fn test_with_id() {
        let user = create_test_user().with_id(7);
        assert_eq!(user.id(), Some(7));
    }

    #[test]
    fn test_activate_deactivate_toggle() {
        let mut user = create_test_user();

        user.deactivate();
        assert_eq!(user.status(), UserStatus::Inactive);
        assert!(!user.is_active());

        user.activate();
        assert_eq!(user.status(), UserStatus::Active);
        assert!(user.is_active());
    }

    #[test]
    fn test_activate_does_not_touch_suspended_accounts() {
        let now = Utc::now();
        let mut user = User::restore(
            1,
            "bob@example.com".to_string(),
            "hash".to_string(),
            "Bob".to_string(),
            "Smith".to_string(),
            "seed".to_string(),
            BTreeSet::from([UserRole::Learner]),
            UserStatus::Suspended,
            now,
            now,
        );

        user.activate();
        assert_eq!(user.status(), UserStatus::Suspended);

        user.deactivate();
        assert_eq!(user.status(), UserStatus::Suspended);
    }

    #[test]
    fn test_set_name_touches_updated_at() {
        let mut user = create_test_user();
        let before = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(5));
        user.set_name("Alicia", "Moreno");

        assert_eq!(user.first_name(), "Alicia");
        assert!(user.updated_at() > before);
    }

    #[test]
    fn test_set_roles_rejects_empty_set() {
        let mut user = create_test_user();

        user.set_roles(BTreeSet::new());
        assert_eq!(user.roles().len(), 1);

        user.set_roles(BTreeSet::from([UserRole::Learner, UserRole::Instructor]));
        assert_eq!(user.roles().len(), 2);
    }

    #[test]
    fn test_serialization_excludes_password() {
        let user = create_test_user();

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_status_can_login() {
        assert!(UserStatus::Active.can_login());
        assert!(!UserStatus::Inactive.can_login());
        assert!(!UserStatus::Suspended.can_login());
        assert!(!UserStatus::Pending.can_login());
    }
}
