//! User-language association

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Association between a user and a language, unique per pair.
///
/// Immutable value object: flipping the native flag produces a new instance,
/// so references to the previous state stay valid. At most one association
/// per user may be native at any time; the service layer enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLanguage {
    id: Option<i64>,
    user_id: i64,
    language_id: i64,
    is_native: bool,
    added_at: DateTime<Utc>,
}

impl UserLanguage {
    /// Create a new association; both ids must be positive
    pub fn new(user_id: i64, language_id: i64, is_native: bool) -> Result<Self, DomainError> {
        if user_id <= 0 {
            return Err(DomainError::validation("User id must be positive"));
        }

        if language_id <= 0 {
            return Err(DomainError::validation("Language id must be positive"));
        }

        Ok(Self {
            id: None,
            user_id,
            language_id,
            is_native,
            added_at: Utc::now(),
        })
    }

    /// New learning association (the only way a pair comes into existence)
    pub fn learning(user_id: i64, language_id: i64) -> Result<Self, DomainError> {
        Self::new(user_id, language_id, false)
    }

    /// New native association
    pub fn native(user_id: i64, language_id: i64) -> Result<Self, DomainError> {
        Self::new(user_id, language_id, true)
    }

    /// Rehydrate a persisted row
    pub fn restore(
        id: i64,
        user_id: i64,
        language_id: i64,
        is_native: bool,
        added_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            user_id,
            language_id,
            is_native,
            added_at,
        }
    }

    /// Copy of this association with the store-assigned id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Copy of this association marked native
    pub fn as_native(mut self) -> Self {
        self.is_native = true;
        self
    }

    /// Copy of this association demoted to learning
    pub fn as_learning(mut self) -> Self {
        self.is_native = false;
        self
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn language_id(&self) -> i64 {
        self.language_id
    }

    pub fn is_native(&self) -> bool {
        self.is_native
    }

    pub fn is_learning(&self) -> bool {
        !self.is_native
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learning_association() {
        let assoc = UserLanguage::learning(1, 5).unwrap();

        assert_eq!(assoc.id(), None);
        assert_eq!(assoc.user_id(), 1);
        assert_eq!(assoc.language_id(), 5);
        assert!(assoc.is_learning());
        assert!(!assoc.is_native());
    }

    #[test]
    fn test_native_association() {
        let assoc = UserLanguage::native(1, 5).unwrap();
        assert!(assoc.is_native());
        assert!(!assoc.is_learning());
    }

    #[test]
    fn test_rejects_non_positive_ids() {
        assert!(UserLanguage::new(0, 5, false).is_err());
        assert!(UserLanguage::new(-1, 5, false).is_err());
        assert!(UserLanguage::new(1, 0, false).is_err());
        assert!(UserLanguage::new(1, -3, false).is_err());
    }

    #[test]
    fn test_as_native_preserves_identity_fields() {
        let assoc = UserLanguage::learning(1, 5).unwrap().with_id(10);
        let promoted = assoc.clone().as_native();

        assert!(promoted.is_native());
        assert_eq!(promoted.id(), Some(10));
        assert_eq!(promoted.user_id(), 1);
        assert_eq!(promoted.language_id(), 5);
        assert_eq!(promoted.added_at(), assoc.added_at());
        assert!(assoc.is_learning());
    }

    #[test]
    fn test_as_learning_demotes() {
        let assoc = UserLanguage::native(2, 7).unwrap();
        let demoted = assoc.as_learning();
        assert!(demoted.is_learning());
    }
}
