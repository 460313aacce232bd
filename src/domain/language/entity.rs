//! Language catalog entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A language available on the platform.
///
/// Immutable value object; changing a field produces a new instance. The
/// catalog is seeded at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    id: Option<i64>,
    name: String,
    /// Two-letter lowercase ISO 639-1 code
    code: String,
    flag_url: String,
    created_at: DateTime<Utc>,
}

impl Language {
    /// Create a new catalog entry, normalizing and validating the code
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        flag_url: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        let code = code.into().trim().to_lowercase();

        if name.is_empty() {
            return Err(DomainError::validation("Language name must not be empty"));
        }

        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(DomainError::validation(format!(
                "Language code must be two lowercase letters (ISO 639-1), got '{code}'"
            )));
        }

        Ok(Self {
            id: None,
            name,
            code,
            flag_url: flag_url.into(),
            created_at: Utc::now(),
        })
    }

    /// Rehydrate a persisted row
    pub fn restore(
        id: i64,
        name: String,
        code: String,
        flag_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            code,
            flag_url,
            created_at,
        }
    }

    /// Copy of this language with the store-assigned id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Copy of this language with a new flag image
    pub fn with_flag_url(mut self, flag_url: impl Into<String>) -> Self {
        self.flag_url = flag_url.into();
        self
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn flag_url(&self) -> &str {
        &self.flag_url
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
