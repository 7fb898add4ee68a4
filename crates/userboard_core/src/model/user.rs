//! User domain model.
//!
//! # Responsibility
//! - Define the persisted user record returned to API callers.
//! - Own name normalization and validation for create paths.
//!
//! # Invariants
//! - `UserName` is always trimmed and never empty.
//! - `id` and `created_at` are assigned by storage, never by callers.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned user identifier.
pub type UserId = i64;

/// Validation failures for user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserValidationError {
    /// Name was empty or whitespace-only after trimming.
    EmptyName,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "user name must not be empty"),
        }
    }
}

impl Error for UserValidationError {}

/// Trimmed, non-empty display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Trims surrounding whitespace and rejects empty results.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for UserName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for UserName {
    type Error = UserValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Create input for a user; only the name is caller-supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: UserName,
}

impl NewUser {
    pub fn new(name: UserName) -> Self {
        Self { name }
    }
}

/// Persisted user row as exposed over the wire.
///
/// Field names match the JSON contract: `{ "id", "name", "created_at" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// SQLite `CURRENT_TIMESTAMP` text (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub created_at: String,
}
