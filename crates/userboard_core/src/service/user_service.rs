//! User use-case service.
//!
//! # Responsibility
//! - Provide list/create entry points for HTTP callers.
//! - Validate caller input before delegating to repository persistence.
//!
//! # Invariants
//! - No write reaches the repository with an untrimmed or empty name.
//! - Service layer remains storage-agnostic.

use crate::model::user::{NewUser, User, UserName};
use crate::repo::user_repo::{RepoResult, UserRepository};

/// Use-case service wrapper for user operations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all users, newest first.
    pub fn list_users(&self) -> RepoResult<Vec<User>> {
        self.repo.list_users()
    }

    /// Creates a user from raw caller input.
    ///
    /// # Contract
    /// - `raw_name` is trimmed before validation and storage.
    /// - Returns `RepoError::Validation` without writing when the trimmed
    ///   name is empty.
    /// - Returns the row exactly as stored.
    pub fn create_user(&self, raw_name: &str) -> RepoResult<User> {
        let name = UserName::parse(raw_name)?;
        self.repo.create_user(&NewUser::new(name))
    }

    /// Returns the number of stored users.
    pub fn count_users(&self) -> RepoResult<u64> {
        self.repo.count_users()
    }
}
