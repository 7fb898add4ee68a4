//! Core domain logic for Userboard.
//! This crate owns the user invariants, the SQLite store and its schema.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::user::{NewUser, User, UserId, UserName, UserValidationError};
pub use repo::user_repo::{RepoError, RepoResult, SqliteUserRepository, UserRepository};
pub use service::user_service::UserService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
