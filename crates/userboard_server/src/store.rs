//! Process-wide store handle shared by HTTP handlers.
//!
//! # Responsibility
//! - Own the single SQLite connection for the lifetime of the server.
//! - Hand out a user service bound to that connection, one call at a time.
//! - Close the connection explicitly on shutdown.
//!
//! # Invariants
//! - The connection is only reachable through `UserStore::with_users`.
//! - The schema guard runs once, when the store is built, not per call.
//! - The lock is held for exactly one service call; no I/O happens outside it.

use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Arc, Mutex};
use userboard_core::{
    open_db, open_db_in_memory, DbError, RepoError, RepoResult, SqliteUserRepository,
    UserService,
};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    /// A previous holder panicked while using the connection.
    Poisoned,
    Close(rusqlite::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "database connection lock is poisoned"),
            Self::Close(err) => write!(f, "failed to close database connection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Poisoned => None,
            Self::Close(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

/// Cloneable handle to the single store connection.
#[derive(Clone)]
pub struct UserStore {
    conn: Arc<Mutex<Connection>>,
}

impl UserStore {
    /// Wraps an already bootstrapped connection after checking its schema.
    pub fn new(conn: Connection) -> StoreResult<Self> {
        SqliteUserRepository::verify_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens (or creates) the store file and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::new(open_db(path)?)
    }

    /// Opens a private in-memory store; used by tests.
    pub fn in_memory() -> StoreResult<Self> {
        Self::new(open_db_in_memory()?)
    }

    /// Runs `f` against a user service bound to the locked connection.
    pub fn with_users<T>(
        &self,
        f: impl FnOnce(&UserService<SqliteUserRepository<'_>>) -> RepoResult<T>,
    ) -> StoreResult<T> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let service = UserService::new(SqliteUserRepository::new_verified(&conn));
        Ok(f(&service)?)
    }

    /// Closes the connection if this is the last handle.
    ///
    /// Returns `Ok(false)` when other handles are still alive; the
    /// connection is then closed when the last one drops.
    pub fn close(self) -> StoreResult<bool> {
        let mutex = match Arc::try_unwrap(self.conn) {
            Ok(mutex) => mutex,
            Err(_) => {
                warn!("event=db_close module=store status=deferred reason=shared_handles");
                return Ok(false);
            }
        };
        let conn = mutex.into_inner().map_err(|_| StoreError::Poisoned)?;
        conn.close().map_err(|(_, err)| StoreError::Close(err))?;
        info!("event=db_close module=store status=ok");
        Ok(true)
    }
}
