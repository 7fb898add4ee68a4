//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/create APIs over canonical `users` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every caller-supplied value is bound as a statement parameter.
//! - Create returns exactly the row the store inserted, in one statement.
//! - Listing is ordered newest first, ties broken by descending `id`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::user::{NewUser, User, UserValidationError};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const USERS_TABLE: &str = "users";
const USERS_REQUIRED_COLUMNS: &[&str] = &["id", "name", "created_at"];

const USER_SELECT_SQL: &str = "SELECT
    id,
    name,
    created_at
FROM users";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(UserValidationError),
    Db(DbError),
    /// `INSERT ... RETURNING` succeeded without yielding a row.
    MissingInsertedRow,
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingInsertedRow => {
                write!(f, "failed to create user or retrieve the created user data")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::MissingInsertedRow
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for user operations.
pub trait UserRepository {
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    fn count_users(&self) -> RepoResult<u64>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Wraps a connection after verifying its schema is ready for user queries.
    ///
    /// # Errors
    /// See [`SqliteUserRepository::verify_schema`].
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::verify_schema(conn)?;
        Ok(Self::new_verified(conn))
    }

    /// Wraps a connection that already passed [`SqliteUserRepository::verify_schema`].
    ///
    /// Queries against an unverified connection fail with raw SQLite errors.
    pub fn new_verified(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Checks that migrations ran and the `users` table has every column
    /// the repository reads.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   was tampered with after migration.
    pub fn verify_schema(conn: &Connection) -> RepoResult<()> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version < expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_table_columns(conn, USERS_TABLE, USERS_REQUIRED_COLUMNS)
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY created_at DESC, id DESC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();

        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        debug!(
            "event=user_list module=repo status=ok count={}",
            users.len()
        );
        Ok(users)
    }

    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        let created = self
            .conn
            .query_row(
                "INSERT INTO users (name) VALUES (?1) RETURNING id, name, created_at;",
                params![user.name.as_str()],
                parse_user_row,
            )
            .optional()?;

        match created {
            Some(created) => {
                debug!(
                    "event=user_create module=repo status=ok user_id={}",
                    created.id
                );
                Ok(created)
            }
            None => {
                error!(
                    "event=user_create module=repo status=error error_code=missing_inserted_row"
                );
                Err(RepoError::MissingInsertedRow)
            }
        }
    }

    fn count_users(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}

fn ensure_table_columns(
    conn: &Connection,
    table: &'static str,
    required: &[&'static str],
) -> RepoResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for column in required {
        if !columns.iter().any(|existing| existing == column) {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}
