//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service and HTTP layers.
//!
//! # Invariants
//! - Repositories only accept connections that passed `db::open_db`
//!   bootstrap (checked by `try_new`).
//! - Repository APIs return semantic errors (`MissingInsertedRow`) in
//!   addition to DB transport errors.

pub mod user_repo;
