//! Domain model for the Userboard store.
//!
//! # Responsibility
//! - Define canonical data structures shared by repository and HTTP layers.
//!
//! # Invariants
//! - Users are created once and never updated or deleted.
//! - The `items` table has no model yet; it is reserved schema surface.

pub mod user;
