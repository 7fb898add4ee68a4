//! HTTP server for Userboard: configuration, the shared store handle and
//! the actix-web routes that expose it.

pub mod config;
pub mod http;
pub mod store;

pub use config::{ConfigError, ServerConfig};
pub use store::{StoreError, UserStore};
