//! Inbound HTTP adapter.
//!
//! Handlers receive the shared [`UserStore`](crate::store::UserStore) through
//! `web::Data`, so tests can mount the same routes over an in-memory store.

use actix_web::web;

pub mod error;
pub mod page;
pub mod users;

pub use error::{ApiError, ApiResult};

/// Registers the client page and the `/api` routes with their JSON body limits.
///
/// # Examples
/// ```
/// use actix_web::{web, App};
/// use userboard_server::http::configure;
/// use userboard_server::store::UserStore;
///
/// let store = UserStore::in_memory().expect("in-memory store");
/// let app = App::new()
///     .app_data(web::Data::new(store))
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(page::index).service(
        web::scope("/api")
            .app_data(users::json_config())
            .service(users::list_users)
            .service(users::create_user),
    );
}
