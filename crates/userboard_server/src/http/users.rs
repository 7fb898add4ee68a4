//! Users API handlers.
//!
//! ```text
//! GET /api/users
//! POST /api/users {"name":"Alice"}
//! ```

use crate::http::error::{ApiError, ApiResult};
use crate::store::UserStore;
use actix_web::error::JsonPayloadError;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::{error, info, warn};
use serde_json::Value;
use userboard_core::User;

/// Largest accepted `POST /api/users` body.
pub const JSON_BODY_LIMIT: usize = 1024 * 1024;

/// List all users, newest first.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use userboard_server::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[get("/users")]
pub async fn list_users(store: web::Data<UserStore>) -> ApiResult<web::Json<Vec<User>>> {
    let store = store.clone();
    let users = web::block(move || store.with_users(|service| service.list_users()))
        .await
        .map_err(ApiError::from)
        .and_then(|result| result.map_err(ApiError::from))
        .inspect_err(|err| log_failure("user_list", err))?;

    info!(
        "event=user_list module=http status=ok count={}",
        users.len()
    );
    Ok(web::Json(users))
}

/// Create a user from `{"name": <string>}`.
///
/// The name is trimmed before validation; the response carries the row as
/// stored, including the assigned `id` and `created_at`.
#[post("/users")]
pub async fn create_user(
    store: web::Data<UserStore>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let raw_name = extract_name(&body).inspect_err(|err| log_failure("user_create", err))?;

    let store = store.clone();
    let created = web::block(move || store.with_users(|service| service.create_user(&raw_name)))
        .await
        .map_err(ApiError::from)
        .and_then(|result| result.map_err(ApiError::from))
        .inspect_err(|err| log_failure("user_create", err))?;

    info!(
        "event=user_create module=http status=ok user_id={}",
        created.id
    );
    Ok(HttpResponse::Created().json(created))
}

/// JSON extractor settings for the users routes.
///
/// Extraction failures (oversized, unparsable) answer with the same JSON
/// error shapes as the handlers. The content type is not checked.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .content_type_required(false)
        .error_handler(reject_body)
}

fn reject_body(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let err = ApiError::from(err);
    log_failure("user_create", &err);
    err.into()
}

/// Pulls the raw `name` string out of a JSON request body.
///
/// A body that is valid JSON but not an object is treated as missing `name`.
fn extract_name(body: &Value) -> ApiResult<String> {
    match body.get("name") {
        Some(Value::String(name)) => Ok(name.clone()),
        _ => Err(ApiError::name_required()),
    }
}

fn log_failure(event: &str, err: &ApiError) {
    match err {
        ApiError::BadRequest(message) => {
            warn!("event={event} module=http status=rejected reason={message}");
        }
        ApiError::PayloadTooLarge => {
            warn!(
                "event={event} module=http status=rejected reason=payload_too_large limit={JSON_BODY_LIMIT}"
            );
        }
        ApiError::Internal { details } => {
            error!("event={event} module=http status=error error={details}");
        }
    }
}
