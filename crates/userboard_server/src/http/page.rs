//! Client view: one static page that drives the users API.

use actix_web::http::header::ContentType;
use actix_web::{get, HttpResponse};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Serve the single-page client.
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}
