//! Middleware modules.

pub mod auth;
pub mod error;

use actix_cors::Cors;
use actix_web::http::header;

/// CORS policy: any origin may read search results and submit posts.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}
