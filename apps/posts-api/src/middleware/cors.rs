//! CORS headers attached to every response.

use actix_web::middleware::DefaultHeaders;

pub const ALLOWED_ORIGIN: &str = "*";
pub const ALLOWED_METHODS: &str = "GET,POST,PATCH,DELETE,OPTIONS";

/// Headers the browser front-end needs on every response, errors included.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", ALLOWED_ORIGIN))
        .add(("Access-Control-Allow-Methods", ALLOWED_METHODS))
}
