//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::http::Method;
use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Post routes
            .service(
                web::scope("/posts")
                    .service(
                        web::resource("")
                            .route(web::get().to(posts::list_posts))
                            .route(web::post().to(posts::create_post))
                            .route(web::method(Method::OPTIONS).to(posts::preflight)),
                    )
                    .service(
                        web::resource("/slug/{slug}")
                            .route(web::get().to(posts::get_post_by_slug))
                            .route(web::method(Method::OPTIONS).to(posts::preflight)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(posts::get_post))
                            .route(web::patch().to(posts::update_post))
                            .route(web::delete().to(posts::delete_post))
                            .route(web::method(Method::OPTIONS).to(posts::preflight)),
                    ),
            ),
    );
}

/// Malformed request bodies become problem responses.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}
