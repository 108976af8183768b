use actix_web::web;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod games;
pub mod health;

/// JSON bodies that fail to parse answer with a problem document like any
/// other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(4 * 1024)
        .error_handler(|err, _req| AppError::bad_request(ErrorCode::BadRequest, err.to_string()).into())
}

/// Configure application routes for tests and non-HttpServer contexts.
///
/// `main.rs` wires the same handlers with rate limiting on top.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(
        web::scope("/api/games")
            .configure(games::configure_guess_route)
            .configure(games::configure_routes),
    );
}
