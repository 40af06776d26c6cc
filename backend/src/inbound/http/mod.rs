//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`configure`] mounts every `/api/v1` route together with extractor
//! settings that report malformed bodies and query strings through the
//! domain error envelope.

pub mod auth;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod todos;
pub mod users;
pub mod validation;

use actix_web::middleware::NormalizePath;
use actix_web::web;
use tracing::debug;

use crate::domain::Error;

pub use error::ApiResult;

/// Prefix shared by every API route.
pub const API_PREFIX: &str = "/api/v1";

fn malformed(kind: &'static str, err: &dyn std::fmt::Display) -> actix_web::Error {
    debug!(error = %err, kind, "rejected malformed request");
    Error::invalid_request(format!("malformed {kind}: {err}")).into()
}

/// JSON body settings mapping parse failures to `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| malformed("JSON body", &err))
}

/// Query string settings mapping parse failures to `invalid_request`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| malformed("query string", &err))
}

/// Form body settings mapping parse failures to `invalid_request`.
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err, _req| malformed("form body", &err))
}

/// Path segment settings mapping parse failures to `invalid_request`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| malformed("path", &err))
}

/// Mount the API under [`API_PREFIX`].
///
/// `/users/me` routes are registered before `/users/{id}` so the literal
/// segment wins. Trailing slashes are trimmed, so `/users/me/` and
/// `/todos/` reach the same handlers.
///
/// # Examples
/// ```no_run
/// use actix_web::App;
///
/// let app = App::new().configure(todo_backend::inbound::http::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .wrap(NormalizePath::trim())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(form_config())
            .app_data(path_config())
            .service(users::issue_token)
            .service(users::register)
            .service(users::current_user)
            .service(users::update_current_user)
            .service(users::current_user_todos)
            .service(users::list_users)
            .service(users::get_user)
            .service(todos::create_todo)
            .service(todos::list_todos)
            .service(todos::get_todo)
            .service(todos::update_todo)
            .service(todos::delete_todo),
    );
}
