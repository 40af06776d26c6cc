//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP path and response schema. It backs Swagger
//! UI in debug builds and is printed by the `openapi-dump` binary for external
//! tooling.

use utoipa::openapi::security::{Flow, OAuth2, Password, Scopes, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::schemas::{
    TodoResponse, TodoWithOwnerResponse, TokenResponse, UserResponse, UserWithTodosResponse,
};
use crate::inbound::http::todos::{CreateTodoRequest, UpdateTodoRequest};
use crate::inbound::http::users::{RegisterRequest, TokenForm, UpdateMeRequest};

/// Register the OAuth2 password-flow bearer scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::OAuth2(OAuth2::with_description(
                [Flow::Password(Password::new("/api/v1/token", Scopes::new()))],
                "Bearer token issued by POST /api/v1/token.",
            )),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Todo backend API",
        description = "Multi-user todo service with bearer-token authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::issue_token,
        crate::inbound::http::users::register,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::users::current_user_todos,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::todos::create_todo,
        crate::inbound::http::todos::list_todos,
        crate::inbound::http::todos::get_todo,
        crate::inbound::http::todos::update_todo,
        crate::inbound::http::todos::delete_todo,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserResponse,
        TodoResponse,
        TodoWithOwnerResponse,
        UserWithTodosResponse,
        TokenResponse,
        TokenForm,
        RegisterRequest,
        UpdateMeRequest,
        CreateTodoRequest,
        UpdateTodoRequest,
    )),
    tags(
        (name = "auth", description = "Token issuance"),
        (name = "users", description = "Identities and administration"),
        (name = "todos", description = "Todos owned by the caller"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
