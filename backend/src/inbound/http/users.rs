//! Identity endpoints: login, registration, self-service and admin listing.
//!
//! ```text
//! POST  /api/v1/token            username=ada@example.com&password=...
//! POST  /api/v1/users            {"email":"ada@example.com","password":"..."}
//! GET   /api/v1/users/me
//! PATCH /api/v1/users/me         {"is_active":false}
//! GET   /api/v1/users/me/todos?skip=0&limit=100
//! GET   /api/v1/users?skip=0&limit=100
//! GET   /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use pagination::PageParams;
use serde::{Deserialize, Serialize};

use crate::domain::ports::UserChanges;
use crate::domain::{Error, LoginCredentials, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{ActiveCaller, AdminOnly};
use crate::inbound::http::schemas::{
    TodoResponse, TokenResponse, UserResponse, UserWithTodosResponse,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{login_error, parse_email, parse_page, parse_password};

/// OAuth2 password-flow form. Missing fields deserialize as empty strings so
/// they are reported through the validation envelope.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TokenForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Registration body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Self-service update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateMeRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateMeRequest {
    fn into_changes(self) -> Result<UserChanges, Error> {
        Ok(UserChanges {
            email: self.email.as_deref().map(parse_email).transpose()?,
            password: self.password.as_deref().map(parse_password).transpose()?,
            is_active: self.is_active,
        })
    }
}

/// Exchange email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/token",
    request_body(content = TokenForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error,
            headers(("WWW-Authenticate" = String, description = "Bearer"))),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "issueToken",
    security([])
)]
#[post("/token")]
pub async fn issue_token(
    state: web::Data<HttpState>,
    form: web::Form<TokenForm>,
) -> ApiResult<web::Json<TokenResponse>> {
    let TokenForm { username, password } = form.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&username, &password).map_err(|err| login_error(&err))?;
    let token = state.login.login(&credentials).await?;
    Ok(web::Json(TokenResponse::from(&token)))
}

/// Register a new active, non-admin identity.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Identity created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest { email, password } = payload.into_inner();
    let email = parse_email(&email)?;
    let password = parse_password(&password)?;
    let user = state.users.register(email, password).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// The calling identity.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current identity", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Inactive account", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(caller: ActiveCaller) -> web::Json<UserResponse> {
    web::Json(UserResponse::from(caller.user()))
}

/// Partially update the calling identity.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateMeRequest,
    responses(
        (status = 200, description = "Updated identity", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Inactive account", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[patch("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    caller: ActiveCaller,
    payload: web::Json<UpdateMeRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let changes = payload.into_inner().into_changes()?;
    let user = state.users.update_me(&caller, changes).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// The caller's todos, ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/todos",
    params(
        ("skip" = Option<i64>, Query, description = "Items to skip"),
        ("limit" = Option<i64>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Caller's todos", body = [TodoResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Inactive account", body = Error)
    ),
    tags = ["users"],
    operation_id = "listCurrentUserTodos"
)]
#[get("/users/me/todos")]
pub async fn current_user_todos(
    state: web::Data<HttpState>,
    caller: ActiveCaller,
    query: web::Query<PageParams>,
) -> ApiResult<web::Json<Vec<TodoResponse>>> {
    let page = parse_page(query.into_inner())?;
    let todos = state.todos_query.list_todos(&caller, page).await?;
    Ok(web::Json(todos.iter().map(TodoResponse::from).collect()))
}

/// List every identity. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(
        ("skip" = Option<i64>, Query, description = "Items to skip"),
        ("limit" = Option<i64>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Identities", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an administrator", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    admin: AdminOnly,
    query: web::Query<PageParams>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let page = parse_page(query.into_inner())?;
    let users = state.users_query.list_users(&admin, page).await?;
    Ok(web::Json(users.iter().map(UserResponse::from).collect()))
}

/// One identity with a page of its todos. Admin only, read-only.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(
        ("id" = i64, Path, description = "Identity id"),
        ("skip" = Option<i64>, Query, description = "Todos to skip"),
        ("limit" = Option<i64>, Query, description = "Todo page size, at most 100")
    ),
    responses(
        (status = 200, description = "Identity with todos", body = UserWithTodosResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an administrator", body = Error),
        (status = 404, description = "Unknown identity", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    admin: AdminOnly,
    path: web::Path<i64>,
    query: web::Query<PageParams>,
) -> ApiResult<web::Json<UserWithTodosResponse>> {
    let page = parse_page(query.into_inner())?;
    let id = UserId::new(path.into_inner());
    let found = state.users_query.user_with_todos(&admin, id, page).await?;
    Ok(web::Json(UserWithTodosResponse::from(&found)))
}
