//! Todo endpoints. Every route acts on the caller's own todos only; a todo
//! owned by someone else is reported as missing.
//!
//! ```text
//! POST   /api/v1/todos           {"title":"Buy milk","description":null}
//! GET    /api/v1/todos?skip=0&limit=100
//! GET    /api/v1/todos/{id}
//! PUT    /api/v1/todos/{id}      {"is_done":true}
//! DELETE /api/v1/todos/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::PageParams;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Error, NewTodo, TodoId, TodoPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::ActiveCaller;
use crate::inbound::http::schemas::{TodoResponse, TodoWithOwnerResponse, UserResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_page, parse_title};

/// Creation body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateTodoRequest {
    #[schema(example = "Buy milk")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_done: Option<bool>,
}

impl CreateTodoRequest {
    fn into_new_todo(self) -> Result<NewTodo, Error> {
        Ok(NewTodo {
            title: parse_title(&self.title)?,
            description: self.description,
            is_done: self.is_done.unwrap_or(false),
        })
    }
}

/// Partial update body; absent fields are left unchanged and an explicit
/// `"description": null` clears the description.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub is_done: Option<bool>,
}

/// Wrap any present value, including `null`, so absence stays `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl UpdateTodoRequest {
    fn into_patch(self) -> Result<TodoPatch, Error> {
        Ok(TodoPatch {
            title: self.title.as_deref().map(parse_title).transpose()?,
            description: self.description,
            is_done: self.is_done,
        })
    }
}

/// Create a todo owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Inactive account", body = Error)
    ),
    tags = ["todos"],
    operation_id = "createTodo"
)]
#[post("/todos")]
pub async fn create_todo(
    state: web::Data<HttpState>,
    caller: ActiveCaller,
    payload: web::Json<CreateTodoRequest>,
) -> ApiResult<HttpResponse> {
    let new_todo = payload.into_inner().into_new_todo()?;
    let todo = state.todos.create_todo(&caller, new_todo).await?;
    Ok(HttpResponse::Created().json(TodoResponse::from(&todo)))
}

/// A page of the caller's todos, ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/todos",
    params(
        ("skip" = Option<i64>, Query, description = "Items to skip"),
        ("limit" = Option<i64>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Caller's todos", body = [TodoResponse]),
        (status = 400, description = "Invalid paging", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Inactive account", body = Error)
    ),
    tags = ["todos"],
    operation_id = "listTodos"
)]
#[get("/todos")]
pub async fn list_todos(
    state: web::Data<HttpState>,
    caller: ActiveCaller,
    query: web::Query<PageParams>,
) -> ApiResult<web::Json<Vec<TodoResponse>>> {
    let page = parse_page(query.into_inner())?;
    let todos = state.todos_query.list_todos(&caller, page).await?;
    Ok(web::Json(todos.iter().map(TodoResponse::from).collect()))
}

/// One of the caller's todos with its owner.
#[utoipa::path(
    get,
    path = "/api/v1/todos/{id}",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo", body = TodoWithOwnerResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Inactive account", body = Error),
        (status = 404, description = "No such todo for this caller", body = Error)
    ),
    tags = ["todos"],
    operation_id = "getTodo"
)]
#[get("/todos/{id}")]
pub async fn get_todo(
    state: web::Data<HttpState>,
    caller: ActiveCaller,
    path: web::Path<i64>,
) -> ApiResult<web::Json<TodoWithOwnerResponse>> {
    let id = TodoId::new(path.into_inner());
    let todo = state.todos_query.get_todo(&caller, id).await?;
    Ok(web::Json(TodoWithOwnerResponse {
        todo: TodoResponse::from(&todo),
        owner: UserResponse::from(caller.user()),
    }))
}

/// Partially update one of the caller's todos.
#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}",
    params(("id" = i64, Path, description = "Todo id")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Updated todo", body = TodoResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Inactive account", body = Error),
        (status = 404, description = "No such todo for this caller", body = Error)
    ),
    tags = ["todos"],
    operation_id = "updateTodo"
)]
#[put("/todos/{id}")]
pub async fn update_todo(
    state: web::Data<HttpState>,
    caller: ActiveCaller,
    path: web::Path<i64>,
    payload: web::Json<UpdateTodoRequest>,
) -> ApiResult<web::Json<TodoResponse>> {
    let id = TodoId::new(path.into_inner());
    let patch = payload.into_inner().into_patch()?;
    let todo = state.todos.update_todo(&caller, id, patch).await?;
    Ok(web::Json(TodoResponse::from(&todo)))
}

/// Delete one of the caller's todos.
#[utoipa::path(
    delete,
    path = "/api/v1/todos/{id}",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Inactive account", body = Error),
        (status = 404, description = "No such todo for this caller", body = Error)
    ),
    tags = ["todos"],
    operation_id = "deleteTodo"
)]
#[delete("/todos/{id}")]
pub async fn delete_todo(
    state: web::Data<HttpState>,
    caller: ActiveCaller,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = TodoId::new(path.into_inner());
    state.todos.delete_todo(&caller, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
