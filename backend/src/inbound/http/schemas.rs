//! JSON response bodies and their OpenAPI schemas.
//!
//! Domain types stay free of transport concerns; handlers convert into these
//! shapes at the edge. Field names follow the client's snake_case contract.
//! No shape here exposes the stored password hash.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UserWithTodos;
use crate::domain::{AccessToken, Todo, User};

/// Public view of an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub is_active: bool,
    pub is_admin: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            email: user.email().to_string(),
            is_active: user.is_active(),
            is_admin: user.is_admin(),
        }
    }
}

/// Todo as returned by list, create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoResponse {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "Buy milk")]
    pub title: String,
    pub description: Option<String>,
    pub is_done: bool,
    pub owner_id: i64,
}

impl From<&Todo> for TodoResponse {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id().get(),
            title: todo.title().as_ref().to_owned(),
            description: todo.description().map(str::to_owned),
            is_done: todo.is_done(),
            owner_id: todo.owner_id().get(),
        }
    }
}

/// Single todo with a summary of its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoWithOwnerResponse {
    #[serde(flatten)]
    pub todo: TodoResponse,
    pub owner: UserResponse,
}

/// Identity with one page of its todos, for administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserWithTodosResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub todos: Vec<TodoResponse>,
}

impl From<&UserWithTodos> for UserWithTodosResponse {
    fn from(value: &UserWithTodos) -> Self {
        Self {
            user: UserResponse::from(&value.user),
            todos: value.todos.iter().map(TodoResponse::from).collect(),
        }
    }
}

/// OAuth2 password-flow token response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Seconds until the token expires.
    #[schema(example = 1800)]
    pub expires_in: i64,
}

impl From<&AccessToken> for TokenResponse {
    fn from(token: &AccessToken) -> Self {
        Self {
            access_token: token.as_str().to_owned(),
            token_type: "bearer".to_owned(),
            expires_in: token.expires_in(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Email, PasswordHash, TodoId, TodoTitle, UserId};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn user() -> User {
        User::new(
            UserId::new(1),
            Email::new("ada@example.com").expect("valid email"),
            PasswordHash::new("$argon2id$v=19$secret"),
            true,
            false,
        )
    }

    #[rstest]
    fn user_response_never_contains_hash() {
        let value = serde_json::to_value(UserResponse::from(&user())).expect("serialise");
        let text = value.to_string();

        assert!(!text.contains("argon2"));
        assert!(value.get("hashed_password").is_none());
        assert_eq!(value.get("email"), Some(&Value::from("ada@example.com")));
    }

    #[rstest]
    fn todo_with_owner_flattens_todo_fields() {
        let todo = Todo::new(
            TodoId::new(7),
            TodoTitle::new("Buy milk").expect("valid title"),
            None,
            false,
            UserId::new(1),
        );
        let body = TodoWithOwnerResponse {
            todo: TodoResponse::from(&todo),
            owner: UserResponse::from(&user()),
        };

        let value = serde_json::to_value(body).expect("serialise");
        assert_eq!(
            value,
            json!({
                "id": 7,
                "title": "Buy milk",
                "description": null,
                "is_done": false,
                "owner_id": 1,
                "owner": {
                    "id": 1,
                    "email": "ada@example.com",
                    "is_active": true,
                    "is_admin": false
                }
            })
        );
    }
}
