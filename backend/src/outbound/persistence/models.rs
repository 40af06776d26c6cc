//! Diesel row structs. Internal to the persistence adapters.

use diesel::prelude::*;

use crate::domain::{
    Email, NewTodo, NewUser, PasswordHash, Todo, TodoId, TodoPatch, TodoTitle, User, UserId,
    UserUpdate,
};

use super::schema::{todos, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_admin: bool,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::new(&row.email)
            .map_err(|err| format!("stored email for user {} is invalid: {err}", row.id))?;
        Ok(User::new(
            UserId::new(row.id),
            email,
            PasswordHash::new(row.hashed_password),
            row.is_active,
            row.is_admin,
        ))
    }
}

/// Insertable `users` row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub hashed_password: &'a str,
    pub is_active: bool,
    pub is_admin: bool,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            email: user.email.as_ref(),
            hashed_password: user.password_hash.as_str(),
            is_active: user.flags.is_active,
            is_admin: user.flags.is_admin,
        }
    }
}

/// Partial `users` update; `None` columns are left out of the statement.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub email: Option<&'a str>,
    pub hashed_password: Option<&'a str>,
    pub is_active: Option<bool>,
}

impl<'a> From<&'a UserUpdate> for UserChangeset<'a> {
    fn from(update: &'a UserUpdate) -> Self {
        Self {
            email: update.email.as_ref().map(AsRef::as_ref),
            hashed_password: update.password_hash.as_ref().map(PasswordHash::as_str),
            is_active: update.is_active,
        }
    }
}

/// Row read from `todos`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TodoRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_done: bool,
    pub owner_id: i64,
}

impl TryFrom<TodoRow> for Todo {
    type Error = String;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let title = TodoTitle::new(&row.title)
            .map_err(|err| format!("stored title for todo {} is invalid: {err}", row.id))?;
        Ok(Todo::new(
            TodoId::new(row.id),
            title,
            row.description,
            row.is_done,
            UserId::new(row.owner_id),
        ))
    }
}

/// Insertable `todos` row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = todos)]
pub(crate) struct NewTodoRow<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub is_done: bool,
    pub owner_id: i64,
}

impl<'a> NewTodoRow<'a> {
    pub fn new(owner_id: UserId, todo: &'a NewTodo) -> Self {
        Self {
            title: todo.title.as_ref(),
            description: todo.description.as_deref(),
            is_done: todo.is_done,
            owner_id: owner_id.get(),
        }
    }
}

/// Partial `todos` update. `description: Some(None)` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = todos)]
pub(crate) struct TodoChangeset<'a> {
    pub title: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub is_done: Option<bool>,
}

impl<'a> From<&'a TodoPatch> for TodoChangeset<'a> {
    fn from(patch: &'a TodoPatch) -> Self {
        Self {
            title: patch.title.as_ref().map(AsRef::as_ref),
            description: patch.description.as_ref().map(Option::as_deref),
            is_done: patch.is_done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user_row(email: &str) -> UserRow {
        UserRow {
            id: 3,
            email: email.to_owned(),
            hashed_password: "$argon2id$stub".to_owned(),
            is_active: true,
            is_admin: false,
        }
    }

    #[rstest]
    fn user_row_converts_to_domain() {
        let user = User::try_from(user_row("a@x.io")).expect("valid row");
        assert_eq!(user.id(), UserId::new(3));
        assert_eq!(user.email().as_ref(), "a@x.io");
        assert_eq!(user.password_hash().as_str(), "$argon2id$stub");
    }

    #[rstest]
    fn user_row_with_corrupt_email_is_rejected() {
        let err = User::try_from(user_row("nope")).expect_err("invalid email");
        assert!(err.contains("user 3"));
    }

    #[rstest]
    fn todo_row_with_blank_title_is_rejected() {
        let row = TodoRow {
            id: 9,
            title: "   ".to_owned(),
            description: None,
            is_done: false,
            owner_id: 1,
        };
        let err = Todo::try_from(row).expect_err("blank title");
        assert!(err.contains("todo 9"));
    }

    #[rstest]
    fn todo_changeset_distinguishes_clear_from_keep() {
        let keep = TodoPatch::default();
        let clear = TodoPatch {
            description: Some(None),
            ..TodoPatch::default()
        };

        assert_eq!(TodoChangeset::from(&keep).description, None);
        assert_eq!(TodoChangeset::from(&clear).description, Some(None));
    }

    #[rstest]
    fn user_changeset_skips_untouched_columns() {
        let update = UserUpdate {
            is_active: Some(false),
            ..UserUpdate::default()
        };
        let changeset = UserChangeset::from(&update);

        assert_eq!(changeset.email, None);
        assert_eq!(changeset.hashed_password, None);
        assert_eq!(changeset.is_active, Some(false));
    }
}
