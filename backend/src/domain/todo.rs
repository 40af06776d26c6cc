//! Todo items owned by exactly one identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Maximum accepted title length, in characters.
pub const TITLE_MAX: usize = 255;

/// Validation errors raised while building todo values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoValidationError {
    /// Title was blank once trimmed.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeded [`TITLE_MAX`] characters.
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

impl TodoValidationError {
    /// Stable machine-readable code used in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "empty_title",
            Self::TitleTooLong { .. } => "title_too_long",
        }
    }
}

/// Store-assigned surrogate identifier of a todo item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Todo title, trimmed, non-empty and at most [`TITLE_MAX`] characters.
///
/// # Examples
/// ```
/// use todo_backend::domain::TodoTitle;
///
/// let title = TodoTitle::new("  buy milk ").expect("valid title");
/// assert_eq!(title.as_ref(), "buy milk");
/// assert!(TodoTitle::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoTitle(String);

impl TodoTitle {
    /// Validate and construct a title.
    pub fn new(title: impl AsRef<str>) -> Result<Self, TodoValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TodoValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(TodoValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TodoTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<TodoTitle> for String {
    fn from(value: TodoTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for TodoTitle {
    type Error = TodoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Persisted todo item.
///
/// ## Invariants
/// - `owner_id` is fixed at creation and never reassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id: TodoId,
    title: TodoTitle,
    description: Option<String>,
    is_done: bool,
    owner_id: UserId,
}

impl Todo {
    /// Assemble a todo from persisted parts.
    pub fn new(
        id: TodoId,
        title: TodoTitle,
        description: Option<String>,
        is_done: bool,
        owner_id: UserId,
    ) -> Self {
        Self {
            id,
            title,
            description,
            is_done,
            owner_id,
        }
    }

    /// Surrogate identifier.
    pub fn id(&self) -> TodoId {
        self.id
    }

    /// Title.
    pub fn title(&self) -> &TodoTitle {
        &self.title
    }

    /// Optional free-form description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Completion flag.
    pub fn is_done(&self) -> bool {
        self.is_done
    }

    /// Owning identity.
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// Todo content supplied at creation; the owner comes from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    /// Title.
    pub title: TodoTitle,
    /// Optional description.
    pub description: Option<String>,
    /// Initial completion flag, `false` unless stated.
    pub is_done: bool,
}

impl NewTodo {
    /// Incomplete todo with the given title and no description.
    pub fn titled(title: TodoTitle) -> Self {
        Self {
            title,
            description: None,
            is_done: false,
        }
    }
}

/// Partial todo update; `None` leaves a field untouched.
///
/// `description` distinguishes "leave as is" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// Replacement title.
    pub title: Option<TodoTitle>,
    /// Replacement or cleared description.
    pub description: Option<Option<String>>,
    /// Replacement completion flag.
    pub is_done: Option<bool>,
}

impl TodoPatch {
    /// Whether applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.is_done.is_none()
    }

    /// Merge the patch into `todo`. The owner is never touched.
    pub fn apply(&self, mut todo: Todo) -> Todo {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(is_done) = self.is_done {
            todo.is_done = is_done;
        }
        todo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn todo() -> Todo {
        Todo::new(
            TodoId::new(7),
            TodoTitle::new("write report").expect("valid title"),
            Some("quarterly".to_owned()),
            false,
            UserId::new(1),
        )
    }

    #[rstest]
    #[case("", TodoValidationError::EmptyTitle)]
    #[case(" \t ", TodoValidationError::EmptyTitle)]
    fn rejects_blank_titles(#[case] raw: &str, #[case] expected: TodoValidationError) {
        assert_eq!(TodoTitle::new(raw), Err(expected));
    }

    #[rstest]
    fn title_length_counts_characters() {
        assert!(TodoTitle::new("é".repeat(TITLE_MAX)).is_ok());
        assert_eq!(
            TodoTitle::new("x".repeat(TITLE_MAX + 1)),
            Err(TodoValidationError::TitleTooLong { max: TITLE_MAX })
        );
    }

    #[rstest]
    fn new_todo_defaults_to_incomplete() {
        let new = NewTodo::titled(TodoTitle::new("a").expect("valid title"));
        assert!(!new.is_done);
        assert!(new.description.is_none());
    }

    #[rstest]
    fn empty_patch_is_idempotent(todo: Todo) {
        let patch = TodoPatch::default();
        assert!(patch.is_empty());
        let once = patch.apply(todo.clone());
        let twice = patch.apply(once.clone());
        assert_eq!(once, todo);
        assert_eq!(twice, todo);
    }

    #[rstest]
    fn patch_merges_fields_and_keeps_owner(todo: Todo) {
        let patch = TodoPatch {
            is_done: Some(true),
            description: Some(None),
            ..TodoPatch::default()
        };
        let updated = patch.apply(todo.clone());
        assert!(updated.is_done());
        assert_eq!(updated.description(), None);
        assert_eq!(updated.title(), todo.title());
        assert_eq!(updated.owner_id(), todo.owner_id());
    }
}
