//! Process-local store implementing both repository ports.
//!
//! Used when no database URL is configured and by the HTTP tests. Users and
//! todos live behind one mutex so the owner check and the insert that relies
//! on it happen atomically, mirroring the database constraints.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::Page;

use crate::domain::ports::{
    TodoRepository, TodoRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{Email, NewTodo, NewUser, Todo, TodoId, TodoPatch, User, UserId, UserUpdate};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, User>,
    todos: BTreeMap<i64, Todo>,
    last_user_id: i64,
    last_todo_id: i64,
}

impl State {
    fn email_taken(&self, email: &Email, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| user.email() == email && Some(user.id()) != except)
    }

    fn owned(&self, id: TodoId, owner_id: UserId) -> Option<&Todo> {
        self.todos
            .get(&id.get())
            .filter(|todo| todo.owner_id() == owner_id)
    }
}

/// In-memory users and todos with sequential ids starting at 1.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::query)?;
        if state.email_taken(&user.email, None) {
            return Err(UserRepositoryError::duplicate_email(user.email.as_ref()));
        }

        let id = state.last_user_id + 1;
        state.last_user_id = id;
        let created = User::new(
            UserId::new(id),
            user.email.clone(),
            user.password_hash.clone(),
            user.flags.is_active,
            user.flags.is_admin,
        );
        state.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state.users.get(&id.get()).cloned())
    }

    async fn update(
        &self,
        id: UserId,
        update: &UserUpdate,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::query)?;
        let Some(current) = state.users.get(&id.get()).cloned() else {
            return Ok(None);
        };
        if let Some(email) = &update.email {
            if state.email_taken(email, Some(id)) {
                return Err(UserRepositoryError::duplicate_email(email.as_ref()));
            }
        }

        let updated = update.apply(current);
        state.users.insert(id.get(), updated.clone());
        Ok(Some(updated))
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(page.apply(state.users.values().cloned()).collect())
    }
}

#[async_trait]
impl TodoRepository for MemoryStore {
    async fn create(&self, owner_id: UserId, todo: &NewTodo) -> Result<Todo, TodoRepositoryError> {
        let mut state = self.lock().map_err(TodoRepositoryError::query)?;
        if !state.users.contains_key(&owner_id.get()) {
            return Err(TodoRepositoryError::owner_not_found(owner_id.get()));
        }

        let id = state.last_todo_id + 1;
        state.last_todo_id = id;
        let created = Todo::new(
            TodoId::new(id),
            todo.title.clone(),
            todo.description.clone(),
            todo.is_done,
            owner_id,
        );
        state.todos.insert(id, created.clone());
        Ok(created)
    }

    async fn find_owned(
        &self,
        id: TodoId,
        owner_id: UserId,
    ) -> Result<Option<Todo>, TodoRepositoryError> {
        let state = self.lock().map_err(TodoRepositoryError::query)?;
        Ok(state.owned(id, owner_id).cloned())
    }

    async fn list_owned(
        &self,
        owner_id: UserId,
        page: Page,
    ) -> Result<Vec<Todo>, TodoRepositoryError> {
        let state = self.lock().map_err(TodoRepositoryError::query)?;
        let owned = state
            .todos
            .values()
            .filter(|todo| todo.owner_id() == owner_id)
            .cloned();
        Ok(page.apply(owned).collect())
    }

    async fn update_owned(
        &self,
        id: TodoId,
        owner_id: UserId,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, TodoRepositoryError> {
        let mut state = self.lock().map_err(TodoRepositoryError::query)?;
        let Some(current) = state.owned(id, owner_id).cloned() else {
            return Ok(None);
        };

        let updated = patch.apply(current);
        state.todos.insert(id.get(), updated.clone());
        Ok(Some(updated))
    }

    async fn delete_owned(
        &self,
        id: TodoId,
        owner_id: UserId,
    ) -> Result<Option<Todo>, TodoRepositoryError> {
        let mut state = self.lock().map_err(TodoRepositoryError::query)?;
        if state.owned(id, owner_id).is_none() {
            return Ok(None);
        }
        Ok(state.todos.remove(&id.get()))
    }
}
