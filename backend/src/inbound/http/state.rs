//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be exercised against in-memory adapters or mocks.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::ports::{
    AuthorizationGate, CredentialCodec, LoginService, TodoRepository, TodosCommand, TodosQuery,
    TokenService, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{
    AccountService, IdentityStore, PasswordLoginService, TodoService, TokenAuthorizationGate,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub gate: Arc<dyn AuthorizationGate>,
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub todos: Arc<dyn TodosCommand>,
    pub todos_query: Arc<dyn TodosQuery>,
}

/// Parameter object for [`HttpState::new`].
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub gate: Arc<dyn AuthorizationGate>,
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub todos: Arc<dyn TodosCommand>,
    pub todos_query: Arc<dyn TodosQuery>,
}

impl HttpState {
    /// Assemble state from its ports.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            gate,
            users,
            users_query,
            todos,
            todos_query,
        } = ports;
        Self {
            login,
            gate,
            users,
            users_query,
            todos,
            todos_query,
        }
    }
}

impl HttpState {
    /// Wire the domain services over the given driven adapters.
    ///
    /// `ttl` is the lifetime of tokens issued by the login endpoint.
    pub fn from_adapters<U, T, C, K>(
        users: Arc<U>,
        todos: Arc<T>,
        codec: Arc<C>,
        tokens: Arc<K>,
        ttl: Duration,
    ) -> Self
    where
        U: UserRepository + 'static,
        T: TodoRepository + 'static,
        C: CredentialCodec + 'static,
        K: TokenService + 'static,
    {
        let identities = IdentityStore::new(users.clone(), codec);
        let accounts = Arc::new(AccountService::new(identities.clone(), todos.clone()));
        let todo_service = Arc::new(TodoService::new(todos));

        Self::new(HttpStatePorts {
            login: Arc::new(PasswordLoginService::new(identities, tokens.clone(), ttl)),
            gate: Arc::new(TokenAuthorizationGate::new(users, tokens)),
            users: accounts.clone(),
            users_query: accounts,
            todos: todo_service.clone(),
            todos_query: todo_service,
        })
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
