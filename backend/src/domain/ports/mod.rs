//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, codec, token service) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`, login, gate) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod authorization_gate;
mod credential_codec;
mod login_service;
mod todo_repository;
mod todos_command;
mod todos_query;
mod token_service;
mod user_repository;
mod users_command;
mod users_query;

pub use authorization_gate::AuthorizationGate;
#[cfg(test)]
pub use authorization_gate::MockAuthorizationGate;
#[cfg(test)]
pub use credential_codec::MockCredentialCodec;
pub use credential_codec::{CredentialCodec, CredentialCodecError};
pub use login_service::{INVALID_CREDENTIALS_MESSAGE, LoginService};
#[cfg(test)]
pub use todo_repository::MockTodoRepository;
pub use todo_repository::{TodoRepository, TodoRepositoryError};
#[cfg(test)]
pub use todos_command::MockTodosCommand;
pub use todos_command::TodosCommand;
#[cfg(test)]
pub use todos_query::MockTodosQuery;
pub use todos_query::TodosQuery;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenService, TokenServiceError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
pub use users_command::{UserChanges, UsersCommand};
pub use users_query::{UserWithTodos, UsersQuery};
