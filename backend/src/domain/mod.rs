//! Domain primitives, services and ports.
//!
//! Purpose: hold the transport- and storage-agnostic core of the todo
//! service. Types validate their invariants on construction; services are
//! generic over the driven ports they use.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Email, UserId, PasswordHash: identity model.
//! - Todo, TodoTitle, TodoId, TodoPatch: resource model.
//! - ResolvedIdentity, Caller, AdminCaller: authorization typestates.
//! - Services implementing the driving ports in [`ports`].

pub mod account_service;
pub mod auth;
pub mod authorization;
pub mod authorization_gate;
pub mod error;
pub mod identity_store;
pub mod login_service;
pub mod ports;
pub mod todo;
pub mod todo_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AccessToken, LoginCredentials, LoginValidationError, PASSWORD_MIN, Password, TokenSubject,
};
pub use self::authorization::{
    AdminCaller, Caller, Capability, INACTIVE_MESSAGE, NOT_ADMIN_MESSAGE, ResolvedIdentity, Role,
    UNAUTHENTICATED_MESSAGE,
};
pub use self::authorization_gate::TokenAuthorizationGate;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_store::{IdentityError, IdentityStore};
pub use self::login_service::PasswordLoginService;
pub use self::todo::{
    NewTodo, TITLE_MAX, Todo, TodoId, TodoPatch, TodoTitle, TodoValidationError,
};
pub use self::todo_service::TodoService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    AccountFlags, EMAIL_MAX, Email, NewUser, PasswordHash, User, UserId, UserUpdate,
    UserValidationError,
};
