//! Driving port for identity mutations: registration and self-service
//! updates.

use async_trait::async_trait;

use crate::domain::{Caller, Email, Error, Password, User};

/// Self-service changes; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    /// New identity key.
    pub email: Option<Email>,
    /// New password, hashed before it reaches the store.
    pub password: Option<Password>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl UserChanges {
    /// Whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.is_active.is_none()
    }
}

/// Domain use-case port for identity mutations.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register an active, non-admin identity.
    async fn register(&self, email: Email, password: Password) -> Result<User, Error>;

    /// Apply `changes` to the caller's own identity.
    async fn update_me(&self, caller: &Caller, changes: UserChanges) -> Result<User, Error>;
}
