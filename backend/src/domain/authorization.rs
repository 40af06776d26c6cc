//! Authorization typestates.
//!
//! A request moves through `NoCredential -> Resolved -> Authorized ->
//! AdminAuthorized`. Each stage is a distinct type, and protected domain
//! operations take a [`Caller`] or [`AdminCaller`], so they cannot run
//! without the earlier checks. Only the authorization gate can produce a
//! [`ResolvedIdentity`].

use super::{Error, User};

/// Message returned when a token cannot be turned into an identity.
pub const UNAUTHENTICATED_MESSAGE: &str = "could not validate credentials";
/// Message returned when an inactive identity calls a protected operation.
pub const INACTIVE_MESSAGE: &str = "inactive user";
/// Message returned when a non-admin calls an admin operation.
pub const NOT_ADMIN_MESSAGE: &str = "not enough permissions";

/// Role derived from an identity's persisted flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// No credential was presented.
    Anonymous,
    /// Regular account.
    User,
    /// Account allowed to list every identity.
    Admin,
}

/// Operation families guarded by role checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create, read, update and delete todos owned by the caller.
    ManageOwnTodos,
    /// List and inspect every identity.
    ListIdentities,
}

impl Role {
    /// Whether this role grants `capability`.
    pub fn grants(self, capability: Capability) -> bool {
        match (self, capability) {
            (Self::Anonymous, _) => false,
            (Self::User, Capability::ManageOwnTodos) => true,
            (Self::User, Capability::ListIdentities) => false,
            (Self::Admin, _) => true,
        }
    }
}

/// Identity resolved from a verified token; not yet checked for activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity(User);

impl ResolvedIdentity {
    pub(crate) fn new(user: User) -> Self {
        Self(user)
    }

    /// Resolved identity.
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Reject inactive accounts.
    pub fn require_active(self) -> Result<Caller, Error> {
        if self.0.is_active() {
            Ok(Caller(self.0))
        } else {
            Err(Error::forbidden(INACTIVE_MESSAGE))
        }
    }
}

/// Active identity allowed to call protected operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(User);

impl Caller {
    /// Calling identity.
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Reject callers without the admin role.
    pub fn require_admin(self) -> Result<AdminCaller, Error> {
        if self.0.can(Capability::ListIdentities) {
            Ok(AdminCaller(self.0))
        } else {
            Err(Error::forbidden(NOT_ADMIN_MESSAGE))
        }
    }
}

/// Active identity holding the admin role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCaller(User);

impl AdminCaller {
    /// Calling administrator.
    pub fn user(&self) -> &User {
        &self.0
    }
}
