//! Driving port that turns a presented bearer token into an identity.

use async_trait::async_trait;

use crate::domain::{Error, ResolvedIdentity};

/// Single entry point for authenticating protected requests.
///
/// Only [`AuthorizationGate::resolve`] produces a [`ResolvedIdentity`]; the
/// active and admin checks are the typestate transitions on that value.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorizationGate: Send + Sync {
    /// Verify `token` and load the identity named by its subject.
    ///
    /// Bad signatures, expired tokens and subjects that no longer exist all
    /// fail with the same unauthorized error.
    async fn resolve(&self, token: &str) -> Result<ResolvedIdentity, Error>;
}
