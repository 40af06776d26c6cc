//! Driven port for issuing and verifying bearer tokens.

use chrono::Duration;

use crate::domain::{AccessToken, Email, TokenSubject, UserId};

use super::define_port_error;

define_port_error! {
    /// Token failures.
    ///
    /// Verification reports a single [`TokenServiceError::InvalidToken`]
    /// kind whatever the cause; adapters log the precise reason.
    pub enum TokenServiceError {
        /// Signature, payload or expiry check failed.
        InvalidToken => "token is invalid or expired",
        /// The token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Stateless signed tokens carrying the identity key as subject and the
/// identity id alongside it.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token for identity `user_id` holding `email` that expires
    /// `ttl` from now.
    fn issue(
        &self,
        user_id: UserId,
        email: &Email,
        ttl: Duration,
    ) -> Result<AccessToken, TokenServiceError>;

    /// Verify `token` and return its subject claims.
    ///
    /// Fails when the token is expired, including exactly at expiry.
    fn verify(&self, token: &str) -> Result<TokenSubject, TokenServiceError>;
}
