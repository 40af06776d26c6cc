//! Driving port for the password login use-case.
//!
//! Inbound adapters hand over validated credentials and receive a signed
//! bearer token, without knowing how identities are stored or tokens signed.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, LoginCredentials};

/// Message returned for any failed login.
///
/// Unknown emails and wrong passwords are deliberately indistinguishable.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check the credentials and issue a token for the matching identity.
    ///
    /// Inactive accounts still receive a token; the authorization gate
    /// rejects them on use.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error>;
}
