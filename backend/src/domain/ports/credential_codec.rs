//! Driven port for one-way password hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised while producing a hash.
    pub enum CredentialCodecError {
        /// The hashing primitive rejected its input or parameters.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted one-way password hashing.
///
/// Implementations are CPU bound and synchronous; async callers move them
/// onto the blocking pool.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialCodec: Send + Sync {
    /// Hash `plaintext` with a fresh random salt.
    ///
    /// Two calls with the same input yield different hashes that both verify.
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialCodecError>;

    /// Whether `plaintext` matches `hash`. Malformed hashes never match.
    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool;
}
