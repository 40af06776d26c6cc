//! Argon2id password hashing producing PHC strings.

use argon2::password_hash::{PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialCodec, CredentialCodecError};

const SALT_LEN: usize = 16;

/// Argon2 cost parameters. `None` keeps the library default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB.
    pub memory_kib: Option<u32>,
    /// Number of passes.
    pub iterations: Option<u32>,
    /// Degree of parallelism.
    pub parallelism: Option<u32>,
}

/// Credential codec using Argon2id with a random 16-byte salt per hash.
///
/// Verification reads the parameters embedded in the stored hash, so raising
/// the cost does not invalidate existing passwords.
///
/// # Examples
/// ```
/// use todo_backend::domain::ports::CredentialCodec;
/// use todo_backend::outbound::security::{Argon2CredentialCodec, Argon2Params};
///
/// let codec = Argon2CredentialCodec::new(Argon2Params {
///     memory_kib: Some(8),
///     iterations: Some(1),
///     parallelism: Some(1),
/// })
/// .expect("valid parameters");
/// let hash = codec.hash("correct horse").expect("hash");
/// assert!(codec.verify("correct horse", &hash));
/// assert!(!codec.verify("wrong horse", &hash));
/// ```
#[derive(Clone)]
pub struct Argon2CredentialCodec {
    argon2: Argon2<'static>,
}

impl Argon2CredentialCodec {
    /// Build a codec, rejecting parameters Argon2 cannot use.
    pub fn new(params: Argon2Params) -> Result<Self, CredentialCodecError> {
        let defaults = Params::default();
        let params = Params::new(
            params.memory_kib.unwrap_or_else(|| defaults.m_cost()),
            params.iterations.unwrap_or_else(|| defaults.t_cost()),
            params.parallelism.unwrap_or_else(|| defaults.p_cost()),
            None,
        )
        .map_err(|err| CredentialCodecError::hashing(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2CredentialCodec {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialCodec for Argon2CredentialCodec {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialCodecError> {
        let mut salt_bytes = [0_u8; SALT_LEN];
        getrandom::getrandom(&mut salt_bytes)
            .map_err(|err| CredentialCodecError::hashing(err.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| CredentialCodecError::hashing(err.to_string()))?;
        let phc = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| CredentialCodecError::hashing(err.to_string()))?;
        Ok(PasswordHash::new(phc.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool {
        match PhcString::new(hash.as_str()) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
