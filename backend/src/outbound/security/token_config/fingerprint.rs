//! Token secret fingerprinting for operational visibility.
//!
//! Operators compare the logged fingerprint across replicas to confirm they
//! share a signing secret without the secret itself reaching the logs.

use sha2::{Digest, Sha256};

use super::TokenSecret;

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// First 8 bytes of the SHA-256 of the secret, as 16 lowercase hex digits.
///
/// # Examples
///
/// ```rust
/// use todo_backend::outbound::security::TokenSecret;
/// use todo_backend::outbound::security::token_config::fingerprint::secret_fingerprint;
///
/// let fp = secret_fingerprint(&TokenSecret::generate());
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &TokenSecret) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fingerprint_is_deterministic_lowercase_hex() {
        let secret = TokenSecret::from_bytes(vec![b'a'; 32]);
        let fp = secret_fingerprint(&secret);
        assert_eq!(fp, secret_fingerprint(&secret));
        assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
        assert_eq!(fp, fp.to_lowercase());
    }

    #[rstest]
    fn different_secrets_differ() {
        let first = secret_fingerprint(&TokenSecret::from_bytes(vec![b'a'; 32]));
        let second = secret_fingerprint(&TokenSecret::from_bytes(vec![b'b'; 32]));
        assert_ne!(first, second);
    }
}
