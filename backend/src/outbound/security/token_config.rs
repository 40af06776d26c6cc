//! Token configuration parsing and validation.
//!
//! Reads the HS256 signing secret and the token lifetime from the
//! environment through [`mockable::Env`], so every rule can be tested without
//! touching the process environment.

use std::fmt;
use std::path::PathBuf;

use chrono::Duration;
use mockable::Env;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

pub mod fingerprint;

const SECRET_DEFAULT_PATH: &str = "/var/run/secrets/token_secret";
const SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;
const DEFAULT_TTL_MINUTES: i64 = 30;
const SECRET_FILE_ENV: &str = "TOKEN_SECRET_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "TOKEN_ALLOW_EPHEMERAL";
const TTL_MINUTES_ENV: &str = "TOKEN_TTL_MINUTES";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const TTL_EXPECTED: &str = "a positive number of minutes";

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to defaults and warn.
    Debug,
    /// Release builds reject missing or invalid settings.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// HMAC secret used to sign tokens. Zeroed on drop; never printed.
#[derive(Clone)]
pub struct TokenSecret(Zeroizing<Vec<u8>>);

impl TokenSecret {
    /// Wrap raw secret bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Generate a random secret that lives as long as the process.
    pub fn generate() -> Self {
        let mut bytes = vec![0_u8; EPHEMERAL_SECRET_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// Raw secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(<redacted>)")
    }
}

/// Token settings derived from the environment.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// Signing secret.
    pub secret: TokenSecret,
    /// Lifetime of issued tokens.
    pub ttl: Duration,
    /// Whether the secret was generated for this process only.
    pub ephemeral: bool,
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file is too short for release builds.
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not allow ephemeral secrets.
    #[error("TOKEN_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build token settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use todo_backend::outbound::security::token_config::{token_settings_from_env, BuildMode};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let secret_path = std::env::temp_dir().join("token_secret_example");
/// std::fs::write(&secret_path, vec![b's'; 32])?;
///
/// let secret_path = secret_path.to_str().expect("valid path").to_string();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "TOKEN_SECRET_FILE" => Some(secret_path.clone()),
///     "TOKEN_TTL_MINUTES" => Some("15".to_string()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release)?;
/// assert_eq!(settings.ttl.num_minutes(), 15);
/// assert!(!settings.ephemeral);
/// # Ok(())
/// # }
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let ttl = ttl_from_env(env, mode)?;
    let (secret, ephemeral) = secret_from_env(env, mode, allow_ephemeral)?;
    Ok(TokenSettings {
        secret,
        ttl,
        ephemeral,
    })
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(true) if mode.is_debug() => Ok(true),
        Some(true) => Err(TokenConfigError::EphemeralNotAllowed),
        Some(false) => Ok(false),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid TOKEN_ALLOW_EPHEMERAL; defaulting to disabled");
            Ok(false)
        }
        None => Err(TokenConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Duration, TokenConfigError> {
    let default = Duration::minutes(DEFAULT_TTL_MINUTES);
    let Some(value) = env.string(TTL_MINUTES_ENV) else {
        return Ok(default);
    };
    match value.trim().parse::<i64>() {
        Ok(minutes) if (1..=i64::from(u32::MAX)).contains(&minutes) => {
            Ok(Duration::minutes(minutes))
        }
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid TOKEN_TTL_MINUTES; using default");
            Ok(default)
        }
        _ => Err(TokenConfigError::InvalidEnv {
            name: TTL_MINUTES_ENV,
            value,
            expected: TTL_EXPECTED,
        }),
    }
}

fn secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<(TokenSecret, bool), TokenConfigError> {
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| SECRET_DEFAULT_PATH.to_string()),
    );

    match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let length = bytes.len();
            if length < SECRET_MIN_LEN {
                if mode == BuildMode::Release {
                    return Err(TokenConfigError::SecretTooShort {
                        path,
                        length,
                        min_len: SECRET_MIN_LEN,
                    });
                }
                warn!(
                    path = %path.display(),
                    length,
                    "token secret shorter than {SECRET_MIN_LEN} bytes (dev only)"
                );
            }
            if length == 0 {
                warn!(path = %path.display(), "token secret is empty; using temporary secret");
                return Ok((TokenSecret::generate(), true));
            }
            Ok((TokenSecret::from_bytes(bytes.to_vec()), false))
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary token secret; tokens will not survive a restart"
                );
                Ok((TokenSecret::generate(), true))
            } else {
                Err(TokenConfigError::SecretRead {
                    path,
                    source: error,
                })
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
