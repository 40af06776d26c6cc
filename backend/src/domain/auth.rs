//! Authentication primitives: login credentials, passwords and issued tokens.
//!
//! Handlers build these from raw strings before talking to a driving port,
//! so services only ever see validated values.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use crate::domain::UserId;

/// Minimum password length, in characters, enforced before hashing.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when login or password inputs are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// Password was shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl LoginValidationError {
    /// Stable machine-readable code used in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::EmptyPassword => "empty_password",
            Self::PasswordTooShort { .. } => "password_too_short",
        }
    }
}

/// Credentials presented at login.
///
/// ## Invariants
/// - `username` is trimmed and non-empty. It is matched exactly against the
///   stored email, so it is not required to be email shaped.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use todo_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "hunter22").unwrap();
/// assert_eq!(creds.username(), "ada@example.com");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the identity lookup.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Plaintext password accepted for registration or a password change.
///
/// The buffer is zeroed on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a new password. Length is counted in characters.
    pub fn new(raw: &str) -> Result<Self, LoginValidationError> {
        if raw.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        if raw.chars().count() < PASSWORD_MIN {
            return Err(LoginValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Plaintext value, for hashing only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Identity claims carried by a verified token.
///
/// A token only resolves while both fields still name the same stored
/// identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    user_id: UserId,
    email: String,
}

impl TokenSubject {
    /// Pair an identity id with the email it held at issue time.
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    /// Identity the token was issued to.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Email held by the identity when the token was issued.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

/// Signed bearer token together with its issue and expiry instants.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: Zeroizing<String>,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Wrap an encoded token.
    pub fn new(
        token: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token: Zeroizing::new(token.into()),
            issued_at,
            expires_at,
        }
    }

    /// Encoded token as sent in the `Authorization` header.
    pub fn as_str(&self) -> &str {
        self.token.as_str()
    }

    /// Instant the token was signed.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Instant at which the token stops verifying.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Lifetime in whole seconds, never negative.
    pub fn expires_in(&self) -> i64 {
        (self.expires_at - self.issued_at).num_seconds().max(0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
