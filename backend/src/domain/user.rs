//! Identity data model.
//!
//! A [`User`] is a registered account. The email is the identity key used in
//! bearer token subjects; the numeric [`UserId`] is assigned by the store and
//! never changes.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Capability, Role};

/// Maximum accepted length for an email address, in characters.
pub const EMAIL_MAX: usize = 254;

/// Validation errors returned by identity constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
        }
    }
}

impl std::error::Error for UserValidationError {}

impl UserValidationError {
    /// Stable machine-readable code used in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "empty_email",
            Self::InvalidEmail => "invalid_email",
            Self::EmailTooLong { .. } => "email_too_long",
        }
    }
}

/// Store-assigned surrogate identifier of an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Identity key of a user.
///
/// ## Invariants
/// - Surrounding whitespace is trimmed on construction.
/// - The value is email shaped and at most [`EMAIL_MAX`] characters.
/// - Comparison is case-sensitive: `Ada@example.com` and `ada@example.com`
///   are distinct identities.
///
/// # Examples
/// ```
/// use todo_backend::domain::Email;
///
/// let email = Email::new("  ada@example.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "ada@example.com");
/// assert!(Email::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque credential hash produced by a credential codec.
///
/// The `Debug` output never includes the hash itself.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash as produced by a codec or read from the store.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Registered identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    password_hash: PasswordHash,
    is_active: bool,
    is_admin: bool,
}

impl User {
    /// Assemble a user from persisted parts.
    pub fn new(
        id: UserId,
        email: Email,
        password_hash: PasswordHash,
        is_active: bool,
        is_admin: bool,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            is_active,
            is_admin,
        }
    }

    /// Surrogate identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Identity key.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Stored credential hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Whether the account may use protected operations.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Whether the account holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Role derived from the persisted flags.
    pub fn role(&self) -> Role {
        if self.is_admin {
            Role::Admin
        } else {
            Role::User
        }
    }

    /// Whether the user's role grants `capability`.
    pub fn can(&self, capability: Capability) -> bool {
        self.role().grants(capability)
    }
}

/// Account flags applied when an identity is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountFlags {
    /// Whether the account starts active.
    pub is_active: bool,
    /// Whether the account starts with the admin role.
    pub is_admin: bool,
}

impl Default for AccountFlags {
    fn default() -> Self {
        Self {
            is_active: true,
            is_admin: false,
        }
    }
}

impl AccountFlags {
    /// Flags for an active administrator.
    pub fn admin() -> Self {
        Self {
            is_active: true,
            is_admin: true,
        }
    }
}

/// Identity record ready to be inserted by a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Identity key.
    pub email: Email,
    /// Hash of the initial password.
    pub password_hash: PasswordHash,
    /// Initial flags.
    pub flags: AccountFlags,
}

/// Field-level changes applied by a repository; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    /// Replacement identity key.
    pub email: Option<Email>,
    /// Replacement credential hash.
    pub password_hash: Option<PasswordHash>,
    /// Replacement active flag.
    pub is_active: Option<bool>,
}

impl UserUpdate {
    /// Whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password_hash.is_none() && self.is_active.is_none()
    }

    /// Merge these changes into `user`.
    pub fn apply(&self, mut user: User) -> User {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(hash) = &self.password_hash {
            user.password_hash = hash.clone();
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
        user
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn user() -> User {
        User::new(
            UserId::new(1),
            Email::new("ada@example.com").expect("valid email"),
            PasswordHash::new("$argon2id$stub"),
            true,
            false,
        )
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("ada", UserValidationError::InvalidEmail)]
    #[case("ada@example", UserValidationError::InvalidEmail)]
    #[case("a da@example.com", UserValidationError::InvalidEmail)]
    fn rejects_malformed_emails(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_emails() {
        let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
        assert_eq!(
            Email::new(raw),
            Err(UserValidationError::EmailTooLong { max: EMAIL_MAX })
        );
    }

    #[rstest]
    fn email_is_trimmed_and_case_preserved() {
        let email = Email::new("  Ada@Example.com\n").expect("valid email");
        assert_eq!(email.as_ref(), "Ada@Example.com");
        assert_ne!(email, Email::new("ada@example.com").expect("valid email"));
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let rendered = format!("{:?}", PasswordHash::new("$argon2id$secret"));
        assert!(!rendered.contains("secret"));
    }

    #[rstest]
    fn role_follows_admin_flag(user: User) {
        assert_eq!(user.role(), Role::User);
        assert!(user.can(Capability::ManageOwnTodos));
        assert!(!user.can(Capability::ListIdentities));

        let admin = User::new(
            user.id(),
            user.email().clone(),
            user.password_hash().clone(),
            true,
            true,
        );
        assert_eq!(admin.role(), Role::Admin);
        assert!(admin.can(Capability::ListIdentities));
    }

    #[rstest]
    fn empty_update_leaves_user_untouched(user: User) {
        let update = UserUpdate::default();
        assert!(update.is_empty());
        assert_eq!(update.apply(user.clone()), user);
    }

    #[rstest]
    fn update_merges_only_supplied_fields(user: User) {
        let update = UserUpdate {
            is_active: Some(false),
            ..UserUpdate::default()
        };
        let updated = update.apply(user.clone());
        assert!(!updated.is_active());
        assert_eq!(updated.email(), user.email());
        assert_eq!(updated.password_hash(), user.password_hash());
    }
}
