//! Tests for the identity store.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockCredentialCodec, MockUserRepository};
use crate::outbound::memory::MemoryStore;
use rstest::{fixture, rstest};

fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

fn stored(id: i64, new_user: &NewUser) -> User {
    User::new(
        UserId::new(id),
        new_user.email.clone(),
        new_user.password_hash.clone(),
        new_user.flags.is_active,
        new_user.flags.is_admin,
    )
}

#[fixture]
fn codec() -> MockCredentialCodec {
    let mut codec = MockCredentialCodec::new();
    codec
        .expect_hash()
        .returning(|plaintext| Ok(PasswordHash::new(format!("hashed:{plaintext}"))));
    codec
}

fn make_store(
    users: MockUserRepository,
    codec: MockCredentialCodec,
) -> IdentityStore<MockUserRepository, MockCredentialCodec> {
    IdentityStore::new(Arc::new(users), Arc::new(codec))
}

#[rstest]
#[tokio::test]
async fn create_hashes_before_inserting(codec: MockCredentialCodec) {
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .withf(|new_user| {
            new_user.password_hash.as_str() == "hashed:password1"
                && new_user.flags == AccountFlags::default()
        })
        .times(1)
        .returning(|new_user| Ok(stored(1, new_user)));

    let store = make_store(users, codec);
    let password = Password::new("password1").expect("valid password");
    let user = store
        .create(email("ada@example.com"), &password, AccountFlags::default())
        .await
        .expect("create succeeds");

    assert_eq!(user.id(), UserId::new(1));
    assert_ne!(user.password_hash().as_str(), "password1");
    assert!(user.is_active());
    assert!(!user.is_admin());
}

#[rstest]
#[tokio::test]
async fn duplicate_email_becomes_conflict(codec: MockCredentialCodec) {
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .returning(|new_user| Err(UserRepositoryError::duplicate_email(new_user.email.as_ref())));

    let store = make_store(users, codec);
    let password = Password::new("password1").expect("valid password");
    let err = store
        .create(email("ada@example.com"), &password, AccountFlags::default())
        .await
        .expect_err("duplicate must fail");
    assert!(matches!(err, IdentityError::DuplicateIdentity { .. }));

    let error = Error::from(err);
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(
        error.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
        Some("duplicate_identity")
    );
}

#[rstest]
#[tokio::test]
async fn update_without_password_skips_hashing() {
    let mut codec = MockCredentialCodec::new();
    codec.expect_hash().never();
    let mut users = MockUserRepository::new();
    users
        .expect_update()
        .withf(|_, update| update.password_hash.is_none() && update.is_active == Some(false))
        .returning(|id, _| {
            Ok(Some(User::new(
                id,
                Email::new("ada@example.com").expect("valid email"),
                PasswordHash::new("hashed:old"),
                false,
                false,
            )))
        });

    let store = make_store(users, codec);
    let changes = UserChanges {
        is_active: Some(false),
        ..UserChanges::default()
    };
    let user = store
        .update(UserId::new(3), changes)
        .await
        .expect("update succeeds");
    assert!(!user.is_active());
}

#[rstest]
#[tokio::test]
async fn update_rehashes_new_password(codec: MockCredentialCodec) {
    let mut users = MockUserRepository::new();
    users
        .expect_update()
        .withf(|_, update| {
            update
                .password_hash
                .as_ref()
                .is_some_and(|hash| hash.as_str() == "hashed:new-password")
        })
        .returning(|_, _| Ok(None));

    let store = make_store(users, codec);
    let changes = UserChanges {
        password: Some(Password::new("new-password").expect("valid password")),
        ..UserChanges::default()
    };
    let err = store
        .update(UserId::new(9), changes)
        .await
        .expect_err("missing user");
    assert_eq!(
        err,
        IdentityError::NotFound {
            id: UserId::new(9)
        }
    );
    assert_eq!(Error::from(err).code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn verify_password_delegates_to_codec() {
    let mut codec = MockCredentialCodec::new();
    codec
        .expect_verify()
        .returning(|plaintext, hash| hash.as_str() == format!("hashed:{plaintext}"));
    let store = make_store(MockUserRepository::new(), codec);
    let user = User::new(
        UserId::new(1),
        email("ada@example.com"),
        PasswordHash::new("hashed:password1"),
        true,
        false,
    );

    assert!(store.verify_password(&user, "password1").await.expect("verify"));
    assert!(!store.verify_password(&user, "password2").await.expect("verify"));
}

#[rstest]
#[tokio::test]
async fn rejected_duplicate_keeps_the_original_identity(codec: MockCredentialCodec) {
    let mut codec = codec;
    codec
        .expect_verify()
        .returning(|plaintext, hash| hash.as_str() == format!("hashed:{plaintext}"));
    let store = IdentityStore::new(Arc::new(MemoryStore::new()), Arc::new(codec));
    let original = store
        .create(
            email("ada@example.com"),
            &Password::new("password1").expect("valid password"),
            AccountFlags::default(),
        )
        .await
        .expect("first create");

    let err = store
        .create(
            email("ada@example.com"),
            &Password::new("password2").expect("valid password"),
            AccountFlags::admin(),
        )
        .await
        .expect_err("duplicate must fail");
    assert!(matches!(err, IdentityError::DuplicateIdentity { .. }));

    let stored = store
        .find_by_key(&email("ada@example.com"))
        .await
        .expect("lookup")
        .expect("original still present");
    assert_eq!(stored, original);
    assert!(!stored.is_admin());
    assert!(store.verify_password(&stored, "password1").await.expect("verify"));
    assert!(!store.verify_password(&stored, "password2").await.expect("verify"));
}

#[rstest]
#[case(UserRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(UserRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[case(UserRepositoryError::duplicate_email("a@b.co"), ErrorCode::Conflict)]
fn repository_errors_map_to_codes(#[case] error: UserRepositoryError, #[case] code: ErrorCode) {
    assert_eq!(map_user_repository_error(error).code(), code);
}
