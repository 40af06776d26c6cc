//! Test helpers for inbound HTTP components.
//!
//! Builds [`HttpState`] over the in-memory store with cheap Argon2 costs and
//! a fixed signing secret, and offers shortcuts for registering and logging
//! in through the real routes.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Duration;
use serde_json::Value;

use crate::domain::{AccountService, Email, IdentityStore, Password};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::MemoryStore;
use crate::outbound::security::{
    Argon2CredentialCodec, Argon2Params, JwtTokenService, TokenSecret,
};

pub const TEST_PASSWORD: &str = "correct horse battery";

/// In-memory wiring shared by handler tests.
pub struct TestHarness {
    pub state: web::Data<HttpState>,
    store: Arc<MemoryStore>,
    codec: Arc<Argon2CredentialCodec>,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let codec = Arc::new(
            Argon2CredentialCodec::new(Argon2Params {
                memory_kib: Some(8),
                iterations: Some(1),
                parallelism: Some(1),
            })
            .expect("cheap argon2 parameters"),
        );
        let secret = TokenSecret::from_bytes(b"0123456789abcdef0123456789abcdef".to_vec());
        let tokens = Arc::new(JwtTokenService::new(&secret));
        let state = HttpState::from_adapters(
            store.clone(),
            store.clone(),
            codec.clone(),
            tokens,
            Duration::minutes(30),
        );
        Self {
            state: web::Data::new(state),
            store,
            codec,
        }
    }

    /// Seed an administrator directly through the account service.
    pub async fn seed_admin(&self, email: &str) {
        let identities = IdentityStore::new(self.store.clone(), self.codec.clone());
        let accounts = AccountService::new(identities, self.store.clone());
        let created = accounts
            .ensure_admin(
                Email::new(email).expect("admin email"),
                &Password::new(TEST_PASSWORD).expect("admin password"),
            )
            .await
            .expect("seed admin");
        assert!(created, "admin {email} already existed");
    }

    /// Actix app with every API route mounted.
    pub async fn app(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        test::init_service(
            App::new()
                .app_data(self.state.clone())
                .configure(crate::inbound::http::configure),
        )
        .await
    }
}

/// Register `email` with [`TEST_PASSWORD`] and return the created body.
pub async fn register<S, B>(app: &S, email: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(serde_json::json!({ "email": email, "password": TEST_PASSWORD }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED, "register {email}");
    test::read_body_json(res).await
}

/// Log in as `email` with [`TEST_PASSWORD`] and return the bearer token.
pub async fn login<S, B>(app: &S, email: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/token")
        .set_form([("username", email), ("password", TEST_PASSWORD)])
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::OK, "login {email}");
    let body: Value = test::read_body_json(res).await;
    body["access_token"]
        .as_str()
        .expect("access_token")
        .to_owned()
}

/// `Authorization` header value for `token`.
pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {token}"),
    )
}
