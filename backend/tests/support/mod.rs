//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the in-memory application wiring lives here rather than being copied into
//! each scenario file.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::{App, test, web};
use chrono::Duration;
use serde_json::{Value, json};

use todo_backend::Trace;
use todo_backend::domain::{AccountService, Email, IdentityStore, Password};
use todo_backend::inbound::http;
use todo_backend::inbound::http::health::{HealthState, live, ready};
use todo_backend::inbound::http::state::HttpState;
use todo_backend::outbound::memory::MemoryStore;
use todo_backend::outbound::security::{
    Argon2CredentialCodec, Argon2Params, JwtTokenService, TokenSecret,
};

pub const PASSWORD: &str = "correct horse battery";

fn cheap_codec() -> Arc<Argon2CredentialCodec> {
    Arc::new(
        Argon2CredentialCodec::new(Argon2Params {
            memory_kib: Some(8),
            iterations: Some(1),
            parallelism: Some(1),
        })
        .expect("cheap argon2 parameters"),
    )
}

/// In-memory application under test.
pub struct TestApp {
    store: Arc<MemoryStore>,
    codec: Arc<Argon2CredentialCodec>,
    state: web::Data<HttpState>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let codec = cheap_codec();
        let secret = TokenSecret::from_bytes(b"integration-secret-0123456789abcdef".to_vec());
        let state = HttpState::from_adapters(
            store.clone(),
            store.clone(),
            codec.clone(),
            Arc::new(JwtTokenService::new(&secret)),
            Duration::minutes(30),
        );
        Self {
            store,
            codec,
            state: web::Data::new(state),
        }
    }

    /// Create an administrator the way the server bootstrap does.
    pub async fn bootstrap_admin(&self, email: &str) {
        let accounts = AccountService::new(
            IdentityStore::new(self.store.clone(), self.codec.clone()),
            self.store.clone(),
        );
        accounts
            .ensure_admin(
                Email::new(email).expect("admin email"),
                &Password::new(PASSWORD).expect("admin password"),
            )
            .await
            .expect("bootstrap admin");
    }

    /// Initialise the actix service with the production route table.
    pub async fn service(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        test::init_service(
            App::new()
                .app_data(health)
                .app_data(self.state.clone())
                .wrap(Trace)
                .configure(http::configure)
                .service(ready)
                .service(live),
        )
        .await
    }
}

pub fn bearer(token: &str) -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

pub async fn register<S>(app: &S, email: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED, "register {email}");
    test::read_body_json(res).await
}

pub async fn login<S>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/token")
        .set_form([("username", email), ("password", PASSWORD)])
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::OK, "login {email}");
    let body: Value = test::read_body_json(res).await;
    body["access_token"]
        .as_str()
        .expect("access_token")
        .to_owned()
}

/// Send `req` and return the status with the JSON body, if any.
pub async fn send<S>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}
