#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{http::header, test, App};
use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;
use tasknest::auth::{AuthResponse, PasswordHasher, TokenKeys};
use tasknest::routes;
use tasknest::store::{MemoryTaskStore, MemoryUserStore};
use tasknest::AppState;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// App state backed by fresh in-memory stores and the cheapest bcrypt cost.
pub fn memory_state() -> AppState {
    AppState::new(
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryTaskStore::new()),
        PasswordHasher::new(4),
        TokenKeys::new(TEST_SECRET, Duration::hours(1)),
    )
}

pub async fn init_app(
    state: &AppState,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    let state = state.clone();
    test::init_service(
        App::new()
            .configure(move |cfg| state.configure(cfg))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await
}

pub fn registration(email: &str) -> Value {
    json!({
        "nombre": "Ana",
        "apellido": "Ruiz",
        "email": email,
        "telefono": "12345678",
        "password": "secret1"
    })
}

/// Registers `email` with password `secret1` and logs in, returning the login response.
pub async fn register_and_login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
) -> AuthResponse {
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(registration(email))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(
        resp.status().is_success(),
        "Setup: failed to register {}",
        email
    );

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": email, "password": "secret1" }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "Setup: failed to log in {}", email);
    test::read_body_json(resp).await
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
