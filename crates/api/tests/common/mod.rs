#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use parkhub_api::auth::jwt::{generate_access_token, JwtConfig};
use parkhub_api::auth::password::hash_password;
use parkhub_api::config::{AppEnv, LogFormat, ServerConfig};
use parkhub_api::error::expose_error_detail;
use parkhub_api::router::build_app_router;
use parkhub_api::state::AppState;
use parkhub_core::roles::Role;
use parkhub_db::models::parking::{CreateParking, Parking};
use parkhub_db::models::user::{CreateUser, User};
use parkhub_db::repositories::{ParkingRepo, UserRepo};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "secret123";

/// Server configuration for tests: fixed JWT secret, no real bind address.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        app_env: AppEnv::Test,
        db_max_connections: 5,
        log_format: LogFormat::Pretty,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            expiry_mins: 60,
        },
    }
}

/// The production router over `pool`, with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    expose_error_detail(true);
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with `role` and the shared test password.
pub async fn create_user(pool: &PgPool, email: &str, role: Role) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            first_name: "Test".to_string(),
            last_name: role.as_str().to_lowercase(),
            email: email.to_string(),
            password_hash,
            role,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Bearer token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, user.role().as_str(), &test_config().jwt)
        .expect("token generation should succeed")
}

/// Create a user with `role` and return its token.
pub async fn token_with_role(pool: &PgPool, email: &str, role: Role) -> String {
    token_for(&create_user(pool, email, role).await)
}

pub async fn create_parking(pool: &PgPool, code: &str, total_spaces: i32, hourly_rate: f64) -> Parking {
    ParkingRepo::create(
        pool,
        &CreateParking {
            code: code.to_string(),
            name: format!("Parking {code}"),
            location: "Downtown".to_string(),
            total_spaces,
            hourly_rate,
        },
    )
    .await
    .expect("parking creation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).expect("request should build"))
        .await
        .expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}
