//! HTTP-level tests for user management and the admin-or-self rule.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, put_json_auth};
use parkhub_core::roles::Role;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_returns_the_caller(pool: PgPool) {
    let user = common::create_user(&pool, "me@example.com", Role::User).await;
    let token = common::token_for(&user);
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/users/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user.id);
    assert_eq!(json["data"]["email"], "me@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_requires_admin(pool: PgPool) {
    let user_token = common::token_with_role(&pool, "plain@example.com", Role::User).await;
    let admin_token = common::token_with_role(&pool, "boss@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let denied = get_auth(app.clone(), "/api/users", &user_token).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(denied).await["message"],
        "Access denied. You do not have permission to perform this action"
    );

    let allowed = get_auth(app, "/api/users?page=1&limit=1", &admin_token).await;
    assert_eq!(allowed.status(), StatusCode::OK);
    let json = body_json(allowed).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["pagination"]["total"], 2);
    assert_eq!(json["pagination"]["hasNext"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_cannot_read_each_other(pool: PgPool) {
    let alice = common::create_user(&pool, "alice@example.com", Role::User).await;
    let bob = common::create_user(&pool, "bob@example.com", Role::User).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/users/{}", bob.id);
    let response = get_auth(app, &uri, &common::token_for(&alice)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admin_cannot_change_own_role(pool: PgPool) {
    let user = common::create_user(&pool, "climber@example.com", Role::User).await;
    let token = common::token_for(&user);
    let app = common::build_test_app(pool);

    let response = put_json_auth(app, "/api/users/profile", json!({ "role": "ADMIN" }), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["message"],
        "Only admins can change user roles"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_promotion_takes_effect_on_existing_token(pool: PgPool) {
    let admin_token = common::token_with_role(&pool, "root@example.com", Role::Admin).await;
    let user = common::create_user(&pool, "promote@example.com", Role::User).await;
    let user_token = common::token_for(&user);
    let app = common::build_test_app(pool);

    let before = get_auth(app.clone(), "/api/users", &user_token).await;
    assert_eq!(before.status(), StatusCode::FORBIDDEN);

    let uri = format!("/api/users/{}", user.id);
    let response = put_json_auth(app.clone(), &uri, json!({ "role": "admin" }), &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "ADMIN");

    let after = get_auth(app, "/api/users", &user_token).await;
    assert_eq!(after.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn email_change_to_taken_address_conflicts(pool: PgPool) {
    common::create_user(&pool, "first@example.com", Role::User).await;
    let second = common::create_user(&pool, "second@example.com", Role::User).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        "/api/users/profile",
        json!({ "email": "First@Example.com" }),
        &common::token_for(&second),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["message"], "Email is already in use");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_update_changes_names(pool: PgPool) {
    let user = common::create_user(&pool, "rename@example.com", Role::User).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        "/api/users/profile",
        json!({ "firstName": "Grace", "lastName": "Hopper" }),
        &common::token_for(&user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["firstName"], "Grace");
    assert_eq!(json["data"]["lastName"], "Hopper");
    assert_eq!(json["data"]["email"], "rename@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_deletes_user_then_gets_404(pool: PgPool) {
    let admin_token = common::token_with_role(&pool, "root@example.com", Role::Admin).await;
    let user = common::create_user(&pool, "doomed@example.com", Role::User).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/users/{}", user.id);
    let response = delete_auth(app.clone(), &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let again = delete_auth(app, &uri, &admin_token).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(again).await["message"], "User not found");
}
