//! HTTP-level tests for parking management and the space counter.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use parkhub_core::roles::Role;
use parkhub_db::models::car_entry::NewCarEntry;
use parkhub_db::repositories::CarEntryRepo;
use serde_json::json;
use sqlx::PgPool;

fn new_parking(code: &str) -> serde_json::Value {
    json!({
        "code": code,
        "name": "Central",
        "location": "Main street",
        "totalSpaces": 10,
        "hourlyRate": 2.5,
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_parking_with_all_spaces_free(pool: PgPool) {
    let token = common::token_with_role(&pool, "root@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/parking", new_parking("P-001"), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Parking created successfully");
    assert_eq!(json["data"]["code"], "P-001");
    assert_eq!(json["data"]["totalSpaces"], 10);
    assert_eq!(json["data"]["availableSpaces"], 10);
    assert_eq!(json["data"]["hourlyRate"], 2.5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn attendant_cannot_create_parking(pool: PgPool) {
    let token = common::token_with_role(&pool, "gate@example.com", Role::Attendant).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/parking", new_parking("P-001"), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_code_conflicts(pool: PgPool) {
    common::create_parking(&pool, "P-001", 5, 1.0).await;
    let token = common::token_with_role(&pool, "root@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/parking", new_parking("P-001"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["message"],
        "Parking with this code already exists"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_validates_fields(pool: PgPool) {
    let token = common::token_with_role(&pool, "root@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "code": "",
        "name": "Central",
        "location": "Main street",
        "totalSpaces": 0,
        "hourlyRate": 0.0,
    });
    let response = post_json_auth(app, "/api/parking", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let errors = json["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 3, "code, total spaces and rate should all fail: {errors:?}");
    assert!(errors.contains_key("code"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn any_authenticated_user_can_list(pool: PgPool) {
    common::create_parking(&pool, "B", 5, 1.0).await;
    common::create_parking(&pool, "A", 5, 1.0).await;
    let token = common::token_with_role(&pool, "plain@example.com", Role::User).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/parking", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let codes: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["A", "B"]);
    assert_eq!(json["pagination"]["total"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_parking_is_404(pool: PgPool) {
    let token = common::token_with_role(&pool, "plain@example.com", Role::User).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/parking/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Parking not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn shrinking_capacity_keeps_occupied_spaces(pool: PgPool) {
    let parking = common::create_parking(&pool, "P-010", 10, 1.0).await;
    for i in 0..7 {
        CarEntryRepo::register(
            &pool,
            &NewCarEntry {
                plate_number: format!("CAR-{i}"),
                parking_id: parking.id,
                attendant_id: None,
            },
        )
        .await
        .unwrap();
    }
    let token = common::token_with_role(&pool, "root@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/parking/{}", parking.id);
    let response = put_json_auth(app, &uri, json!({ "totalSpaces": 8 }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["totalSpaces"], 8);
    assert_eq!(json["data"]["availableSpaces"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_with_parked_cars_is_refused(pool: PgPool) {
    let parking = common::create_parking(&pool, "P-020", 3, 1.0).await;
    CarEntryRepo::register(
        &pool,
        &NewCarEntry {
            plate_number: "STUCK-1".into(),
            parking_id: parking.id,
            attendant_id: None,
        },
    )
    .await
    .unwrap();
    let token = common::token_with_role(&pool, "root@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/parking/{}", parking.id);
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Cannot delete parking with active car entries"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_empty_parking(pool: PgPool) {
    let parking = common::create_parking(&pool, "P-030", 3, 1.0).await;
    let token = common::token_with_role(&pool, "root@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/parking/{}", parking.id);
    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn space_adjustment_respects_bounds(pool: PgPool) {
    let parking = common::create_parking(&pool, "P-040", 2, 1.0).await;
    let token = common::token_with_role(&pool, "root@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/parking/{}/spaces", parking.id);

    let over = put_json_auth(app.clone(), &uri, json!({ "change": 1 }), &token).await;
    assert_eq!(over.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(over).await["message"],
        "Available spaces cannot be more than total spaces"
    );

    let down = put_json_auth(app.clone(), &uri, json!({ "change": -2 }), &token).await;
    assert_eq!(down.status(), StatusCode::OK);
    assert_eq!(body_json(down).await["data"]["availableSpaces"], 0);

    let under = put_json_auth(app, &uri, json!({ "change": -1 }), &token).await;
    assert_eq!(under.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(under).await["message"], "No available parking spaces");
}
