//! HTTP-level tests for arrivals, departures and bills.

mod common;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use common::{body_json, get_auth, post_json_auth, put_auth};
use parkhub_core::roles::Role;
use serde_json::json;
use sqlx::PgPool;

async fn register(app: axum::Router, parking_id: i64, plate: &str, token: &str) -> serde_json::Value {
    let body = json!({ "plateNumber": plate, "parkingId": parking_id });
    let response = post_json_auth(app, "/api/car-entries", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn attendant_registers_entry_with_ticket(pool: PgPool) {
    let parking = common::create_parking(&pool, "P-1", 2, 2.0).await;
    let attendant = common::create_user(&pool, "gate@example.com", Role::Attendant).await;
    let token = common::token_for(&attendant);
    let app = common::build_test_app(pool);

    let json = register(app.clone(), parking.id, "ABC-123", &token).await;
    assert_eq!(json["message"], "Car entry registered successfully");
    assert_eq!(json["data"]["plateNumber"], "ABC-123");
    assert!(json["data"]["exitDateTime"].is_null());
    assert_eq!(json["data"]["parking"]["code"], "P-1");
    assert_eq!(json["data"]["attendant"]["id"], attendant.id);
    let ticket_number = json["data"]["ticket"]["ticketNumber"].as_str().unwrap();
    assert!(ticket_number.starts_with("TCK-"));

    let uri = format!("/api/parking/{}", parking.id);
    let parking_json = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(parking_json["data"]["availableSpaces"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plain_user_cannot_register_entries(pool: PgPool) {
    let parking = common::create_parking(&pool, "P-1", 2, 2.0).await;
    let token = common::token_with_role(&pool, "plain@example.com", Role::User).await;
    let app = common::build_test_app(pool);

    let body = json!({ "plateNumber": "ABC-123", "parkingId": parking.id });
    let response = post_json_auth(app, "/api/car-entries", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_parking_rejects_entry(pool: PgPool) {
    let parking = common::create_parking(&pool, "P-1", 1, 2.0).await;
    let token = common::token_with_role(&pool, "gate@example.com", Role::Attendant).await;
    let app = common::build_test_app(pool);

    register(app.clone(), parking.id, "FIRST", &token).await;

    let body = json!({ "plateNumber": "SECOND", "parkingId": parking.id });
    let response = post_json_auth(app, "/api/car-entries", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No available parking spaces");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_parking_rejects_entry(pool: PgPool) {
    let token = common::token_with_role(&pool, "gate@example.com", Role::Attendant).await;
    let app = common::build_test_app(pool);

    let body = json!({ "plateNumber": "LOST", "parkingId": 424242 });
    let response = post_json_auth(app, "/api/car-entries", body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Parking not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn exit_closes_entry_and_frees_space(pool: PgPool) {
    let parking = common::create_parking(&pool, "P-1", 1, 2.0).await;
    let token = common::token_with_role(&pool, "gate@example.com", Role::Attendant).await;
    let app = common::build_test_app(pool);

    let entry = register(app.clone(), parking.id, "OUT-1", &token).await;
    let id = entry["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/car-entries/{id}/exit");
    let response = put_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Car exit registered successfully");
    assert!(json["data"]["exitDateTime"].is_string());
    assert!(json["data"]["chargedAmount"].as_f64().unwrap() >= 0.0);
    assert!(json["data"]["durationHours"].as_f64().unwrap() >= 0.0);

    let again = put_auth(app.clone(), &uri, &token).await;
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(again).await["message"], "Car has already exited");

    let uri = format!("/api/parking/{}", parking.id);
    let parking_json = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(parking_json["data"]["availableSpaces"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn exit_of_unknown_entry_is_404(pool: PgPool) {
    let token = common::token_with_role(&pool, "gate@example.com", Role::Attendant).await;
    let app = common::build_test_app(pool);

    let response = put_auth(app, "/api/car-entries/999999/exit", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Car entry not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bill_for_closed_stay(pool: PgPool) {
    let parking = common::create_parking(&pool, "P-1", 5, 2.0).await;
    let entered = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
    let exited = Utc.with_ymd_and_hms(2025, 3, 14, 12, 30, 0).unwrap();
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO car_entries (plate_number, parking_id, entry_date_time, exit_date_time, charged_amount)
         VALUES ('BILL-1', $1, $2, $3, 7.0) RETURNING id",
    )
    .bind(parking.id)
    .bind(entered)
    .bind(exited)
    .fetch_one(&pool)
    .await
    .unwrap();
    let token = common::token_with_role(&pool, "gate@example.com", Role::Attendant).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, &format!("/api/car-entries/{id}/bill"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["plateNumber"], "BILL-1");
    assert_eq!(json["data"]["durationHours"], 3.5);
    assert_eq!(json["data"]["hourlyRate"], 2.0);
    assert_eq!(json["data"]["chargedAmount"], 7.0);
    assert_eq!(json["data"]["parkingName"], "Parking P-1");
    assert!(json["data"]["billDate"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bill_for_parked_car_is_refused(pool: PgPool) {
    let parking = common::create_parking(&pool, "P-1", 5, 2.0).await;
    let token = common::token_with_role(&pool, "gate@example.com", Role::Attendant).await;
    let app = common::build_test_app(pool);

    let entry = register(app.clone(), parking.id, "STILL-IN", &token).await;
    let id = entry["data"]["id"].as_i64().unwrap();

    let response = get_auth(app, &format!("/api/car-entries/{id}/bill"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Car has not exited yet");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_plate_and_status(pool: PgPool) {
    let parking = common::create_parking(&pool, "P-1", 5, 2.0).await;
    let token = common::token_with_role(&pool, "gate@example.com", Role::Attendant).await;
    let app = common::build_test_app(pool);

    let first = register(app.clone(), parking.id, "ABC-111", &token).await;
    register(app.clone(), parking.id, "ABC-222", &token).await;
    register(app.clone(), parking.id, "XYZ-333", &token).await;

    let id = first["data"]["id"].as_i64().unwrap();
    let exit = put_auth(app.clone(), &format!("/api/car-entries/{id}/exit"), &token).await;
    assert_eq!(exit.status(), StatusCode::OK);

    let json = body_json(get_auth(app.clone(), "/api/car-entries?plateNumber=abc", &token).await).await;
    assert_eq!(json["pagination"]["total"], 2);

    let json = body_json(
        get_auth(app.clone(), "/api/car-entries?plateNumber=abc&status=active", &token).await,
    )
    .await;
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["plateNumber"], "ABC-222");

    let json = body_json(get_auth(app.clone(), "/api/car-entries?status=completed", &token).await).await;
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["plateNumber"], "ABC-111");

    let bad = get_auth(app, "/api/car-entries?status=parked", &token).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_numeric_id_is_a_json_bad_request(pool: PgPool) {
    let attendant = common::create_user(&pool, "gate@example.com", Role::Attendant).await;
    let token = common::token_for(&attendant);
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/car-entries/abc", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["message"].as_str().unwrap().contains("abc"));

    let response = put_auth(app, "/api/car-entries/abc/exit", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}
