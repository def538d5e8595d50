//! `AppError` to HTTP response mapping, checked without a server.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use parkhub_api::error::{expose_error_detail, AppError};
use parkhub_core::error::CoreError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_returns_404_with_entity_message() {
    let (status, json) = error_to_response(AppError::not_found("Parking")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "Parking not found");
}

#[tokio::test]
async fn business_rule_returns_400() {
    let (status, json) = error_to_response(AppError::rule("Car has already exited")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BUSINESS_RULE");
    assert_eq!(json["message"], "Car has already exited");
}

#[tokio::test]
async fn conflict_returns_409() {
    let err = AppError::Core(CoreError::Conflict("duplicate code".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["message"], "duplicate code");
}

#[tokio::test]
async fn unauthorized_and_forbidden() {
    let (status, json) = error_to_response(AppError::unauthorized("Invalid token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, json) = error_to_response(AppError::forbidden("nope")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn core_validation_returns_400() {
    let err = AppError::Core(CoreError::Validation("Date is required".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "Date is required");
    assert!(json.get("errors").is_none());
}

#[tokio::test]
async fn field_validation_lists_each_field() {
    let mut errors = validator::ValidationErrors::new();
    let mut err = validator::ValidationError::new("length");
    err.message = Some("Plate number is required".into());
    errors.add("plate_number", err);

    let (status, json) = error_to_response(AppError::Validation(errors)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Validation failed");
    assert_eq!(json["errors"]["plate_number"][0], "Plate number is required");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn internal_error_hides_cause_in_message() {
    expose_error_detail(true);
    let err = AppError::InternalError("pool exhausted".into());
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["message"], "An internal error occurred");
    assert_eq!(json["detail"], "pool exhausted");
}
