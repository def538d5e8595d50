//! Shared response envelope types for API handlers.
//!
//! Successful responses are `{success: true, message, data}`; lists add a
//! `pagination` block. Build them through [`ApiResponse`] and
//! [`PagedResponse`] rather than ad-hoc `json!` values.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parkhub_core::pagination::{PageRequest, Pagination};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
    /// Set by reports that page their detail rows inside `data`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            pagination: None,
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// The same envelope with a `201 Created` status.
    pub fn created(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Json(Self::ok(message, data)))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// A page of `T` plus its pagination metadata.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> PagedResponse<T> {
    pub fn new(message: impl Into<String>, data: Vec<T>, page: PageRequest, total: i64) -> Self {
        let pagination = Pagination::new(page, total, data.len());
        Self {
            success: true,
            message: message.into(),
            data,
            pagination,
        }
    }
}

impl<T: Serialize> IntoResponse for PagedResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
