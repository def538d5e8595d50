//! Shared query parameter types for API handlers.

use parkhub_core::pagination::PageRequest;
use serde::Deserialize;

/// Generic pagination parameters (`?page=&limit=`). Clamped by
/// [`PageRequest::new`].
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
