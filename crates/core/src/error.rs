/// Domain error taxonomy shared by every layer.
///
/// The HTTP layer maps each variant to exactly one status code; see
/// `parkhub_api::error::AppError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A request that is well-formed but violates a parking rule
    /// (no free spaces, already exited, active entries block deletion).
    #[error("Business rule violated: {0}")]
    BusinessRule(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }
}
