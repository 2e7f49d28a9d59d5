//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
///
/// Every engine failure maps onto exactly one of these categories before it
/// crosses the operation boundary. All failures are synchronous and scoped to
/// one operation; none is fatal to the process.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or out-of-range input, caught before any write.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Role or ownership check failed.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Referenced entity missing or belongs to another company.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Edit would desynchronize a linked transaction pair.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Return or transfer exceeds the live balance.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Plan-limit rejection surfaced unchanged from the plan collaborator.
    #[error("Plan limit reached: {0}")]
    PlanLimit(String),

    /// Record store failure.
    #[error("Store error: {0}")]
    Store(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::InsufficientFunds(_) => 422,
            Self::PlanLimit(_) => 402,
            Self::Store(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            Self::PlanLimit(_) => "PLAN_LIMIT",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may recover by resubmitting corrected input.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Conflict(_))
    }
}
