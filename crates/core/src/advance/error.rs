//! Advance sub-ledger error types.

use thiserror::Error;

use sitebook_shared::types::{CategoryId, MoneySourceId, UserId};
use sitebook_shared::{AppError, Cents};

use crate::ledger::error::LedgerError;

/// Errors that can occur during advance operations.
#[derive(Debug, Error)]
pub enum AdvanceError {
    /// Underlying ledger validation failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Recipient missing or belongs to another company.
    #[error("Recipient not found: {0}")]
    RecipientNotFound(UserId),

    /// Recipient is deactivated.
    #[error("Recipient {0} is deactivated")]
    RecipientInactive(UserId),

    /// The source is not an advance sub-account.
    #[error("Money source {0} is not an advance sub-account")]
    NotAnAdvanceSource(MoneySourceId),

    /// The supplied category is not the expected advance system category.
    #[error("Category {0} is not an advance system category")]
    NotAnAdvanceCategory(CategoryId),

    /// Advance returns must land on a regular company source.
    #[error("Money source {0} cannot receive an advance return")]
    InvalidReturnDestination(MoneySourceId),

    /// Return-all on an empty advance.
    #[error("Advance balance is zero, nothing to return")]
    NothingToReturn,

    /// Requested return exceeds the live advance balance.
    #[error("Requested {requested} exceeds advance balance {available}")]
    InsufficientFunds {
        /// The live advance balance.
        available: Cents,
        /// The requested return amount.
        requested: Cents,
    },
}

impl AdvanceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(inner) => inner.error_code(),
            Self::RecipientNotFound(_) => "RECIPIENT_NOT_FOUND",
            Self::RecipientInactive(_) => "RECIPIENT_INACTIVE",
            Self::NotAnAdvanceSource(_) => "NOT_AN_ADVANCE_SOURCE",
            Self::NotAnAdvanceCategory(_) => "NOT_AN_ADVANCE_CATEGORY",
            Self::InvalidReturnDestination(_) => "INVALID_RETURN_DESTINATION",
            Self::NothingToReturn => "NOTHING_TO_RETURN",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
        }
    }
}

impl From<AdvanceError> for AppError {
    fn from(err: AdvanceError) -> Self {
        let message = err.to_string();
        match err {
            AdvanceError::Ledger(inner) => inner.into(),
            AdvanceError::RecipientNotFound(_) => Self::NotFound(message),
            AdvanceError::RecipientInactive(_)
            | AdvanceError::NotAnAdvanceSource(_)
            | AdvanceError::NotAnAdvanceCategory(_)
            | AdvanceError::InvalidReturnDestination(_)
            | AdvanceError::NothingToReturn => Self::Validation(message),
            AdvanceError::InsufficientFunds { .. } => Self::InsufficientFunds(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AdvanceError::InsufficientFunds {
                available: Cents::new(5_000),
                requested: Cents::new(7_000),
            }
            .error_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            AdvanceError::Ledger(LedgerError::NonPositiveAmount).error_code(),
            "NON_POSITIVE_AMOUNT"
        );
    }

    #[test]
    fn test_taxonomy_mapping() {
        assert_eq!(
            AppError::from(AdvanceError::InsufficientFunds {
                available: Cents::ZERO,
                requested: Cents::new(1),
            })
            .error_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            AppError::from(AdvanceError::RecipientNotFound(UserId::new())).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            AppError::from(AdvanceError::Ledger(LedgerError::NonPositiveAmount)).error_code(),
            "VALIDATION"
        );
    }

    #[test]
    fn test_insufficient_funds_display() {
        let err = AdvanceError::InsufficientFunds {
            available: Cents::new(70_000),
            requested: Cents::new(90_000),
        };
        assert_eq!(
            err.to_string(),
            "Requested 900.00 exceeds advance balance 700.00"
        );
    }
}
