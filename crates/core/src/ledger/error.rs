//! Ledger error types for validation and state errors.

use thiserror::Error;

use sitebook_shared::types::{CategoryId, MoneySourceId, TransactionId, UserId};
use sitebook_shared::AppError;

use super::types::TransactionType;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction amount must be positive.
    #[error("Transaction amount must be positive")]
    NonPositiveAmount,

    /// Category may not be used with the requested transaction type.
    #[error("Category {category} may not be used with {txn_type:?} transactions")]
    CategoryTypeMismatch {
        /// The category.
        category: CategoryId,
        /// The requested transaction type.
        txn_type: TransactionType,
    },

    /// INTERNAL transfers need a destination source.
    #[error("Internal transfer requires a destination money source")]
    TransferTargetMissing,

    /// INTERNAL transfers must move money between two distinct sources.
    #[error("Internal transfer source and destination must differ")]
    TransferTargetSameSource,

    /// Only INTERNAL transfers and advance legs carry a destination source.
    #[error("Destination money source is only valid for internal transfers")]
    UnexpectedTransferTarget,

    /// Update patch changes nothing.
    #[error("Update changes no fields")]
    EmptyUpdate,

    /// Money source no longer accepts transactions.
    #[error("Money source {0} is inactive")]
    SourceInactive(MoneySourceId),

    /// Acting user is deactivated.
    #[error("User {0} is deactivated")]
    UserInactive(UserId),

    // ========== Access Errors ==========
    /// Actor may not spend from this source.
    #[error("User may not spend from money source {0}")]
    NoSpendAccess(MoneySourceId),

    /// Actor may not view or credit this source.
    #[error("User may not view money source {0}")]
    NoViewAccess(MoneySourceId),

    // ========== Missing Entities ==========
    /// Category missing or belongs to another company.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Money source missing or belongs to another company.
    #[error("Money source not found: {0}")]
    SourceNotFound(MoneySourceId),

    /// Transaction missing, deleted, or belongs to another company.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// User missing or belongs to another company.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    // ========== Linked-Pair Errors ==========
    /// Edit would desynchronize the two legs of an advance issuance.
    #[error("Cannot change {field} on an advance-issuance leg")]
    PairedFieldImmutable {
        /// The offending field.
        field: &'static str,
    },
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::CategoryTypeMismatch { .. } => "CATEGORY_TYPE_MISMATCH",
            Self::TransferTargetMissing => "TRANSFER_TARGET_MISSING",
            Self::TransferTargetSameSource => "TRANSFER_TARGET_SAME_SOURCE",
            Self::UnexpectedTransferTarget => "UNEXPECTED_TRANSFER_TARGET",
            Self::EmptyUpdate => "EMPTY_UPDATE",
            Self::SourceInactive(_) => "SOURCE_INACTIVE",
            Self::UserInactive(_) => "USER_INACTIVE",
            Self::NoSpendAccess(_) => "NO_SPEND_ACCESS",
            Self::NoViewAccess(_) => "NO_VIEW_ACCESS",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::SourceNotFound(_) => "SOURCE_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::PairedFieldImmutable { .. } => "PAIRED_FIELD_IMMUTABLE",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NonPositiveAmount
            | LedgerError::CategoryTypeMismatch { .. }
            | LedgerError::TransferTargetMissing
            | LedgerError::TransferTargetSameSource
            | LedgerError::UnexpectedTransferTarget
            | LedgerError::EmptyUpdate
            | LedgerError::SourceInactive(_)
            | LedgerError::UserInactive(_) => Self::Validation(err.to_string()),

            LedgerError::NoSpendAccess(_) | LedgerError::NoViewAccess(_) => {
                Self::Forbidden(err.to_string())
            }

            LedgerError::CategoryNotFound(_)
            | LedgerError::SourceNotFound(_)
            | LedgerError::TransactionNotFound(_)
            | LedgerError::UserNotFound(_) => Self::NotFound(err.to_string()),

            LedgerError::PairedFieldImmutable { .. } => Self::Conflict(err.to_string()),
        }
    }
}
