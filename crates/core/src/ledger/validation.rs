//! Business rule validation for ledger operations.
//!
//! All checks are pure: entity records are passed in (or looked up by the
//! service through injected closures) and every failure names a specific
//! reason. A rejected operation leaves no side effects.

use sitebook_shared::types::CompanyId;
use sitebook_shared::Cents;

use super::error::LedgerError;
use super::types::{Category, CreateTransactionInput, MoneySource, TransactionType, User};

/// Validates that a transaction amount is positive.
///
/// # Errors
///
/// Returns `NonPositiveAmount` for zero or negative amounts.
pub fn validate_amount(amount: Cents) -> Result<(), LedgerError> {
    if !amount.is_positive() {
        return Err(LedgerError::NonPositiveAmount);
    }
    Ok(())
}

/// Validates that the acting user may act at all.
///
/// # Errors
///
/// Returns `UserInactive` for deactivated users.
pub fn validate_actor(actor: &User) -> Result<(), LedgerError> {
    if !actor.is_active {
        return Err(LedgerError::UserInactive(actor.id));
    }
    Ok(())
}

/// Validates that a category is visible to the company and compatible with
/// the transaction type.
///
/// Category/project compatibility is deliberately not cross-validated: a
/// category usable for EXPENSE may be attached to any project regardless of
/// project status.
///
/// # Errors
///
/// Returns `CategoryNotFound` for foreign categories (no existence leak) and
/// `CategoryTypeMismatch` when the category does not allow the type.
pub fn validate_category(
    category: &Category,
    company_id: CompanyId,
    txn_type: TransactionType,
) -> Result<(), LedgerError> {
    if !category.visible_to(company_id) {
        return Err(LedgerError::CategoryNotFound(category.id));
    }
    if !category.allows(txn_type) {
        return Err(LedgerError::CategoryTypeMismatch {
            category: category.id,
            txn_type,
        });
    }
    Ok(())
}

/// Validates that the actor may use a money source for the given type.
///
/// Debit-side types (EXPENSE, PAYOUT, INTERNAL) require spend rights;
/// INCOME requires view rights. Owner, Partner, and Accountant hold both on
/// every company source; Foreman and Viewer need ownership or a grant.
///
/// # Errors
///
/// Returns `SourceNotFound` for sources of another company,
/// `SourceInactive` for retired sources, and `NoSpendAccess`/`NoViewAccess`
/// when the actor lacks the needed right.
pub fn validate_source_access(
    source: &MoneySource,
    actor: &User,
    company_id: CompanyId,
    txn_type: TransactionType,
) -> Result<(), LedgerError> {
    if source.company_id != company_id {
        return Err(LedgerError::SourceNotFound(source.id));
    }
    if !source.is_active {
        return Err(LedgerError::SourceInactive(source.id));
    }
    if txn_type.debits_primary() {
        if !source.user_can_spend(actor) {
            return Err(LedgerError::NoSpendAccess(source.id));
        }
    } else if !source.user_can_view(actor) {
        return Err(LedgerError::NoViewAccess(source.id));
    }
    Ok(())
}

/// Validates the destination source of an INTERNAL transfer.
///
/// The destination must exist in the company and be active; no grant is
/// required to receive money.
///
/// # Errors
///
/// Returns `SourceNotFound` or `SourceInactive`.
pub fn validate_transfer_destination(
    destination: &MoneySource,
    company_id: CompanyId,
) -> Result<(), LedgerError> {
    if destination.company_id != company_id {
        return Err(LedgerError::SourceNotFound(destination.id));
    }
    if !destination.is_active {
        return Err(LedgerError::SourceInactive(destination.id));
    }
    Ok(())
}

/// Validates the shape of a create input with respect to its type.
///
/// # Errors
///
/// Returns `TransferTargetMissing`, `TransferTargetSameSource`, or
/// `UnexpectedTransferTarget`.
pub fn validate_transfer_shape(input: &CreateTransactionInput) -> Result<(), LedgerError> {
    match input.txn_type {
        TransactionType::Internal => match input.to_money_source_id {
            None => Err(LedgerError::TransferTargetMissing),
            Some(to) if to == input.money_source_id => {
                Err(LedgerError::TransferTargetSameSource)
            }
            Some(_) => Ok(()),
        },
        TransactionType::Income | TransactionType::Payout => {
            if input.to_money_source_id.is_some() {
                return Err(LedgerError::UnexpectedTransferTarget);
            }
            Ok(())
        }
        // EXPENSE may carry a destination: the outgoing advance-issuance leg
        // links to the advance sub-account through it.
        TransactionType::Expense => Ok(()),
    }
}
