//! Ledger service for transaction state decisions.
//!
//! The service is stateless: record-store facts (categories, money sources)
//! are supplied through injected lookup closures, and each method returns the
//! fully resolved row to persist. Persisting it atomically, under the
//! source's write lock, is the store layer's job.

use chrono::Utc;

use sitebook_shared::types::{CategoryId, MoneySourceId, TransactionId};

use super::error::LedgerError;
use super::types::{
    Category, CreateTransactionInput, MoneySource, ReceiptStatus, Transaction, TransactionPatch,
    TransactionType, User,
};
use super::validation;

/// Stateless service for validating and resolving transaction operations.
///
/// State machine: a transaction is ACTIVE from creation, may be edited any
/// number of times within the bounded field set, and ends in DELETED, a
/// terminal state nothing leaves.
pub struct LedgerService;

impl LedgerService {
    /// Validates a create request and resolves the row to persist.
    ///
    /// # Errors
    ///
    /// Returns a `LedgerError` naming the specific failed check; nothing is
    /// written on failure.
    pub fn validate_create<C, S>(
        input: &CreateTransactionInput,
        actor: &User,
        category_lookup: C,
        source_lookup: S,
    ) -> Result<Transaction, LedgerError>
    where
        C: Fn(CategoryId) -> Option<Category>,
        S: Fn(MoneySourceId) -> Option<MoneySource>,
    {
        validation::validate_actor(actor)?;
        if actor.company_id != input.company_id {
            return Err(LedgerError::UserNotFound(actor.id));
        }

        validation::validate_amount(input.amount_cents)?;
        validation::validate_transfer_shape(input)?;

        let category = category_lookup(input.category_id)
            .ok_or(LedgerError::CategoryNotFound(input.category_id))?;
        validation::validate_category(&category, input.company_id, input.txn_type)?;

        let source = source_lookup(input.money_source_id)
            .ok_or(LedgerError::SourceNotFound(input.money_source_id))?;
        validation::validate_source_access(&source, actor, input.company_id, input.txn_type)?;

        if input.txn_type == TransactionType::Internal {
            let to_id = input
                .to_money_source_id
                .ok_or(LedgerError::TransferTargetMissing)?;
            let destination =
                source_lookup(to_id).ok_or(LedgerError::SourceNotFound(to_id))?;
            validation::validate_transfer_destination(&destination, input.company_id)?;
        }

        let now = Utc::now();
        Ok(Transaction {
            id: TransactionId::new(),
            company_id: input.company_id,
            txn_type: input.txn_type,
            amount_cents: input.amount_cents,
            date: input.date,
            money_source_id: input.money_source_id,
            to_money_source_id: input.to_money_source_id,
            category_id: input.category_id,
            project_id: input.project_id,
            created_by: input.created_by,
            comment: input.comment.clone(),
            receipt: ReceiptStatus::Missing,
            pair_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Validates an update and resolves the edited row.
    ///
    /// Only the bounded field set may change. On a leg of an advance-issuance
    /// pair, changes to amount, money source, category, or date are rejected:
    /// they would desynchronize the legs.
    ///
    /// # Errors
    ///
    /// `TransactionNotFound` for deleted rows or rows of another company
    /// (DELETED is terminal), `PairedFieldImmutable` for pair conflicts, and
    /// the usual validation errors for the changed fields.
    pub fn validate_update<C, S>(
        existing: &Transaction,
        patch: &TransactionPatch,
        actor: &User,
        category_lookup: C,
        source_lookup: S,
    ) -> Result<Transaction, LedgerError>
    where
        C: Fn(CategoryId) -> Option<Category>,
        S: Fn(MoneySourceId) -> Option<MoneySource>,
    {
        validation::validate_actor(actor)?;
        if existing.company_id != actor.company_id || !existing.is_active() {
            return Err(LedgerError::TransactionNotFound(existing.id));
        }
        if patch.is_empty() {
            return Err(LedgerError::EmptyUpdate);
        }
        if existing.is_paired() && patch.touches_paired_fields() {
            let field = if patch.amount_cents.is_some() {
                "amount"
            } else if patch.money_source_id.is_some() {
                "money source"
            } else if patch.category_id.is_some() {
                "category"
            } else {
                "date"
            };
            return Err(LedgerError::PairedFieldImmutable { field });
        }

        let mut updated = existing.clone();
        if let Some(amount) = patch.amount_cents {
            validation::validate_amount(amount)?;
            updated.amount_cents = amount;
        }
        if let Some(date) = patch.date {
            updated.date = date;
        }
        if let Some(category_id) = patch.category_id {
            updated.category_id = category_id;
        }
        if let Some(source_id) = patch.money_source_id {
            if updated.txn_type == TransactionType::Internal
                && updated.to_money_source_id == Some(source_id)
            {
                return Err(LedgerError::TransferTargetSameSource);
            }
            updated.money_source_id = source_id;
        }
        if let Some(comment) = &patch.comment {
            updated.comment.clone_from(comment);
        }
        if let Some(receipt) = patch.receipt {
            updated.receipt = receipt;
        }
        if let Some(project_id) = patch.project_id {
            updated.project_id = project_id;
        }

        // The resulting category/type combination and the resulting source's
        // access are re-validated even when only one side changed.
        let category = category_lookup(updated.category_id)
            .ok_or(LedgerError::CategoryNotFound(updated.category_id))?;
        validation::validate_category(&category, updated.company_id, updated.txn_type)?;

        let source = source_lookup(updated.money_source_id)
            .ok_or(LedgerError::SourceNotFound(updated.money_source_id))?;
        validation::validate_source_access(&source, actor, updated.company_id, updated.txn_type)?;

        updated.updated_at = Utc::now();
        Ok(updated)
    }

    /// Validates a soft delete and resolves the tombstoned row.
    ///
    /// Idempotent: deleting an already-deleted transaction returns `Ok(None)`
    /// and must not be treated as an error.
    ///
    /// # Errors
    ///
    /// `TransactionNotFound` for rows of another company, `SourceNotFound` if
    /// the source record is missing, `NoSpendAccess` when the actor lacks
    /// rights on the source.
    pub fn validate_delete<S>(
        existing: &Transaction,
        actor: &User,
        source_lookup: S,
    ) -> Result<Option<Transaction>, LedgerError>
    where
        S: Fn(MoneySourceId) -> Option<MoneySource>,
    {
        validation::validate_actor(actor)?;
        if existing.company_id != actor.company_id {
            return Err(LedgerError::TransactionNotFound(existing.id));
        }
        if !existing.is_active() {
            return Ok(None);
        }

        // Deleting stays possible after a source is retired, so this checks
        // membership and rights but not is_active.
        let source = source_lookup(existing.money_source_id)
            .ok_or(LedgerError::SourceNotFound(existing.money_source_id))?;
        if !source.user_can_spend(actor) {
            return Err(LedgerError::NoSpendAccess(source.id));
        }

        let mut deleted = existing.clone();
        deleted.deleted_at = Some(Utc::now());
        Ok(Some(deleted))
    }
}
