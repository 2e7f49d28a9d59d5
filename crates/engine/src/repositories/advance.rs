//! Advance repository: issue and return employee cash advances.

use std::sync::Arc;

use sitebook_core::advance::error::AdvanceError;
use sitebook_core::advance::service::AdvanceService;
use sitebook_core::advance::types::{IssueAdvanceInput, ReturnAdvanceInput};
use sitebook_core::events::{DomainEvent, EventPublisher};
use sitebook_core::ledger::balance::balance_of;
use sitebook_core::ledger::error::LedgerError;
use sitebook_core::ledger::types::{MoneySource, Transaction};
use sitebook_shared::{AppError, AppResult, Cents};

use crate::store::{MemoryStore, WriteBatch};

/// Result of an advance issuance.
#[derive(Debug, Clone)]
pub struct AdvanceIssueOutcome {
    /// The EXPENSE leg on the issuing source.
    pub transaction: Transaction,
    /// The recipient's advance sub-account.
    pub recipient_money_source: MoneySource,
    /// True if the sub-account was provisioned by this issuance.
    pub is_new: bool,
}

/// Result of an advance return.
#[derive(Debug, Clone)]
pub struct AdvanceReturnOutcome {
    /// The INTERNAL transfer that moved the cash back.
    pub transaction: Transaction,
    /// The advance balance after the return.
    pub remaining_balance: Cents,
}

/// Repository for the advance sub-ledger.
pub struct AdvanceRepository {
    store: Arc<MemoryStore>,
    events: Arc<dyn EventPublisher>,
}

impl AdvanceRepository {
    /// Creates a new advance repository.
    #[must_use]
    pub fn new(store: Arc<MemoryStore>, events: Arc<dyn EventPublisher>) -> Self {
        Self { store, events }
    }

    /// Issues an advance to an employee.
    ///
    /// One logical operation: the two transaction legs and (for a first
    /// advance) the new sub-account commit together or not at all.
    ///
    /// # Errors
    ///
    /// Validation, access, and existence failures per the advance rules.
    pub fn issue(&self, input: &IssueAdvanceInput) -> AppResult<AdvanceIssueOutcome> {
        let actor = self
            .store
            .get_user(input.created_by)
            .ok_or_else(|| AppError::from(LedgerError::UserNotFound(input.created_by)))?;
        let recipient = self
            .store
            .get_user(input.recipient_user_id)
            .ok_or_else(|| {
                AppError::from(AdvanceError::RecipientNotFound(input.recipient_user_id))
            })?;
        let issuing_source = self
            .store
            .get_source(input.money_source_id)
            .ok_or_else(|| AppError::from(LedgerError::SourceNotFound(input.money_source_id)))?;
        let issue_category = self
            .store
            .get_category(self.store.system_categories().advance_issue)
            .ok_or_else(|| AppError::Internal("advance system category missing".to_string()))?;

        // The provisioning lock comes first (fixed lock order with the
        // source locks below): concurrent first issuances to the same
        // recipient must not both create a sub-account.
        let provision_lock = self.store.advance_lock(input.recipient_user_id);
        let _provision_guard = provision_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let existing_advance = self
            .store
            .find_advance_source(input.company_id, input.recipient_user_id);

        let mut touched = vec![input.money_source_id];
        if let Some(advance) = &existing_advance {
            touched.push(advance.id);
        }
        let locks = self.store.write_locks(&touched);
        let _guards = MemoryStore::acquire(&locks);

        let plan = AdvanceService::plan_issue(
            input,
            &actor,
            &recipient,
            &issuing_source,
            existing_advance.as_ref(),
            &issue_category,
        )
        .map_err(AppError::from)?;

        let advance_source = match &plan.new_source {
            Some(source) => source.clone(),
            None => existing_advance
                .ok_or_else(|| AppError::Internal("advance source vanished".to_string()))?,
        };

        self.store.commit(WriteBatch {
            new_sources: plan.new_source.clone().into_iter().collect(),
            transactions: vec![plan.outflow.clone(), plan.inflow.clone()],
        });
        tracing::info!(
            recipient = %recipient.id,
            advance_source = %advance_source.id,
            amount = %input.amount_cents,
            is_new = plan.is_new,
            "advance issued"
        );
        self.events.publish(&DomainEvent::AdvanceIssued {
            company_id: input.company_id,
            recipient_user_id: recipient.id,
            advance_source_id: advance_source.id,
            amount_cents: input.amount_cents,
            is_new_source: plan.is_new,
        });

        Ok(AdvanceIssueOutcome {
            transaction: plan.outflow,
            recipient_money_source: advance_source,
            is_new: plan.is_new,
        })
    }

    /// Returns an advance (a specific amount or the whole live balance).
    ///
    /// The balance is resolved under the advance source's write lock, so a
    /// racing return cannot approve against a stale snapshot; a rejected
    /// return performs zero writes.
    ///
    /// # Errors
    ///
    /// `InsufficientFunds` when the request exceeds the live balance, plus
    /// the usual validation failures.
    pub fn return_advance(&self, input: &ReturnAdvanceInput) -> AppResult<AdvanceReturnOutcome> {
        let actor = self
            .store
            .get_user(input.created_by)
            .ok_or_else(|| AppError::from(LedgerError::UserNotFound(input.created_by)))?;
        let advance_source = self
            .store
            .get_source(input.advance_source_id)
            .ok_or_else(|| {
                AppError::from(LedgerError::SourceNotFound(input.advance_source_id))
            })?;
        let destination = self
            .store
            .get_source(input.destination_source_id)
            .ok_or_else(|| {
                AppError::from(LedgerError::SourceNotFound(input.destination_source_id))
            })?;
        let return_category = self
            .store
            .get_category(self.store.system_categories().advance_return)
            .ok_or_else(|| AppError::Internal("advance system category missing".to_string()))?;

        let locks = self
            .store
            .write_locks(&[input.advance_source_id, input.destination_source_id]);
        let _guards = MemoryStore::acquire(&locks);

        // Live balance, read while holding the lock.
        let history = self.store.transactions_touching(input.advance_source_id);
        let live_balance = balance_of(input.advance_source_id, &history);

        let plan = AdvanceService::plan_return(
            input,
            &actor,
            &advance_source,
            &destination,
            live_balance,
            &return_category,
        )
        .map_err(AppError::from)?;

        self.store
            .commit(WriteBatch::transaction(plan.transaction.clone()));
        tracing::info!(
            advance_source = %advance_source.id,
            destination = %destination.id,
            returned = %plan.returned_cents,
            remaining = %plan.remaining_cents,
            "advance returned"
        );
        self.events.publish(&DomainEvent::AdvanceReturned {
            company_id: input.company_id,
            advance_source_id: advance_source.id,
            destination_source_id: destination.id,
            amount_cents: plan.returned_cents,
            remaining_cents: plan.remaining_cents,
        });

        Ok(AdvanceReturnOutcome {
            transaction: plan.transaction,
            remaining_balance: plan.remaining_cents,
        })
    }
}
