//! Transaction repository: create, bounded update, soft delete, balance.

use std::sync::Arc;

use sitebook_core::events::{DomainEvent, EventPublisher};
use sitebook_core::ledger::balance::balance_of;
use sitebook_core::ledger::error::LedgerError;
use sitebook_core::ledger::service::LedgerService;
use sitebook_core::ledger::types::{
    CreateTransactionInput, Transaction, TransactionPatch, TransactionType,
};
use sitebook_shared::types::{MoneySourceId, TransactionId, UserId};
use sitebook_shared::{AppError, AppResult, Cents};

use crate::store::{MemoryStore, WriteBatch};

/// Repository for transaction operations.
pub struct TransactionRepository {
    store: Arc<MemoryStore>,
    events: Arc<dyn EventPublisher>,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub fn new(store: Arc<MemoryStore>, events: Arc<dyn EventPublisher>) -> Self {
        Self { store, events }
    }

    /// Creates a transaction.
    ///
    /// The write is validated and committed under the locks of every money
    /// source it touches; for INTERNAL transfers the live balance is
    /// re-checked under the lock so racing transfers cannot jointly overdraw
    /// the source.
    ///
    /// # Errors
    ///
    /// Validation, access, and existence failures per the ledger rules;
    /// `InsufficientFunds` for transfers exceeding the live balance.
    pub fn create(&self, input: &CreateTransactionInput) -> AppResult<Transaction> {
        let actor = self
            .store
            .get_user(input.created_by)
            .ok_or_else(|| AppError::from(LedgerError::UserNotFound(input.created_by)))?;

        let mut touched = vec![input.money_source_id];
        if let Some(to) = input.to_money_source_id {
            touched.push(to);
        }
        let locks = self.store.write_locks(&touched);
        let _guards = MemoryStore::acquire(&locks);

        let transaction = LedgerService::validate_create(
            input,
            &actor,
            |id| self.store.get_category(id),
            |id| self.store.get_source(id),
        )
        .map_err(AppError::from)?;

        if transaction.txn_type == TransactionType::Internal {
            self.check_transfer_funds(transaction.money_source_id, transaction.amount_cents)?;
        }

        self.store.commit(WriteBatch::transaction(transaction.clone()));
        tracing::info!(
            transaction_id = %transaction.id,
            company_id = %transaction.company_id,
            amount = %transaction.amount_cents,
            "transaction created"
        );
        self.events.publish(&DomainEvent::TransactionCreated {
            transaction: transaction.clone(),
        });
        Ok(transaction)
    }

    /// Applies a bounded-field update.
    ///
    /// # Errors
    ///
    /// `NotFound` for missing/deleted rows, `Conflict` for paired-leg edits,
    /// plus the usual validation failures.
    pub fn update(
        &self,
        id: TransactionId,
        patch: &TransactionPatch,
        actor_id: UserId,
    ) -> AppResult<Transaction> {
        let actor = self
            .store
            .get_user(actor_id)
            .ok_or_else(|| AppError::from(LedgerError::UserNotFound(actor_id)))?;
        let existing = self
            .store
            .get_transaction(id)
            .ok_or_else(|| AppError::from(LedgerError::TransactionNotFound(id)))?;

        // Lock the row's current sources plus any source the patch moves it
        // to, then re-read under the locks.
        let mut touched = vec![existing.money_source_id];
        if let Some(to) = existing.to_money_source_id {
            touched.push(to);
        }
        if let Some(new_source) = patch.money_source_id {
            touched.push(new_source);
        }
        let locks = self.store.write_locks(&touched);
        let _guards = MemoryStore::acquire(&locks);

        let existing = self
            .store
            .get_transaction(id)
            .ok_or_else(|| AppError::from(LedgerError::TransactionNotFound(id)))?;

        let updated = LedgerService::validate_update(
            &existing,
            patch,
            &actor,
            |category_id| self.store.get_category(category_id),
            |source_id| self.store.get_source(source_id),
        )
        .map_err(AppError::from)?;

        self.store.commit(WriteBatch::transaction(updated.clone()));
        tracing::info!(transaction_id = %updated.id, "transaction updated");
        self.events.publish(&DomainEvent::TransactionUpdated {
            transaction: updated.clone(),
        });
        Ok(updated)
    }

    /// Soft-deletes a transaction. Idempotent: deleting a deleted row is a
    /// no-op.
    ///
    /// Deleting one leg of an advance-issuance pair tombstones both legs in
    /// one commit, keeping the pair's balances consistent.
    ///
    /// # Errors
    ///
    /// `NotFound` for rows of another company, `Forbidden` when the actor
    /// lacks rights on the touched sources.
    pub fn soft_delete(&self, id: TransactionId, actor_id: UserId) -> AppResult<()> {
        let actor = self
            .store
            .get_user(actor_id)
            .ok_or_else(|| AppError::from(LedgerError::UserNotFound(actor_id)))?;
        let existing = self
            .store
            .get_transaction(id)
            .ok_or_else(|| AppError::from(LedgerError::TransactionNotFound(id)))?;

        let legs = match existing.pair_id {
            Some(pair_id) => self.store.transactions_in_pair(pair_id),
            None => vec![existing],
        };

        let mut touched: Vec<MoneySourceId> =
            legs.iter().map(|leg| leg.money_source_id).collect();
        touched.extend(legs.iter().filter_map(|leg| leg.to_money_source_id));
        let locks = self.store.write_locks(&touched);
        let _guards = MemoryStore::acquire(&locks);

        // Resolve every tombstone before writing any: a rejected leg must
        // leave the whole operation without side effects.
        let mut tombstones = Vec::with_capacity(legs.len());
        for leg in &legs {
            let deleted =
                LedgerService::validate_delete(leg, &actor, |source_id| {
                    self.store.get_source(source_id)
                })
                .map_err(AppError::from)?;
            if let Some(deleted) = deleted {
                tombstones.push(deleted);
            }
        }
        if tombstones.is_empty() {
            return Ok(()); // already deleted
        }

        let deleted_ids: Vec<(TransactionId, _)> = tombstones
            .iter()
            .map(|t| (t.id, t.company_id))
            .collect();
        self.store.commit(WriteBatch {
            new_sources: Vec::new(),
            transactions: tombstones,
        });
        for (transaction_id, company_id) in deleted_ids {
            tracing::info!(%transaction_id, "transaction soft-deleted");
            self.events.publish(&DomainEvent::TransactionDeleted {
                transaction_id,
                company_id,
                deleted_by: actor_id,
            });
        }
        Ok(())
    }

    /// Derives the current balance of a money source.
    ///
    /// Pure read-side projection over non-deleted history; a source with no
    /// transactions reports zero.
    ///
    /// # Errors
    ///
    /// `NotFound` if the source does not exist.
    pub fn get_balance(&self, source_id: MoneySourceId) -> AppResult<Cents> {
        if self.store.get_source(source_id).is_none() {
            return Err(LedgerError::SourceNotFound(source_id).into());
        }
        let history = self.store.transactions_touching(source_id);
        Ok(balance_of(source_id, &history))
    }

    /// Re-checks an INTERNAL transfer against the live balance. Must be
    /// called while holding the source's write lock.
    fn check_transfer_funds(&self, source_id: MoneySourceId, amount: Cents) -> AppResult<()> {
        let history = self.store.transactions_touching(source_id);
        let available = balance_of(source_id, &history);
        if amount > available {
            return Err(AppError::InsufficientFunds(format!(
                "transfer of {amount} exceeds balance {available} of source {source_id}"
            )));
        }
        Ok(())
    }
}
