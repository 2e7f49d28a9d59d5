//! Domain events and the publisher seam.
//!
//! The engine fans out ledger facts (for notification bots, audit trails,
//! external integrations) through an injected publisher rather than
//! hard-wired calls, keeping the operation contracts free of side-channel
//! concerns. Publishers run after the store commit; a slow or failing
//! subscriber cannot undo a committed write.

use serde::{Deserialize, Serialize};

use sitebook_shared::types::{CompanyId, MoneySourceId, TransactionId, UserId};
use sitebook_shared::Cents;

use crate::ledger::types::Transaction;

/// A fact the engine emits after a committed write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A transaction was created.
    TransactionCreated {
        /// The created row.
        transaction: Transaction,
    },
    /// A transaction was edited.
    TransactionUpdated {
        /// The row after the edit.
        transaction: Transaction,
    },
    /// A transaction was soft-deleted.
    TransactionDeleted {
        /// The deleted transaction.
        transaction_id: TransactionId,
        /// Its company.
        company_id: CompanyId,
        /// The user who deleted it.
        deleted_by: UserId,
    },
    /// An advance was issued (or an existing advance topped up).
    AdvanceIssued {
        /// The company.
        company_id: CompanyId,
        /// The employee who received the cash.
        recipient_user_id: UserId,
        /// The advance sub-account credited.
        advance_source_id: MoneySourceId,
        /// Issued amount.
        amount_cents: Cents,
        /// True if the sub-account was provisioned by this issuance.
        is_new_source: bool,
    },
    /// An advance was (partially) returned.
    AdvanceReturned {
        /// The company.
        company_id: CompanyId,
        /// The advance sub-account debited.
        advance_source_id: MoneySourceId,
        /// The company source that received the cash.
        destination_source_id: MoneySourceId,
        /// Returned amount.
        amount_cents: Cents,
        /// Advance balance after the return.
        remaining_cents: Cents,
    },
}

/// Subscriber seam for domain events.
///
/// Implementations must not block the write path and must not fail it:
/// publishing happens after commit and errors stay inside the subscriber.
pub trait EventPublisher: Send + Sync {
    /// Delivers one event.
    fn publish(&self, event: &DomainEvent);
}

/// Publisher that drops every event; the default when no subscriber is
/// injected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPublisher;

impl EventPublisher for NullPublisher {
    fn publish(&self, _event: &DomainEvent) {}
}
