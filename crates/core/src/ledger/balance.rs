//! Derived balance calculation.
//!
//! A money source's balance is always recomputed from its transaction
//! history. It is never persisted and never memoized: a late edit or
//! soft-delete changes it retroactively, so recomputation is the only
//! correctness oracle.

use serde::{Deserialize, Serialize};

use sitebook_shared::types::MoneySourceId;
use sitebook_shared::Cents;

use super::types::{Transaction, TransactionType};

/// Signed effect of one transaction on one money source.
///
/// Sign rules by type:
/// - INCOME credits the primary source
/// - EXPENSE and PAYOUT debit the primary source
/// - INTERNAL debits the primary source and credits the destination
///
/// The outgoing advance-issuance leg is an EXPENSE whose
/// `to_money_source_id` is linkage only; the matching INCOME leg carries the
/// credit, so advances need no rule of their own. Soft-deleted rows have no
/// effect.
#[must_use]
pub fn signed_effect(txn: &Transaction, source_id: MoneySourceId) -> Cents {
    if !txn.is_active() {
        return Cents::ZERO;
    }

    let mut effect = Cents::ZERO;

    if txn.money_source_id == source_id {
        effect += match txn.txn_type {
            TransactionType::Income => txn.amount_cents,
            TransactionType::Expense | TransactionType::Payout | TransactionType::Internal => {
                -txn.amount_cents
            }
        };
    }

    if txn.txn_type == TransactionType::Internal && txn.to_money_source_id == Some(source_id) {
        effect += txn.amount_cents;
    }

    effect
}

/// Derives the current balance of a money source from transaction history.
///
/// A source with zero transactions has balance zero, not an error.
#[must_use]
pub fn balance_of<'a, I>(source_id: MoneySourceId, transactions: I) -> Cents
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .map(|txn| signed_effect(txn, source_id))
        .sum()
}

/// Balance of a money source with its credit/debit totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceBalance {
    /// The money source.
    pub money_source_id: MoneySourceId,
    /// Total credited.
    pub credited_cents: Cents,
    /// Total debited.
    pub debited_cents: Cents,
    /// Net balance (credited - debited).
    pub balance_cents: Cents,
}

impl SourceBalance {
    /// Computes the balance breakdown for a money source.
    #[must_use]
    pub fn compute<'a, I>(source_id: MoneySourceId, transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut credited = Cents::ZERO;
        let mut debited = Cents::ZERO;

        for txn in transactions {
            let effect = signed_effect(txn, source_id);
            if effect.is_positive() {
                credited += effect;
            } else {
                debited += -effect;
            }
        }

        Self {
            money_source_id: source_id,
            credited_cents: credited,
            debited_cents: debited,
            balance_cents: credited - debited,
        }
    }
}
