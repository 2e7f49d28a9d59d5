//! Property-based tests for the derived balance calculation.
//!
//! The central law: for any transaction history, a source's balance equals
//! the signed sum of its non-deleted rows, with soft-deleted rows having no
//! effect.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;

use sitebook_shared::types::{CategoryId, CompanyId, MoneySourceId, TransactionId, UserId};
use sitebook_shared::Cents;

use super::balance::{balance_of, signed_effect, SourceBalance};
use super::types::{ReceiptStatus, Transaction, TransactionType};

/// One generated history step against a small pool of sources.
#[derive(Debug, Clone)]
struct Step {
    txn_type: TransactionType,
    amount: i64,
    source_index: usize,
    to_index: usize,
    deleted: bool,
}

fn step_strategy(pool_size: usize) -> impl Strategy<Value = Step> {
    (
        prop_oneof![
            Just(TransactionType::Income),
            Just(TransactionType::Expense),
            Just(TransactionType::Payout),
            Just(TransactionType::Internal),
        ],
        1i64..1_000_000i64,
        0..pool_size,
        0..pool_size,
        prop::bool::ANY,
    )
        .prop_map(|(txn_type, amount, source_index, to_index, deleted)| Step {
            txn_type,
            amount,
            source_index,
            to_index,
            deleted,
        })
}

fn history_strategy(pool_size: usize, max_len: usize) -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(step_strategy(pool_size), 0..=max_len)
}

fn materialize(steps: &[Step], pool: &[MoneySourceId]) -> Vec<Transaction> {
    let company = CompanyId::new();
    let now = Utc::now();
    steps
        .iter()
        .map(|step| {
            let source = pool[step.source_index];
            // Internal transfers need a destination distinct from the source.
            let to = if step.txn_type == TransactionType::Internal {
                let mut to = pool[step.to_index];
                if to == source {
                    to = pool[(step.to_index + 1) % pool.len()];
                }
                Some(to)
            } else {
                None
            };
            Transaction {
                id: TransactionId::new(),
                company_id: company,
                txn_type: step.txn_type,
                amount_cents: Cents::new(step.amount),
                date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
                money_source_id: source,
                to_money_source_id: to,
                category_id: CategoryId::new(),
                project_id: None,
                created_by: UserId::new(),
                comment: None,
                receipt: ReceiptStatus::Missing,
                pair_id: None,
                created_at: now,
                updated_at: now,
                deleted_at: step.deleted.then(|| now),
            }
        })
        .collect()
}

fn source_pool() -> Vec<MoneySourceId> {
    (0..3).map(|_| MoneySourceId::new()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* history, the balance equals the signed sum of per-row
    /// effects computed independently.
    #[test]
    fn prop_balance_is_signed_sum(steps in history_strategy(3, 30)) {
        let pool = source_pool();
        let txns = materialize(&steps, &pool);

        for &source in &pool {
            let expected: Cents = txns.iter().map(|t| signed_effect(t, source)).sum();
            prop_assert_eq!(balance_of(source, &txns), expected);
        }
    }

    /// *For any* history, soft-deleted rows never move any balance: deleting
    /// every row yields zero everywhere.
    #[test]
    fn prop_deleted_rows_have_no_effect(steps in history_strategy(3, 30)) {
        let pool = source_pool();
        let mut txns = materialize(&steps, &pool);
        for txn in &mut txns {
            txn.deleted_at = Some(Utc::now());
        }

        for &source in &pool {
            prop_assert_eq!(balance_of(source, &txns), Cents::ZERO);
        }
    }

    /// *For any* history, soft-deleting one row changes the balance by
    /// exactly that row's signed effect.
    #[test]
    fn prop_delete_removes_exactly_one_effect(
        steps in history_strategy(3, 30),
        pick in 0usize..30,
    ) {
        let pool = source_pool();
        let mut txns = materialize(&steps, &pool);
        prop_assume!(!txns.is_empty());
        let pick = pick % txns.len();

        let before: Vec<Cents> = pool.iter().map(|&s| balance_of(s, &txns)).collect();
        let effects: Vec<Cents> = pool
            .iter()
            .map(|&s| signed_effect(&txns[pick], s))
            .collect();

        txns[pick].deleted_at = Some(Utc::now());

        for (i, &source) in pool.iter().enumerate() {
            prop_assert_eq!(balance_of(source, &txns), before[i] - effects[i]);
        }
    }

    /// *For any* history, internal transfers preserve the total across the
    /// pool: the sum of all balances equals income minus expense and payout.
    #[test]
    fn prop_transfers_preserve_pool_total(steps in history_strategy(3, 30)) {
        let pool = source_pool();
        let txns = materialize(&steps, &pool);

        let pool_total: Cents = pool.iter().map(|&s| balance_of(s, &txns)).sum();
        let expected: Cents = txns
            .iter()
            .filter(|t| t.is_active())
            .map(|t| match t.txn_type {
                TransactionType::Income => t.amount_cents,
                TransactionType::Expense | TransactionType::Payout => -t.amount_cents,
                TransactionType::Internal => Cents::ZERO,
            })
            .sum();
        prop_assert_eq!(pool_total, expected);
    }

    /// *For any* history, the credit/debit breakdown reconciles with the
    /// balance.
    #[test]
    fn prop_breakdown_reconciles(steps in history_strategy(3, 30)) {
        let pool = source_pool();
        let txns = materialize(&steps, &pool);

        for &source in &pool {
            let summary = SourceBalance::compute(source, &txns);
            prop_assert_eq!(
                summary.balance_cents,
                summary.credited_cents - summary.debited_cents
            );
            prop_assert_eq!(summary.balance_cents, balance_of(source, &txns));
            prop_assert!(!summary.credited_cents.is_negative());
            prop_assert!(!summary.debited_cents.is_negative());
        }
    }
}
