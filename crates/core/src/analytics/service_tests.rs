//! Tests for the analytics aggregator, including the cash-flow matrix
//! consistency laws.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal_macros::dec;

use sitebook_shared::types::{
    CategoryId, CompanyId, MoneySourceId, ProjectId, TransactionId, UserId,
};
use sitebook_shared::Cents;

use super::filter::AnalyticsFilter;
use super::service::AnalyticsService;
use super::types::MonthKey;
use crate::ledger::types::{
    Category, ReceiptStatus, SystemTag, Transaction, TransactionType,
};

struct World {
    source: MoneySourceId,
    categories: HashMap<CategoryId, Category>,
    transactions: Vec<Transaction>,
}

impl World {
    fn new() -> Self {
        Self {
            source: MoneySourceId::new(),
            categories: HashMap::new(),
            transactions: Vec::new(),
        }
    }

    fn category(&mut self, name: &str, tag: Option<SystemTag>) -> CategoryId {
        let category = Category {
            id: CategoryId::new(),
            company_id: None,
            name: name.to_string(),
            allowed_types: vec![
                TransactionType::Income,
                TransactionType::Expense,
                TransactionType::Internal,
            ],
            group_id: None,
            system_tag: tag,
        };
        let id = category.id;
        self.categories.insert(id, category);
        id
    }

    fn add(
        &mut self,
        txn_type: TransactionType,
        amount: i64,
        date: (i32, u32, u32),
        category_id: CategoryId,
        project_id: Option<ProjectId>,
    ) -> TransactionId {
        let now = Utc::now();
        let txn = Transaction {
            id: TransactionId::new(),
            company_id: CompanyId::new(),
            txn_type,
            amount_cents: Cents::new(amount),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            money_source_id: self.source,
            to_money_source_id: None,
            category_id,
            project_id,
            created_by: UserId::new(),
            comment: None,
            receipt: ReceiptStatus::Missing,
            pair_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let id = txn.id;
        self.transactions.push(txn);
        id
    }

    fn lookup(&self) -> impl Fn(CategoryId) -> Option<Category> + '_ {
        move |id| self.categories.get(&id).cloned()
    }
}

#[test]
fn test_period_totals_and_margin() {
    let mut world = World::new();
    let payments = world.category("Client payments", None);
    let materials = world.category("Materials", None);
    world.add(TransactionType::Income, 100_000, (2026, 3, 5), payments, None);
    world.add(TransactionType::Expense, 30_000, (2026, 3, 9), materials, None);

    let totals = AnalyticsService::period_totals(
        &world.transactions,
        &AnalyticsFilter::new(),
        world.lookup(),
    );
    assert_eq!(totals.total_income_cents, Cents::new(100_000));
    assert_eq!(totals.total_expense_cents, Cents::new(30_000));
    assert_eq!(totals.profit_cents, Cents::new(70_000));
    assert_eq!(totals.profit_margin_percent, dec!(70.00));

    let breakdown = AnalyticsService::category_breakdown(
        &world.transactions,
        &AnalyticsFilter::new(),
        TransactionType::Expense,
        world.lookup(),
    );
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].name, "Materials");
    assert_eq!(breakdown[0].total_cents, Cents::new(30_000));
    assert_eq!(breakdown[0].share_percent, dec!(100.00));
}

#[test]
fn test_margin_zero_when_no_income() {
    let mut world = World::new();
    let materials = world.category("Materials", None);
    world.add(TransactionType::Expense, 5_000, (2026, 3, 9), materials, None);

    let totals = AnalyticsService::period_totals(
        &world.transactions,
        &AnalyticsFilter::new(),
        world.lookup(),
    );
    assert_eq!(totals.profit_cents, Cents::new(-5_000));
    assert_eq!(totals.profit_margin_percent, dec!(0));
}

#[test]
fn test_payout_and_internal_not_counted() {
    let mut world = World::new();
    let payments = world.category("Client payments", None);
    let transfers = world.category("Transfers", None);
    world.add(TransactionType::Income, 50_000, (2026, 3, 5), payments, None);
    world.add(TransactionType::Payout, 20_000, (2026, 3, 6), transfers, None);
    world.add(TransactionType::Internal, 10_000, (2026, 3, 7), transfers, None);

    let totals = AnalyticsService::period_totals(
        &world.transactions,
        &AnalyticsFilter::new(),
        world.lookup(),
    );
    assert_eq!(totals.total_income_cents, Cents::new(50_000));
    assert_eq!(totals.total_expense_cents, Cents::ZERO);
}

#[test]
fn test_advance_movements_excluded() {
    let mut world = World::new();
    let payments = world.category("Client payments", None);
    let advance = world.category("Advance", Some(SystemTag::AdvanceIssue));
    world.add(TransactionType::Income, 50_000, (2026, 3, 5), payments, None);
    // The two legs of an advance issuance: cash relocation, not flows.
    world.add(TransactionType::Expense, 30_000, (2026, 3, 6), advance, None);
    world.add(TransactionType::Income, 30_000, (2026, 3, 6), advance, None);

    let totals = AnalyticsService::period_totals(
        &world.transactions,
        &AnalyticsFilter::new(),
        world.lookup(),
    );
    assert_eq!(totals.total_income_cents, Cents::new(50_000));
    assert_eq!(totals.total_expense_cents, Cents::ZERO);
}

#[test]
fn test_soft_deleted_rows_excluded() {
    let mut world = World::new();
    let materials = world.category("Materials", None);
    world.add(TransactionType::Expense, 30_000, (2026, 3, 9), materials, None);
    world.transactions[0].deleted_at = Some(Utc::now());

    let totals = AnalyticsService::period_totals(
        &world.transactions,
        &AnalyticsFilter::new(),
        world.lookup(),
    );
    assert_eq!(totals.total_expense_cents, Cents::ZERO);
}

#[test]
fn test_date_window_filter() {
    let mut world = World::new();
    let materials = world.category("Materials", None);
    world.add(TransactionType::Expense, 10_000, (2026, 2, 28), materials, None);
    world.add(TransactionType::Expense, 20_000, (2026, 3, 1), materials, None);
    world.add(TransactionType::Expense, 40_000, (2026, 4, 1), materials, None);

    let filter = AnalyticsFilter::new().between(
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
    );
    let totals =
        AnalyticsService::period_totals(&world.transactions, &filter, world.lookup());
    assert_eq!(totals.total_expense_cents, Cents::new(20_000));
}

#[test]
fn test_project_breakdown_with_unassigned() {
    let mut world = World::new();
    let payments = world.category("Client payments", None);
    let materials = world.category("Materials", None);
    let house = ProjectId::new();
    world.add(TransactionType::Income, 90_000, (2026, 3, 5), payments, Some(house));
    world.add(TransactionType::Expense, 40_000, (2026, 3, 6), materials, Some(house));
    world.add(TransactionType::Expense, 5_000, (2026, 3, 7), materials, None);

    let rows = AnalyticsService::project_breakdown(
        &world.transactions,
        &AnalyticsFilter::new(),
        world.lookup(),
        |id| (id == house).then(|| "House on Abay 12".to_string()),
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "House on Abay 12");
    assert_eq!(rows[0].net_cents, Cents::new(50_000));
    assert_eq!(rows[1].name, "No project");
    assert_eq!(rows[1].expense_cents, Cents::new(5_000));
}

#[test]
fn test_project_balance() {
    let mut world = World::new();
    let payments = world.category("Client payments", None);
    let materials = world.category("Materials", None);
    let draw = world.category("Owner draw", None);
    let house = ProjectId::new();
    world.add(TransactionType::Income, 90_000, (2026, 3, 5), payments, Some(house));
    world.add(TransactionType::Expense, 40_000, (2026, 3, 6), materials, Some(house));
    world.add(TransactionType::Payout, 10_000, (2026, 3, 7), draw, Some(house));
    world.add(TransactionType::Expense, 99_000, (2026, 3, 8), materials, None);

    let balance =
        AnalyticsService::project_balance(&world.transactions, house, world.lookup());
    assert_eq!(balance, Cents::new(40_000));
}

#[test]
fn test_daily_history_sparse_fill() {
    let mut world = World::new();
    let payments = world.category("Client payments", None);
    let materials = world.category("Materials", None);
    world.add(TransactionType::Income, 10_000, (2026, 3, 1), payments, None);
    world.add(TransactionType::Expense, 4_000, (2026, 3, 4), materials, None);

    let history = AnalyticsService::daily_history(
        &world.transactions,
        &AnalyticsFilter::new(),
        world.lookup(),
    );
    // Dense from first to last active day, zero-filled in between.
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].income_cents, Cents::new(10_000));
    assert_eq!(history[1].income_cents, Cents::ZERO);
    assert_eq!(history[1].expense_cents, Cents::ZERO);
    assert_eq!(history[2].income_cents, Cents::ZERO);
    assert_eq!(history[3].expense_cents, Cents::new(4_000));
}

#[test]
fn test_daily_history_empty() {
    let world = World::new();
    let history = AnalyticsService::daily_history(
        &world.transactions,
        &AnalyticsFilter::new(),
        world.lookup(),
    );
    assert!(history.is_empty());
}

#[test]
fn test_cash_flow_matrix_dense_cells() {
    let mut world = World::new();
    let payments = world.category("Client payments", None);
    let materials = world.category("Materials", None);
    world.add(TransactionType::Income, 100_000, (2026, 1, 10), payments, None);
    world.add(TransactionType::Expense, 30_000, (2026, 3, 9), materials, None);

    let report = AnalyticsService::cash_flow(
        &world.transactions,
        &AnalyticsFilter::new(),
        world.lookup(),
    );

    // January through March, with February present and zeroed.
    assert_eq!(
        report.columns,
        vec![
            MonthKey { year: 2026, month: 1 },
            MonthKey { year: 2026, month: 2 },
            MonthKey { year: 2026, month: 3 },
        ]
    );
    assert_eq!(report.income_rows.len(), 1);
    assert_eq!(
        report.income_rows[0].cells,
        vec![Cents::new(100_000), Cents::ZERO, Cents::ZERO]
    );
    assert_eq!(
        report.expense_rows[0].cells,
        vec![Cents::ZERO, Cents::ZERO, Cents::new(30_000)]
    );
    assert_eq!(
        report.totals.net_by_month,
        vec![Cents::new(100_000), Cents::ZERO, Cents::new(-30_000)]
    );
    assert_eq!(report.totals.net_total_cents, Cents::new(70_000));
}

#[test]
fn test_cash_flow_explicit_window_pads_columns() {
    let mut world = World::new();
    let materials = world.category("Materials", None);
    world.add(TransactionType::Expense, 30_000, (2026, 3, 9), materials, None);

    let filter = AnalyticsFilter::new().between(
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
    );
    let report =
        AnalyticsService::cash_flow(&world.transactions, &filter, world.lookup());
    assert_eq!(report.columns.len(), 6);
    assert_eq!(report.expense_rows[0].cells.len(), 6);
}

#[test]
fn test_cash_flow_empty() {
    let world = World::new();
    let report = AnalyticsService::cash_flow(
        &world.transactions,
        &AnalyticsFilter::new(),
        world.lookup(),
    );
    assert!(report.columns.is_empty());
    assert!(report.income_rows.is_empty());
    assert!(report.expense_rows.is_empty());
    assert_eq!(report.totals.net_total_cents, Cents::ZERO);
}

// ============================================================================
// Matrix consistency laws
// ============================================================================

#[derive(Debug, Clone)]
struct GeneratedFlow {
    income: bool,
    amount: i64,
    category_index: usize,
    month_index: usize,
    day: u32,
}

fn flow_strategy() -> impl Strategy<Value = GeneratedFlow> {
    (
        prop::bool::ANY,
        1i64..500_000,
        0usize..4,
        0usize..6,
        1u32..=28,
    )
        .prop_map(|(income, amount, category_index, month_index, day)| GeneratedFlow {
            income,
            amount,
            category_index,
            month_index,
            day,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* set of flows: every row total equals the sum of its cells,
    /// every column total equals the sum of the category cells in that
    /// column, and grand income − grand expense equals the net-flow sum.
    #[test]
    fn prop_matrix_totals_consistent(flows in prop::collection::vec(flow_strategy(), 1..40)) {
        let mut world = World::new();
        let categories: Vec<CategoryId> = (0..4)
            .map(|i| world.category(&format!("Category {i}"), None))
            .collect();

        for flow in &flows {
            let txn_type = if flow.income {
                TransactionType::Income
            } else {
                TransactionType::Expense
            };
            let month = 1 + flow.month_index as u32;
            world.add(
                txn_type,
                flow.amount,
                (2026, month, flow.day),
                categories[flow.category_index],
                None,
            );
        }

        let report = AnalyticsService::cash_flow(
            &world.transactions,
            &AnalyticsFilter::new(),
            world.lookup(),
        );

        for row in report.income_rows.iter().chain(&report.expense_rows) {
            prop_assert_eq!(row.cells.len(), report.columns.len());
            let cell_sum: Cents = row.cells.iter().copied().sum();
            prop_assert_eq!(cell_sum, row.total_cents);
        }

        for (i, _) in report.columns.iter().enumerate() {
            let income_sum: Cents =
                report.income_rows.iter().map(|r| r.cells[i]).sum();
            let expense_sum: Cents =
                report.expense_rows.iter().map(|r| r.cells[i]).sum();
            prop_assert_eq!(income_sum, report.totals.income_by_month[i]);
            prop_assert_eq!(expense_sum, report.totals.expense_by_month[i]);
            prop_assert_eq!(
                report.totals.net_by_month[i],
                income_sum - expense_sum
            );
        }

        let net_sum: Cents = report.totals.net_by_month.iter().copied().sum();
        prop_assert_eq!(net_sum, report.totals.net_total_cents);
        prop_assert_eq!(
            report.totals.net_total_cents,
            report.totals.income_total_cents - report.totals.expense_total_cents
        );
    }

    /// *For any* set of flows, the matrix grand totals agree with the period
    /// totals over the same filter.
    #[test]
    fn prop_matrix_agrees_with_period_totals(
        flows in prop::collection::vec(flow_strategy(), 0..40),
    ) {
        let mut world = World::new();
        let categories: Vec<CategoryId> = (0..4)
            .map(|i| world.category(&format!("Category {i}"), None))
            .collect();
        for flow in &flows {
            let txn_type = if flow.income {
                TransactionType::Income
            } else {
                TransactionType::Expense
            };
            let month = 1 + flow.month_index as u32;
            world.add(
                txn_type,
                flow.amount,
                (2026, month, flow.day),
                categories[flow.category_index],
                None,
            );
        }

        let filter = AnalyticsFilter::new();
        let report =
            AnalyticsService::cash_flow(&world.transactions, &filter, world.lookup());
        let totals =
            AnalyticsService::period_totals(&world.transactions, &filter, world.lookup());

        prop_assert_eq!(report.totals.income_total_cents, totals.total_income_cents);
        prop_assert_eq!(report.totals.expense_total_cents, totals.total_expense_cents);
        prop_assert_eq!(report.totals.net_total_cents, totals.profit_cents);
    }
}
