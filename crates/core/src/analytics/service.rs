//! Analytics aggregation service.
//!
//! Pure folds over the transaction set. INCOME and EXPENSE rows feed the
//! aggregates; INTERNAL transfers and PAYOUT withdrawals are money movement,
//! not earnings or costs, and rows tagged with an advance system category
//! are likewise excluded (handing cash to a foreman is not yet an expense).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use sitebook_shared::types::{CategoryId, ProjectId};
use sitebook_shared::Cents;

use crate::ledger::types::{Category, Transaction, TransactionType};

use super::filter::AnalyticsFilter;
use super::types::{
    AnalyticsSummary, CashFlowReport, CashFlowRow, CashFlowTotals, CategoryBreakdownRow,
    DailyFlow, MonthKey, PeriodTotals, ProjectBreakdownRow,
};

/// Stateless read-side aggregation service.
pub struct AnalyticsService;

impl AnalyticsService {
    /// Returns the flow direction and amount of a transaction, if it counts
    /// toward income/expense aggregates.
    fn flow_of<C>(txn: &Transaction, category_lookup: &C) -> Option<(TransactionType, Cents)>
    where
        C: Fn(CategoryId) -> Option<Category>,
    {
        if !matches!(
            txn.txn_type,
            TransactionType::Income | TransactionType::Expense
        ) {
            return None;
        }
        if let Some(category) = category_lookup(txn.category_id) {
            if category.is_advance_movement() {
                return None;
            }
        }
        Some((txn.txn_type, txn.amount_cents))
    }

    /// Computes period totals.
    ///
    /// Profit margin is zero when income is zero, not a divide-by-zero fault.
    pub fn period_totals<C>(
        transactions: &[Transaction],
        filter: &AnalyticsFilter,
        category_lookup: C,
    ) -> PeriodTotals
    where
        C: Fn(CategoryId) -> Option<Category>,
    {
        let mut income = Cents::ZERO;
        let mut expense = Cents::ZERO;

        for txn in transactions.iter().filter(|t| filter.matches(t)) {
            match Self::flow_of(txn, &category_lookup) {
                Some((TransactionType::Income, amount)) => income += amount,
                Some((_, amount)) => expense += amount,
                None => {}
            }
        }

        let profit = income - expense;
        PeriodTotals {
            total_income_cents: income,
            total_expense_cents: expense,
            profit_cents: profit,
            profit_margin_percent: profit.percent_of(income),
        }
    }

    /// Groups one flow direction by category.
    ///
    /// Rows are sorted by total descending, then name.
    pub fn category_breakdown<C>(
        transactions: &[Transaction],
        filter: &AnalyticsFilter,
        direction: TransactionType,
        category_lookup: C,
    ) -> Vec<CategoryBreakdownRow>
    where
        C: Fn(CategoryId) -> Option<Category>,
    {
        let mut sums: BTreeMap<CategoryId, Cents> = BTreeMap::new();
        for txn in transactions.iter().filter(|t| filter.matches(t)) {
            if let Some((flow_direction, amount)) = Self::flow_of(txn, &category_lookup) {
                if flow_direction == direction {
                    *sums.entry(txn.category_id).or_default() += amount;
                }
            }
        }

        let direction_total: Cents = sums.values().copied().sum();
        let mut rows: Vec<CategoryBreakdownRow> = sums
            .into_iter()
            .map(|(category_id, total)| {
                let category = category_lookup(category_id);
                CategoryBreakdownRow {
                    category_id,
                    name: category
                        .as_ref()
                        .map_or_else(|| "Unknown".to_string(), |c| c.name.clone()),
                    group_id: category.and_then(|c| c.group_id),
                    total_cents: total,
                    share_percent: total.percent_of(direction_total),
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total_cents
                .cmp(&a.total_cents)
                .then_with(|| a.name.cmp(&b.name))
        });
        rows
    }

    /// Groups flows by project.
    ///
    /// Transactions without a project land on a trailing "No project" row.
    pub fn project_breakdown<C, P>(
        transactions: &[Transaction],
        filter: &AnalyticsFilter,
        category_lookup: C,
        project_name: P,
    ) -> Vec<ProjectBreakdownRow>
    where
        C: Fn(CategoryId) -> Option<Category>,
        P: Fn(ProjectId) -> Option<String>,
    {
        let mut sums: BTreeMap<Option<ProjectId>, (Cents, Cents)> = BTreeMap::new();
        for txn in transactions.iter().filter(|t| filter.matches(t)) {
            if let Some((direction, amount)) = Self::flow_of(txn, &category_lookup) {
                let entry = sums.entry(txn.project_id).or_default();
                if direction == TransactionType::Income {
                    entry.0 += amount;
                } else {
                    entry.1 += amount;
                }
            }
        }

        let mut rows: Vec<ProjectBreakdownRow> = sums
            .into_iter()
            .map(|(project_id, (income, expense))| ProjectBreakdownRow {
                project_id,
                name: project_id
                    .and_then(&project_name)
                    .unwrap_or_else(|| "No project".to_string()),
                income_cents: income,
                expense_cents: expense,
                net_cents: income - expense,
            })
            .collect();
        rows.sort_by(|a, b| {
            a.project_id
                .is_none()
                .cmp(&b.project_id.is_none())
                .then_with(|| a.name.cmp(&b.name))
        });
        rows
    }

    /// Per-day income/expense totals.
    ///
    /// Days with no activity appear with zero values only when they fall
    /// strictly between the first and last active day (sparse-fill policy);
    /// the result is not padded to the full query window.
    pub fn daily_history<C>(
        transactions: &[Transaction],
        filter: &AnalyticsFilter,
        category_lookup: C,
    ) -> Vec<DailyFlow>
    where
        C: Fn(CategoryId) -> Option<Category>,
    {
        let mut days: BTreeMap<NaiveDate, (Cents, Cents)> = BTreeMap::new();
        for txn in transactions.iter().filter(|t| filter.matches(t)) {
            if let Some((direction, amount)) = Self::flow_of(txn, &category_lookup) {
                let entry = days.entry(txn.date).or_default();
                if direction == TransactionType::Income {
                    entry.0 += amount;
                } else {
                    entry.1 += amount;
                }
            }
        }

        let (Some(&first), Some(&last)) =
            (days.keys().next(), days.keys().next_back())
        else {
            return Vec::new();
        };

        first
            .iter_days()
            .take_while(|d| *d <= last)
            .map(|date| {
                let (income, expense) = days.get(&date).copied().unwrap_or_default();
                DailyFlow {
                    date,
                    income_cents: income,
                    expense_cents: expense,
                }
            })
            .collect()
    }

    /// Builds the full period summary.
    pub fn summary<C, P>(
        transactions: &[Transaction],
        filter: &AnalyticsFilter,
        category_lookup: C,
        project_name: P,
    ) -> AnalyticsSummary
    where
        C: Fn(CategoryId) -> Option<Category>,
        P: Fn(ProjectId) -> Option<String>,
    {
        AnalyticsSummary {
            totals: Self::period_totals(transactions, filter, &category_lookup),
            expense_by_category: Self::category_breakdown(
                transactions,
                filter,
                TransactionType::Expense,
                &category_lookup,
            ),
            income_by_category: Self::category_breakdown(
                transactions,
                filter,
                TransactionType::Income,
                &category_lookup,
            ),
            by_project: Self::project_breakdown(
                transactions,
                filter,
                &category_lookup,
                project_name,
            ),
            history: Self::daily_history(transactions, filter, &category_lookup),
        }
    }

    /// Builds the category × month cash-flow matrix.
    ///
    /// Columns span the filter window when both bounds are set, otherwise the
    /// months actually touched by matching transactions. Every cell resolves
    /// to a number: missing activity is zero, not absent.
    pub fn cash_flow<C>(
        transactions: &[Transaction],
        filter: &AnalyticsFilter,
        category_lookup: C,
    ) -> CashFlowReport
    where
        C: Fn(CategoryId) -> Option<Category>,
    {
        let flows: Vec<(&Transaction, TransactionType, Cents)> = transactions
            .iter()
            .filter(|t| filter.matches(t))
            .filter_map(|t| {
                Self::flow_of(t, &category_lookup).map(|(direction, amount)| (t, direction, amount))
            })
            .collect();

        let columns: Vec<MonthKey> = match (filter.date_from, filter.date_to) {
            (Some(from), Some(to)) => MonthKey::span(MonthKey::of(from), MonthKey::of(to)),
            _ => {
                let months: Vec<MonthKey> =
                    flows.iter().map(|(t, _, _)| MonthKey::of(t.date)).collect();
                match (months.iter().min(), months.iter().max()) {
                    (Some(&first), Some(&last)) => MonthKey::span(first, last),
                    _ => Vec::new(),
                }
            }
        };

        let column_index: BTreeMap<MonthKey, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, &m)| (m, i))
            .collect();

        let mut income_cells: BTreeMap<CategoryId, Vec<Cents>> = BTreeMap::new();
        let mut expense_cells: BTreeMap<CategoryId, Vec<Cents>> = BTreeMap::new();

        for (txn, direction, amount) in flows {
            let Some(&index) = column_index.get(&MonthKey::of(txn.date)) else {
                continue;
            };
            let cells = if direction == TransactionType::Income {
                &mut income_cells
            } else {
                &mut expense_cells
            };
            cells
                .entry(txn.category_id)
                .or_insert_with(|| vec![Cents::ZERO; columns.len()])[index] += amount;
        }

        let build_rows = |cells: BTreeMap<CategoryId, Vec<Cents>>| -> Vec<CashFlowRow> {
            let mut rows: Vec<CashFlowRow> = cells
                .into_iter()
                .map(|(category_id, cells)| CashFlowRow {
                    category_id,
                    name: category_lookup(category_id)
                        .map_or_else(|| "Unknown".to_string(), |c| c.name),
                    total_cents: cells.iter().copied().sum(),
                    cells,
                })
                .collect();
            rows.sort_by(|a, b| {
                b.total_cents
                    .cmp(&a.total_cents)
                    .then_with(|| a.name.cmp(&b.name))
            });
            rows
        };

        let income_rows = build_rows(income_cells);
        let expense_rows = build_rows(expense_cells);

        let column_sum = |rows: &[CashFlowRow]| -> Vec<Cents> {
            let mut totals = vec![Cents::ZERO; columns.len()];
            for row in rows {
                for (total, &cell) in totals.iter_mut().zip(&row.cells) {
                    *total += cell;
                }
            }
            totals
        };

        let income_by_month = column_sum(&income_rows);
        let expense_by_month = column_sum(&expense_rows);
        let net_by_month: Vec<Cents> = income_by_month
            .iter()
            .zip(&expense_by_month)
            .map(|(&i, &e)| i - e)
            .collect();
        let income_total: Cents = income_by_month.iter().copied().sum();
        let expense_total: Cents = expense_by_month.iter().copied().sum();

        CashFlowReport {
            columns,
            income_rows,
            expense_rows,
            totals: CashFlowTotals {
                income_by_month,
                expense_by_month,
                net_by_month,
                income_total_cents: income_total,
                expense_total_cents: expense_total,
                net_total_cents: income_total - expense_total,
            },
        }
    }

    /// Aggregate balance of a project: income − expense − payout over its
    /// non-deleted transactions.
    ///
    /// Used by the project-lifecycle collaborator when closing a project.
    pub fn project_balance<C>(
        transactions: &[Transaction],
        project_id: ProjectId,
        category_lookup: C,
    ) -> Cents
    where
        C: Fn(CategoryId) -> Option<Category>,
    {
        transactions
            .iter()
            .filter(|t| t.is_active() && t.project_id == Some(project_id))
            .map(|t| {
                if let Some(category) = category_lookup(t.category_id) {
                    if category.is_advance_movement() {
                        return Cents::ZERO;
                    }
                }
                match t.txn_type {
                    TransactionType::Income => t.amount_cents,
                    TransactionType::Expense | TransactionType::Payout => -t.amount_cents,
                    TransactionType::Internal => Cents::ZERO,
                }
            })
            .sum()
    }
}
