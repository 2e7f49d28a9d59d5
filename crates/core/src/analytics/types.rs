//! Analytics report data types.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sitebook_shared::types::{CategoryGroupId, CategoryId, ProjectId};
use sitebook_shared::Cents;

/// Period totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Total income.
    pub total_income_cents: Cents,
    /// Total expense.
    pub total_expense_cents: Cents,
    /// income − expense.
    pub profit_cents: Cents,
    /// profit / income as a percentage; zero when income is zero.
    pub profit_margin_percent: Decimal,
}

/// One category's share of a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdownRow {
    /// The category.
    pub category_id: CategoryId,
    /// Category name.
    pub name: String,
    /// Reporting group, if any.
    pub group_id: Option<CategoryGroupId>,
    /// Summed amount.
    pub total_cents: Cents,
    /// Share of the direction total.
    pub share_percent: Decimal,
}

/// One project's flows in a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectBreakdownRow {
    /// The project, or None for unassigned transactions.
    pub project_id: Option<ProjectId>,
    /// Project name ("No project" for unassigned).
    pub name: String,
    /// Income attributed to the project.
    pub income_cents: Cents,
    /// Expense attributed to the project.
    pub expense_cents: Cents,
    /// income − expense.
    pub net_cents: Cents,
}

/// Per-day income/expense totals for time-series charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyFlow {
    /// The day.
    pub date: NaiveDate,
    /// Income on that day.
    pub income_cents: Cents,
    /// Expense on that day.
    pub expense_cents: Cents,
}

/// Full period summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    /// Period totals.
    pub totals: PeriodTotals,
    /// Expense breakdown by category.
    pub expense_by_category: Vec<CategoryBreakdownRow>,
    /// Income breakdown by category.
    pub income_by_category: Vec<CategoryBreakdownRow>,
    /// Per-project flows.
    pub by_project: Vec<ProjectBreakdownRow>,
    /// Daily history (sparse-filled between first and last active day).
    pub history: Vec<DailyFlow>,
}

/// A calendar month column in the cash-flow matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
}

impl MonthKey {
    /// The month containing a calendar date.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following month.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Every month from `from` through `to`, inclusive.
    #[must_use]
    pub fn span(from: Self, to: Self) -> Vec<Self> {
        let mut months = Vec::new();
        let mut current = from;
        while current <= to {
            months.push(current);
            current = current.next();
        }
        months
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One category row of the cash-flow matrix.
///
/// `cells` is dense: one entry per report column, zero when the category saw
/// no activity that month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowRow {
    /// The category.
    pub category_id: CategoryId,
    /// Category name.
    pub name: String,
    /// Per-month sums, aligned with the report columns.
    pub cells: Vec<Cents>,
    /// Row total.
    pub total_cents: Cents,
}

/// Column and grand totals of the cash-flow matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowTotals {
    /// Income column totals, aligned with the report columns.
    pub income_by_month: Vec<Cents>,
    /// Expense column totals, aligned with the report columns.
    pub expense_by_month: Vec<Cents>,
    /// Net flow per month (income − expense).
    pub net_by_month: Vec<Cents>,
    /// Grand income total.
    pub income_total_cents: Cents,
    /// Grand expense total.
    pub expense_total_cents: Cents,
    /// Grand net flow.
    pub net_total_cents: Cents,
}

/// Category × month cash-flow matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowReport {
    /// Month columns, ascending.
    pub columns: Vec<MonthKey>,
    /// Income section rows.
    pub income_rows: Vec<CashFlowRow>,
    /// Expense section rows.
    pub expense_rows: Vec<CashFlowRow>,
    /// Column totals and grand totals.
    pub totals: CashFlowTotals,
}
