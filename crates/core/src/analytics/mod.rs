//! Read-side analytics aggregation.
//!
//! Period summaries, category and project breakdowns, cash-flow matrices,
//! and daily history, all computed live from the transaction set through the
//! shared non-deleted predicate. Nothing here mutates or caches ledger state.

pub mod filter;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_tests;

pub use filter::AnalyticsFilter;
pub use service::AnalyticsService;
pub use types::{
    AnalyticsSummary, CashFlowReport, CashFlowRow, CashFlowTotals, CategoryBreakdownRow,
    DailyFlow, MonthKey, PeriodTotals, ProjectBreakdownRow,
};
