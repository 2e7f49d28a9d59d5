//! Filtering for analytics queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use sitebook_shared::types::{MoneySourceId, ProjectId};

use crate::ledger::types::Transaction;

/// Filter window for analytics queries.
///
/// An empty filter matches every non-deleted transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsFilter {
    /// Inclusive start date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive end date.
    pub date_to: Option<NaiveDate>,
    /// Restrict to one project.
    pub project_id: Option<ProjectId>,
    /// Restrict to transactions touching one money source.
    pub money_source_id: Option<MoneySourceId>,
}

impl AnalyticsFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inclusive date window.
    #[must_use]
    pub const fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    /// Restricts to one project.
    #[must_use]
    pub const fn for_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Restricts to transactions touching one money source.
    #[must_use]
    pub const fn for_source(mut self, source_id: MoneySourceId) -> Self {
        self.money_source_id = Some(source_id);
        self
    }

    /// Returns true if the transaction passes the filter.
    ///
    /// Soft-deleted rows never pass; the check goes through the single
    /// shared predicate.
    #[must_use]
    pub fn matches(&self, txn: &Transaction) -> bool {
        if !txn.is_active() {
            return false;
        }
        if let Some(from) = self.date_from {
            if txn.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if txn.date > to {
                return false;
            }
        }
        if let Some(project_id) = self.project_id {
            if txn.project_id != Some(project_id) {
                return false;
            }
        }
        if let Some(source_id) = self.money_source_id {
            let touches = txn.money_source_id == source_id
                || txn.to_money_source_id == Some(source_id);
            if !touches {
                return false;
            }
        }
        true
    }
}
