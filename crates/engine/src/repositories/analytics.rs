//! Analytics repository: read-side summaries and reports.

use std::sync::Arc;

use sitebook_core::analytics::filter::AnalyticsFilter;
use sitebook_core::analytics::service::AnalyticsService;
use sitebook_core::analytics::types::{AnalyticsSummary, CashFlowReport};
use sitebook_shared::types::{CompanyId, ProjectId};
use sitebook_shared::{AppError, AppResult, Cents};

use crate::store::MemoryStore;

/// Repository producing analytics reports.
///
/// Read-only: every method snapshots the transaction set and delegates the
/// aggregation to the core service; nothing is cached between calls.
pub struct AnalyticsRepository {
    store: Arc<MemoryStore>,
}

impl AnalyticsRepository {
    /// Creates a new analytics repository.
    #[must_use]
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Builds the period summary (totals, breakdowns, daily history).
    ///
    /// # Errors
    ///
    /// `NotFound` if the company does not exist.
    pub fn summary(
        &self,
        company_id: CompanyId,
        filter: &AnalyticsFilter,
    ) -> AppResult<AnalyticsSummary> {
        if self.store.get_company(company_id).is_none() {
            return Err(AppError::NotFound(format!("company {company_id}")));
        }
        let transactions = self.store.transactions_of(company_id);
        Ok(AnalyticsService::summary(
            &transactions,
            filter,
            |id| self.store.get_category(id),
            |id| self.store.get_project(id).map(|p| p.name),
        ))
    }

    /// Builds the category × month cash-flow matrix.
    ///
    /// # Errors
    ///
    /// `NotFound` if the company does not exist.
    pub fn cash_flow(
        &self,
        company_id: CompanyId,
        filter: &AnalyticsFilter,
    ) -> AppResult<CashFlowReport> {
        if self.store.get_company(company_id).is_none() {
            return Err(AppError::NotFound(format!("company {company_id}")));
        }
        let transactions = self.store.transactions_of(company_id);
        Ok(AnalyticsService::cash_flow(&transactions, filter, |id| {
            self.store.get_category(id)
        }))
    }

    /// Aggregate balance for a project, for the project-lifecycle
    /// collaborator.
    ///
    /// # Errors
    ///
    /// `NotFound` if the project is missing or belongs to another company.
    pub fn project_balance(
        &self,
        company_id: CompanyId,
        project_id: ProjectId,
    ) -> AppResult<Cents> {
        let project = self
            .store
            .get_project(project_id)
            .filter(|p| p.company_id == company_id)
            .ok_or_else(|| AppError::NotFound(format!("project {project_id}")))?;
        let transactions = self.store.transactions_of(company_id);
        Ok(AnalyticsService::project_balance(
            &transactions,
            project.id,
            |id| self.store.get_category(id),
        ))
    }
}
