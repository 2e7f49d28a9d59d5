//! Equity repository: partner equity and settlement reports.

use std::sync::Arc;

use sitebook_core::equity::service::EquityService;
use sitebook_core::equity::types::{EquityReport, PartnerFigures};
use sitebook_core::ledger::balance::balance_of;
use sitebook_core::ledger::types::{Transaction, TransactionType, User};
use sitebook_shared::types::CompanyId;
use sitebook_shared::{AppError, AppResult, Cents, EngineConfig};

use crate::store::MemoryStore;

/// Repository producing equity reports.
pub struct EquityRepository {
    store: Arc<MemoryStore>,
    deadband: Cents,
}

impl EquityRepository {
    /// Creates a new equity repository.
    ///
    /// `deadband` comes from the engine configuration; deviations at or
    /// below it are treated as rounding noise.
    #[must_use]
    pub fn new(store: Arc<MemoryStore>, deadband: Cents) -> Self {
        Self { store, deadband }
    }

    /// Creates a repository with the configured settlement deadband.
    #[must_use]
    pub fn from_config(store: Arc<MemoryStore>, config: &EngineConfig) -> Self {
        Self::new(store, Cents::new(config.settlement.deadband_cents))
    }

    /// Builds the equity report for a company.
    ///
    /// Partners are users with Owner or Partner standing. A partner's cash
    /// balance spans every money source they own (advance sub-accounts
    /// included); withdrawn value is the sum of non-deleted PAYOUT amounts
    /// debited from their sources.
    ///
    /// # Errors
    ///
    /// `NotFound` if the company does not exist.
    pub fn equity_report(&self, company_id: CompanyId) -> AppResult<EquityReport> {
        if self.store.get_company(company_id).is_none() {
            return Err(AppError::NotFound(format!("company {company_id}")));
        }

        let transactions = self.store.transactions_of(company_id);
        let sources = self.store.sources_of(company_id);

        let mut partners: Vec<User> = self
            .store
            .users_of(company_id)
            .into_iter()
            .filter(|u| u.role.has_partner_standing())
            .collect();
        partners.sort_by(|a, b| a.full_name.cmp(&b.full_name));

        let figures: Vec<PartnerFigures> = partners
            .into_iter()
            .map(|partner| {
                let owned: Vec<_> = sources
                    .iter()
                    .filter(|s| s.owner_user_id == partner.id)
                    .collect();
                let cash: Cents = owned
                    .iter()
                    .map(|s| balance_of(s.id, &transactions))
                    .sum();
                let withdrawn: Cents = owned
                    .iter()
                    .map(|s| Self::payouts_from(s.id, &transactions))
                    .sum();
                PartnerFigures {
                    user_id: partner.id,
                    full_name: partner.full_name,
                    cash_balance_cents: cash,
                    withdrawn_cents: withdrawn,
                }
            })
            .collect();

        Ok(EquityService::build_report(
            company_id,
            figures,
            self.deadband,
        ))
    }

    /// Sum of non-deleted PAYOUT amounts debited from one source.
    fn payouts_from(
        source_id: sitebook_shared::types::MoneySourceId,
        transactions: &[Transaction],
    ) -> Cents {
        transactions
            .iter()
            .filter(|t| {
                t.is_active()
                    && t.txn_type == TransactionType::Payout
                    && t.money_source_id == source_id
            })
            .map(|t| t.amount_cents)
            .sum()
    }
}
