//! Equity report data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sitebook_shared::types::{CompanyId, UserId};
use sitebook_shared::Cents;

/// Raw per-partner figures collected from the ledger.
#[derive(Debug, Clone)]
pub struct PartnerFigures {
    /// The partner.
    pub user_id: UserId,
    /// Display name.
    pub full_name: String,
    /// Sum of balances over money sources the partner owns.
    pub cash_balance_cents: Cents,
    /// Sum of non-deleted PAYOUT amounts debited from sources they own.
    pub withdrawn_cents: Cents,
}

/// One partner's position in the equity report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerEquity {
    /// The partner.
    pub user_id: UserId,
    /// Display name.
    pub full_name: String,
    /// Cash they currently control.
    pub cash_balance_cents: Cents,
    /// Value they already took out.
    pub withdrawn_cents: Cents,
    /// cash + withdrawn.
    pub equity_cents: Cents,
    /// target share − equity; positive means below the target.
    pub settlement_cents: Cents,
    /// Share of total company value.
    pub share_percent: Decimal,
}

/// Whether and how a settlement applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    /// Partner equities are within the deadband of the target share.
    Balanced,
    /// A settlement transfer is proposed.
    Needed,
    /// Fewer than two partners; settlement has no meaning.
    NotApplicable,
    /// More than two partners; a transfer plan is not computed.
    Unsupported,
}

/// The single transfer that restores an even split between two partners.
///
/// The proposal is informational; actually moving the money is a manual
/// follow-up action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementSummary {
    /// The partner paying (equity above the target share).
    pub from_user_id: UserId,
    /// The partner receiving (equity below the target share).
    pub to_user_id: UserId,
    /// Transfer amount.
    pub amount_cents: Cents,
}

/// Partner equity report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityReport {
    /// The company.
    pub company_id: CompanyId,
    /// Per-partner positions.
    pub partners: Vec<PartnerEquity>,
    /// Sum of all partners' equity.
    pub total_company_value_cents: Cents,
    /// total / partner count (even split policy).
    pub target_share_cents: Cents,
    /// Settlement applicability.
    pub status: SettlementStatus,
    /// True iff some partner deviates from the target by more than the
    /// deadband.
    pub settlement_needed: bool,
    /// The proposed transfer (two partners, deviation beyond deadband).
    pub settlement: Option<SettlementSummary>,
}
