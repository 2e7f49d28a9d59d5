//! Equity and settlement computation.

use sitebook_shared::types::CompanyId;
use sitebook_shared::Cents;

use super::types::{
    EquityReport, PartnerEquity, PartnerFigures, SettlementStatus, SettlementSummary,
};

/// Stateless service computing partner equity reports.
///
/// Policy: company value splits evenly across partners. The policy is fixed,
/// not configurable; with more than two partners no transfer plan is
/// computed (reported as unsupported rather than guessing a generalization).
pub struct EquityService;

impl EquityService {
    /// Builds the equity report for a company.
    ///
    /// `deadband` absorbs rounding noise: settlement is flagged only when
    /// some partner deviates from the target share by more than it.
    #[must_use]
    pub fn build_report(
        company_id: CompanyId,
        figures: Vec<PartnerFigures>,
        deadband: Cents,
    ) -> EquityReport {
        let equities: Vec<Cents> = figures
            .iter()
            .map(|f| f.cash_balance_cents + f.withdrawn_cents)
            .collect();
        let total: Cents = equities.iter().copied().sum();
        let count = figures.len();

        if count == 0 {
            return EquityReport {
                company_id,
                partners: vec![],
                total_company_value_cents: Cents::ZERO,
                target_share_cents: Cents::ZERO,
                status: SettlementStatus::NotApplicable,
                settlement_needed: false,
                settlement: None,
            };
        }

        #[allow(clippy::cast_possible_wrap)]
        let target = Cents::new(total.value() / count as i64);

        // For exactly two partners the deviations are symmetric around the
        // mean, so the half-difference keeps them exactly opposite even when
        // the total is odd.
        let settlements: Vec<Cents> = if count == 2 {
            let half = Cents::new((equities[0].value() - equities[1].value()) / 2);
            vec![-half, half]
        } else {
            equities.iter().map(|&e| target - e).collect()
        };

        let settlement_needed = settlements.iter().any(|s| s.abs() > deadband);

        let partners: Vec<PartnerEquity> = figures
            .into_iter()
            .zip(equities.iter().zip(settlements.iter()))
            .map(|(f, (&equity, &settlement))| PartnerEquity {
                user_id: f.user_id,
                full_name: f.full_name,
                cash_balance_cents: f.cash_balance_cents,
                withdrawn_cents: f.withdrawn_cents,
                equity_cents: equity,
                settlement_cents: settlement,
                share_percent: equity.percent_of(total),
            })
            .collect();

        let (status, settlement) = match count {
            1 => (SettlementStatus::NotApplicable, None),
            2 => {
                if settlement_needed {
                    (
                        SettlementStatus::Needed,
                        Some(Self::two_partner_transfer(&partners)),
                    )
                } else {
                    (SettlementStatus::Balanced, None)
                }
            }
            _ => (SettlementStatus::Unsupported, None),
        };

        EquityReport {
            company_id,
            partners,
            total_company_value_cents: total,
            target_share_cents: target,
            status,
            settlement_needed,
            settlement,
        }
    }

    /// The single transfer between two partners: the one above the target
    /// share pays the one below it, and afterwards both sit at the target.
    fn two_partner_transfer(partners: &[PartnerEquity]) -> SettlementSummary {
        let (giver, receiver) = if partners[0].settlement_cents.is_negative() {
            (&partners[0], &partners[1])
        } else {
            (&partners[1], &partners[0])
        };
        let amount = std::cmp::min(
            giver.settlement_cents.abs(),
            receiver.settlement_cents.abs(),
        );
        SettlementSummary {
            from_user_id: giver.user_id,
            to_user_id: receiver.user_id,
            amount_cents: amount,
        }
    }
}
