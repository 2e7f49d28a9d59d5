//! Property-based tests for the equity settlement laws.

use proptest::prelude::*;

use sitebook_shared::types::CompanyId;
use sitebook_shared::Cents;

use super::service::EquityService;
use super::types::{PartnerFigures, SettlementStatus};
use sitebook_shared::types::UserId;

fn partner(cash: i64, withdrawn: i64) -> PartnerFigures {
    PartnerFigures {
        user_id: UserId::new(),
        full_name: "Partner".to_string(),
        cash_balance_cents: Cents::new(cash),
        withdrawn_cents: Cents::new(withdrawn),
    }
}

fn amount() -> impl Strategy<Value = i64> {
    0i64..10_000_000
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// *For any* two partners, the settlement amounts are exactly opposite.
    #[test]
    fn prop_two_partner_settlements_antisymmetric(
        cash_a in amount(),
        withdrawn_a in amount(),
        cash_b in amount(),
        withdrawn_b in amount(),
    ) {
        let report = EquityService::build_report(
            CompanyId::new(),
            vec![partner(cash_a, withdrawn_a), partner(cash_b, withdrawn_b)],
            Cents::new(100),
        );
        prop_assert_eq!(
            report.partners[0].settlement_cents,
            -report.partners[1].settlement_cents
        );
    }

    /// *For any* two partners with an even total, transferring the proposed
    /// amount from the giver to the receiver puts both exactly at the target
    /// share (round-trip settlement law).
    #[test]
    fn prop_two_partner_round_trip(
        cash_a in amount(),
        withdrawn_a in amount(),
        half_gap in 101i64..1_000_000,
    ) {
        // Construct partner B so the total is even and the gap exceeds the
        // deadband, guaranteeing a proposed transfer.
        let equity_a = cash_a + withdrawn_a;
        let equity_b = equity_a + 2 * half_gap;
        let figures = vec![partner(cash_a, withdrawn_a), partner(equity_b, 0)];

        let report = EquityService::build_report(CompanyId::new(), figures, Cents::new(100));
        prop_assert_eq!(report.status, SettlementStatus::Needed);
        let transfer = report.settlement.expect("transfer proposed");

        // The giver sits above the target, the receiver below.
        let giver = report
            .partners
            .iter()
            .find(|p| p.user_id == transfer.from_user_id)
            .unwrap();
        let receiver = report
            .partners
            .iter()
            .find(|p| p.user_id == transfer.to_user_id)
            .unwrap();
        prop_assert!(giver.equity_cents > report.target_share_cents);
        prop_assert!(receiver.equity_cents < report.target_share_cents);

        prop_assert_eq!(
            giver.equity_cents - transfer.amount_cents,
            report.target_share_cents
        );
        prop_assert_eq!(
            receiver.equity_cents + transfer.amount_cents,
            report.target_share_cents
        );
    }

    /// *For any* two partners within the deadband, no settlement is flagged.
    #[test]
    fn prop_deadband_suppresses_settlement(
        cash_a in amount(),
        jitter in 0i64..=100,
    ) {
        let figures = vec![partner(cash_a, 0), partner(cash_a + 2 * jitter, 0)];
        let report = EquityService::build_report(CompanyId::new(), figures, Cents::new(100));
        prop_assert!(!report.settlement_needed);
        prop_assert_eq!(report.status, SettlementStatus::Balanced);
        prop_assert!(report.settlement.is_none());
    }

    /// *For any* partner set, total company value equals the sum of the
    /// reported equities.
    #[test]
    fn prop_total_is_sum_of_equities(
        cashes in prop::collection::vec(amount(), 0..6),
    ) {
        let figures: Vec<PartnerFigures> =
            cashes.iter().map(|&c| partner(c, 0)).collect();
        let report = EquityService::build_report(CompanyId::new(), figures, Cents::new(100));

        let sum: Cents = report.partners.iter().map(|p| p.equity_cents).sum();
        prop_assert_eq!(report.total_company_value_cents, sum);
    }

    /// *For any* partner count other than two, no transfer is proposed.
    #[test]
    fn prop_transfer_only_for_two_partners(
        cashes in prop::collection::vec(amount(), 0..6),
    ) {
        prop_assume!(cashes.len() != 2);
        let figures: Vec<PartnerFigures> =
            cashes.iter().map(|&c| partner(c, 0)).collect();
        let report = EquityService::build_report(CompanyId::new(), figures, Cents::new(100));
        prop_assert!(report.settlement.is_none());
        prop_assert_ne!(report.status, SettlementStatus::Needed);
    }
}
