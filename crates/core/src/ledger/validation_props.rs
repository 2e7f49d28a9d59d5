//! Property-based tests for transaction validation rules.

use proptest::prelude::*;

use sitebook_shared::types::{CategoryId, CompanyId, MoneySourceId, UserId};
use sitebook_shared::Cents;

use super::error::LedgerError;
use super::types::{Category, MoneySource, Role, SourceGrant, TransactionType, User};
use super::validation;

fn txn_type_strategy() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        Just(TransactionType::Income),
        Just(TransactionType::Expense),
        Just(TransactionType::Payout),
        Just(TransactionType::Internal),
    ]
}

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Owner),
        Just(Role::Partner),
        Just(Role::Accountant),
        Just(Role::Foreman),
        Just(Role::Viewer),
    ]
}

fn allowed_types_strategy() -> impl Strategy<Value = Vec<TransactionType>> {
    prop::collection::vec(txn_type_strategy(), 1..=4)
}

fn make_user(company_id: CompanyId, role: Role) -> User {
    User {
        id: UserId::new(),
        company_id,
        full_name: "Prop User".to_string(),
        role,
        is_active: true,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* non-positive amount, validation rejects with the specific
    /// amount error; *for any* positive amount it passes.
    #[test]
    fn prop_amount_sign_decides(amount in -1_000_000i64..1_000_000i64) {
        let result = validation::validate_amount(Cents::new(amount));
        if amount > 0 {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(matches!(result, Err(LedgerError::NonPositiveAmount)));
        }
    }

    /// *For any* category and type, validation passes exactly when the
    /// category's allowed set contains the type.
    #[test]
    fn prop_category_allows_decides(
        allowed in allowed_types_strategy(),
        txn_type in txn_type_strategy(),
    ) {
        let company = CompanyId::new();
        let category = Category {
            id: CategoryId::new(),
            company_id: Some(company),
            name: "Generated".to_string(),
            allowed_types: allowed.clone(),
            group_id: None,
            system_tag: None,
        };

        let result = validation::validate_category(&category, company, txn_type);
        if allowed.contains(&txn_type) {
            prop_assert!(result.is_ok());
        } else {
            let is_mismatch =
                matches!(result, Err(LedgerError::CategoryTypeMismatch { .. }));
            prop_assert!(is_mismatch);
        }
    }

    /// *For any* role and type, managing roles always pass the access check
    /// on a company source; Foreman/Viewer pass only via ownership or grant.
    #[test]
    fn prop_source_access_by_role(
        role in role_strategy(),
        txn_type in txn_type_strategy(),
        has_grant in prop::bool::ANY,
        grant_can_spend in prop::bool::ANY,
    ) {
        let company = CompanyId::new();
        let actor = make_user(company, role);
        let mut source = MoneySource {
            id: MoneySourceId::new(),
            company_id: company,
            owner_user_id: UserId::new(),
            name: "Crew cash".to_string(),
            is_advance: false,
            is_active: true,
            grants: vec![],
        };
        if has_grant {
            source.grants.push(SourceGrant {
                user_id: actor.id,
                can_view: true,
                can_spend: grant_can_spend,
            });
        }

        let result = validation::validate_source_access(&source, &actor, company, txn_type);

        let expected_ok = if role.can_manage_any_source() {
            true
        } else if txn_type.debits_primary() {
            has_grant && grant_can_spend
        } else {
            has_grant
        };
        prop_assert_eq!(result.is_ok(), expected_ok);
    }

    /// *For any* role, a source of another company is reported as not found,
    /// never as a permission failure.
    #[test]
    fn prop_foreign_source_never_leaks(
        role in role_strategy(),
        txn_type in txn_type_strategy(),
    ) {
        let company = CompanyId::new();
        let actor = make_user(company, role);
        let source = MoneySource {
            id: MoneySourceId::new(),
            company_id: CompanyId::new(),
            owner_user_id: UserId::new(),
            name: "Foreign".to_string(),
            is_advance: false,
            is_active: true,
            grants: vec![],
        };

        let result = validation::validate_source_access(&source, &actor, company, txn_type);
        prop_assert!(matches!(result, Err(LedgerError::SourceNotFound(_))));
    }
}
