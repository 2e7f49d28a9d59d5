//! Advance planning service.
//!
//! Pure planning: the store layer resolves the records (recipient, sources,
//! live balance, system categories), the service validates and produces the
//! exact rows to commit atomically.

use chrono::Utc;
use uuid::Uuid;

use sitebook_shared::types::{MoneySourceId, TransactionId};
use sitebook_shared::Cents;

use crate::ledger::error::LedgerError;
use crate::ledger::types::{
    Category, MoneySource, ReceiptStatus, SystemTag, Transaction, TransactionType, User,
};
use crate::ledger::validation;

use super::error::AdvanceError;
use super::types::{
    AdvanceIssuePlan, AdvanceReturnPlan, IssueAdvanceInput, ReturnAdvanceInput, ReturnAmount,
};

/// Stateless service for advance issuance and return planning.
pub struct AdvanceService;

impl AdvanceService {
    /// Plans an advance issuance.
    ///
    /// If the recipient has no active advance sub-account, the plan includes
    /// one to create; the two transaction legs and the optional new source
    /// form one logical operation the store must apply atomically.
    ///
    /// # Errors
    ///
    /// Returns an `AdvanceError` naming the failed check; nothing is written
    /// on failure.
    pub fn plan_issue(
        input: &IssueAdvanceInput,
        actor: &User,
        recipient: &User,
        issuing_source: &MoneySource,
        existing_advance_source: Option<&MoneySource>,
        issue_category: &Category,
    ) -> Result<AdvanceIssuePlan, AdvanceError> {
        validation::validate_actor(actor)?;
        if actor.company_id != input.company_id {
            return Err(LedgerError::UserNotFound(actor.id).into());
        }
        validation::validate_amount(input.amount_cents)?;

        if recipient.company_id != input.company_id {
            return Err(AdvanceError::RecipientNotFound(recipient.id));
        }
        if !recipient.is_active {
            return Err(AdvanceError::RecipientInactive(recipient.id));
        }

        validation::validate_source_access(
            issuing_source,
            actor,
            input.company_id,
            TransactionType::Expense,
        )?;

        if issue_category.system_tag != Some(SystemTag::AdvanceIssue) {
            return Err(AdvanceError::NotAnAdvanceCategory(issue_category.id));
        }

        let (advance_source_id, new_source) = match existing_advance_source {
            Some(source) => {
                if !source.is_advance {
                    return Err(AdvanceError::NotAnAdvanceSource(source.id));
                }
                if source.company_id != input.company_id {
                    return Err(LedgerError::SourceNotFound(source.id).into());
                }
                (source.id, None)
            }
            None => {
                let source = MoneySource {
                    id: MoneySourceId::new(),
                    company_id: input.company_id,
                    owner_user_id: recipient.id,
                    name: format!("Advance: {}", recipient.full_name),
                    is_advance: true,
                    is_active: true,
                    grants: vec![],
                };
                (source.id, Some(source))
            }
        };

        let pair_id = Uuid::new_v4();
        let now = Utc::now();
        let base = Transaction {
            id: TransactionId::new(),
            company_id: input.company_id,
            txn_type: TransactionType::Expense,
            amount_cents: input.amount_cents,
            date: input.date,
            money_source_id: input.money_source_id,
            to_money_source_id: Some(advance_source_id),
            category_id: issue_category.id,
            project_id: input.project_id,
            created_by: input.created_by,
            comment: input.comment.clone(),
            receipt: ReceiptStatus::Missing,
            pair_id: Some(pair_id),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let outflow = base.clone();
        let inflow = Transaction {
            id: TransactionId::new(),
            txn_type: TransactionType::Income,
            money_source_id: advance_source_id,
            to_money_source_id: None,
            ..base
        };

        Ok(AdvanceIssuePlan {
            is_new: new_source.is_some(),
            new_source,
            advance_source_id,
            outflow,
            inflow,
        })
    }

    /// Plans an advance return.
    ///
    /// The requested amount (or "return all") is resolved against the live
    /// balance the caller computed under the advance source's write lock; a
    /// client-supplied snapshot would race concurrent returns.
    ///
    /// # Errors
    ///
    /// `InsufficientFunds` when the request exceeds the live balance,
    /// `NothingToReturn` for return-all on an empty advance, plus the usual
    /// validation errors.
    pub fn plan_return(
        input: &ReturnAdvanceInput,
        actor: &User,
        advance_source: &MoneySource,
        destination: &MoneySource,
        live_balance: Cents,
        return_category: &Category,
    ) -> Result<AdvanceReturnPlan, AdvanceError> {
        validation::validate_actor(actor)?;
        if actor.company_id != input.company_id {
            return Err(LedgerError::UserNotFound(actor.id).into());
        }

        if !advance_source.is_advance {
            return Err(AdvanceError::NotAnAdvanceSource(advance_source.id));
        }
        // Moving money out of the advance is a debit-side operation: the
        // recipient (owner) and managing roles qualify.
        validation::validate_source_access(
            advance_source,
            actor,
            input.company_id,
            TransactionType::Internal,
        )?;

        if destination.id == advance_source.id {
            return Err(LedgerError::TransferTargetSameSource.into());
        }
        validation::validate_transfer_destination(destination, input.company_id)?;
        if destination.is_advance {
            return Err(AdvanceError::InvalidReturnDestination(destination.id));
        }

        if return_category.system_tag != Some(SystemTag::AdvanceReturn) {
            return Err(AdvanceError::NotAnAdvanceCategory(return_category.id));
        }

        let returned = match input.amount {
            ReturnAmount::All => {
                if !live_balance.is_positive() {
                    return Err(AdvanceError::NothingToReturn);
                }
                live_balance
            }
            ReturnAmount::Partial(amount) => {
                validation::validate_amount(amount)?;
                if amount > live_balance {
                    return Err(AdvanceError::InsufficientFunds {
                        available: live_balance,
                        requested: amount,
                    });
                }
                amount
            }
        };

        let now = Utc::now();
        let transaction = Transaction {
            id: TransactionId::new(),
            company_id: input.company_id,
            txn_type: TransactionType::Internal,
            amount_cents: returned,
            date: input.date,
            money_source_id: advance_source.id,
            to_money_source_id: Some(destination.id),
            category_id: return_category.id,
            project_id: None,
            created_by: input.created_by,
            comment: input.comment.clone(),
            receipt: ReceiptStatus::Missing,
            pair_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        Ok(AdvanceReturnPlan {
            transaction,
            returned_cents: returned,
            remaining_cents: live_balance - returned,
        })
    }
}
