//! Advance sub-ledger domain types.

use chrono::NaiveDate;

use sitebook_shared::types::{CompanyId, MoneySourceId, ProjectId, UserId};
use sitebook_shared::Cents;

use crate::ledger::types::{MoneySource, Transaction};

/// Input for issuing an advance to an employee.
#[derive(Debug, Clone)]
pub struct IssueAdvanceInput {
    /// The company.
    pub company_id: CompanyId,
    /// The source the cash leaves.
    pub money_source_id: MoneySourceId,
    /// The employee receiving the advance.
    pub recipient_user_id: UserId,
    /// Amount in minor currency units (must be positive).
    pub amount_cents: Cents,
    /// Ledger date.
    pub date: NaiveDate,
    /// Optional project the advance is for.
    pub project_id: Option<ProjectId>,
    /// Free-form comment.
    pub comment: Option<String>,
    /// The acting user.
    pub created_by: UserId,
}

/// Resolved write plan for an advance issuance.
///
/// One logical operation spanning two transaction rows and possibly one new
/// money source; the store must apply all of it or none of it.
#[derive(Debug, Clone)]
pub struct AdvanceIssuePlan {
    /// The advance sub-account to create, if the recipient had none.
    pub new_source: Option<MoneySource>,
    /// The advance sub-account the legs land on.
    pub advance_source_id: MoneySourceId,
    /// The EXPENSE leg debiting the issuing source.
    pub outflow: Transaction,
    /// The INCOME leg crediting the advance sub-account.
    pub inflow: Transaction,
    /// True if the advance sub-account was newly provisioned.
    pub is_new: bool,
}

/// How much of an advance to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnAmount {
    /// Return the entire live balance, resolved at execution time.
    All,
    /// Return a specific amount.
    Partial(Cents),
}

/// Input for returning an advance.
#[derive(Debug, Clone)]
pub struct ReturnAdvanceInput {
    /// The company.
    pub company_id: CompanyId,
    /// The advance sub-account being emptied.
    pub advance_source_id: MoneySourceId,
    /// The company source receiving the returned cash.
    pub destination_source_id: MoneySourceId,
    /// Amount to return.
    pub amount: ReturnAmount,
    /// Ledger date.
    pub date: NaiveDate,
    /// Free-form comment.
    pub comment: Option<String>,
    /// The acting user.
    pub created_by: UserId,
}

/// Resolved write plan for an advance return.
#[derive(Debug, Clone)]
pub struct AdvanceReturnPlan {
    /// The INTERNAL transfer moving the cash back.
    pub transaction: Transaction,
    /// The amount actually returned.
    pub returned_cents: Cents,
    /// The advance balance after the return.
    pub remaining_cents: Cents,
}
