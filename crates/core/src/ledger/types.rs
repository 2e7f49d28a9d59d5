//! Ledger domain types.
//!
//! These are the records the engine reads from and writes to the record
//! store, plus the input types for creating and editing transactions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sitebook_shared::types::{
    CategoryGroupId, CategoryId, CompanyId, MoneySourceId, ProjectId, TransactionId, UserId,
};
use sitebook_shared::Cents;

/// Transaction type classification.
///
/// Exactly four types; advance movements are expressed as tagged
/// EXPENSE/INCOME legs and advance returns as tagged INTERNAL transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money coming into a source (client payment, owner top-up).
    Income,
    /// Money leaving a source for project or company costs.
    Expense,
    /// Money leaving a source to an owner or partner personally.
    Payout,
    /// Money moving between two company sources.
    Internal,
}

impl TransactionType {
    /// Returns true if this type debits the primary money source.
    #[must_use]
    pub fn debits_primary(self) -> bool {
        !matches!(self, Self::Income)
    }
}

/// Receipt attachment status for a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    /// No receipt recorded.
    #[default]
    Missing,
    /// Receipt promised but not yet attached.
    Pending,
    /// Receipt attached by the upload collaborator.
    Attached,
}

/// User role governing which transaction types and money sources it may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Company owner.
    Owner,
    /// Profit-sharing partner.
    Partner,
    /// Bookkeeper with full transaction access.
    Accountant,
    /// Site foreman working from granted sources and advances.
    Foreman,
    /// Read-mostly role; needs explicit grants to act.
    Viewer,
}

impl Role {
    /// Returns true if the role may act on any company money source.
    #[must_use]
    pub fn can_manage_any_source(self) -> bool {
        matches!(self, Self::Owner | Self::Partner | Self::Accountant)
    }

    /// Returns true if the role participates in partner equity.
    #[must_use]
    pub fn has_partner_standing(self) -> bool {
        matches!(self, Self::Owner | Self::Partner)
    }
}

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Work in progress.
    Active,
    /// Work finished, books may still be settling.
    Completed,
    /// Hidden from day-to-day lists.
    Archived,
}

/// Plan tier bounding entity counts.
///
/// Enforced by the external plan-limit collaborator; the engine only carries
/// the tier so PLAN_LIMIT rejections can be surfaced unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    /// Entry tier.
    Free,
    /// Small-crew tier.
    Team,
    /// Unbounded tier.
    Business,
}

/// Marks a system category as part of the advance machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemTag {
    /// Category tagging both legs of an advance issuance.
    AdvanceIssue,
    /// Category tagging the INTERNAL transfer of an advance return.
    AdvanceReturn,
}

/// A company owning all other entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier.
    pub id: CompanyId,
    /// Display name.
    pub name: String,
    /// Local calendar for month bucketing and date defaults.
    pub timezone: chrono_tz::Tz,
    /// Plan tier (surfaced to the plan-limit collaborator, not enforced here).
    pub plan_tier: PlanTier,
}

impl Company {
    /// Converts an instant into this company's local calendar date.
    #[must_use]
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.timezone).date_naive()
    }
}

/// A user belonging to one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Display name.
    pub full_name: String,
    /// Role governing transaction and source access.
    pub role: Role,
    /// Deactivated users cannot act.
    pub is_active: bool,
}

/// Optional grouping for transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier.
    pub id: ProjectId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Display name.
    pub name: String,
    /// Lifecycle status (closing a project is external to the ledger).
    pub status: ProjectStatus,
    /// Optional budget.
    pub budget_cents: Option<Cents>,
}

/// Per-user access grant on a money source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceGrant {
    /// The user receiving access.
    pub user_id: UserId,
    /// May see the source and its balance.
    pub can_view: bool,
    /// May record transactions debiting the source.
    pub can_spend: bool,
}

/// A named account owned by exactly one user.
///
/// Balance is never stored; it is always derived from transaction history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneySource {
    /// Unique identifier.
    pub id: MoneySourceId,
    /// Owning company.
    pub company_id: CompanyId,
    /// The single owning user.
    pub owner_user_id: UserId,
    /// Display name.
    pub name: String,
    /// Personal advance sub-account (auto-created, never created directly).
    pub is_advance: bool,
    /// Inactive sources reject new transactions.
    pub is_active: bool,
    /// Access grants for users other than the owner.
    pub grants: Vec<SourceGrant>,
}

impl MoneySource {
    /// Returns true if `user` may record transactions debiting this source.
    #[must_use]
    pub fn user_can_spend(&self, user: &User) -> bool {
        if user.company_id != self.company_id {
            return false;
        }
        if user.role.can_manage_any_source() || user.id == self.owner_user_id {
            return true;
        }
        self.grants
            .iter()
            .any(|g| g.user_id == user.id && g.can_spend)
    }

    /// Returns true if `user` may see this source and credit income to it.
    #[must_use]
    pub fn user_can_view(&self, user: &User) -> bool {
        if user.company_id != self.company_id {
            return false;
        }
        if user.role.can_manage_any_source() || user.id == self.owner_user_id {
            return true;
        }
        self.grants
            .iter()
            .any(|g| g.user_id == user.id && (g.can_view || g.can_spend))
    }
}

/// A transaction category.
///
/// System categories (`company_id` = None) are shared across companies;
/// company categories are private.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,
    /// Owning company, or None for a shared system category.
    pub company_id: Option<CompanyId>,
    /// Display name.
    pub name: String,
    /// Transaction types this category may be used with.
    pub allowed_types: Vec<TransactionType>,
    /// Optional reporting group.
    pub group_id: Option<CategoryGroupId>,
    /// Advance-machinery tag for system categories.
    pub system_tag: Option<SystemTag>,
}

impl Category {
    /// Returns true if this category may be used with `txn_type`.
    #[must_use]
    pub fn allows(&self, txn_type: TransactionType) -> bool {
        self.allowed_types.contains(&txn_type)
    }

    /// Returns true if this category is visible to `company`.
    #[must_use]
    pub fn visible_to(&self, company: CompanyId) -> bool {
        self.company_id.is_none_or(|owner| owner == company)
    }

    /// Returns true if this category tags advance machinery movements.
    ///
    /// Tagged movements are money relocation, not earnings or costs, and are
    /// excluded from income/expense analytics.
    #[must_use]
    pub fn is_advance_movement(&self) -> bool {
        self.system_tag.is_some()
    }
}

/// The atomic ledger entry.
///
/// Immutable history once created except for the bounded editable field set;
/// soft-deleted rows are excluded from every aggregate but never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Transaction type.
    pub txn_type: TransactionType,
    /// Amount in minor currency units, always positive.
    pub amount_cents: Cents,
    /// Ledger date (company-local calendar date as entered).
    pub date: NaiveDate,
    /// The account debited or credited depending on type.
    pub money_source_id: MoneySourceId,
    /// Set only for INTERNAL transfers and the outgoing advance-issuance leg.
    pub to_money_source_id: Option<MoneySourceId>,
    /// Category.
    pub category_id: CategoryId,
    /// Optional project.
    pub project_id: Option<ProjectId>,
    /// User who created the transaction.
    pub created_by: UserId,
    /// Free-form comment.
    pub comment: Option<String>,
    /// Receipt status.
    pub receipt: ReceiptStatus,
    /// Links the two legs of an advance issuance.
    pub pair_id: Option<Uuid>,
    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
    /// When the transaction was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft delete marker; None means active.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// The single shared soft-delete predicate.
    ///
    /// Every balance and aggregate path filters through this, never through
    /// its own `deleted_at` check.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Returns true if this row is one leg of an advance-issuance pair.
    #[must_use]
    pub fn is_paired(&self) -> bool {
        self.pair_id.is_some()
    }
}

/// Input for creating a new transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// The company the transaction belongs to.
    pub company_id: CompanyId,
    /// Transaction type.
    pub txn_type: TransactionType,
    /// Amount in minor currency units (must be positive).
    pub amount_cents: Cents,
    /// Ledger date.
    pub date: NaiveDate,
    /// The primary money source.
    pub money_source_id: MoneySourceId,
    /// Required for INTERNAL, absent otherwise.
    pub to_money_source_id: Option<MoneySourceId>,
    /// Category.
    pub category_id: CategoryId,
    /// Optional project.
    pub project_id: Option<ProjectId>,
    /// The acting user.
    pub created_by: UserId,
    /// Free-form comment.
    pub comment: Option<String>,
}

/// Bounded set of editable transaction fields.
///
/// `None` leaves a field unchanged; the nested options distinguish "clear
/// the comment" from "leave it alone".
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    /// New amount.
    pub amount_cents: Option<Cents>,
    /// New category.
    pub category_id: Option<CategoryId>,
    /// New ledger date.
    pub date: Option<NaiveDate>,
    /// New primary money source.
    pub money_source_id: Option<MoneySourceId>,
    /// New comment (Some(None) clears it).
    pub comment: Option<Option<String>>,
    /// New receipt status.
    pub receipt: Option<ReceiptStatus>,
    /// New project (Some(None) detaches it).
    pub project_id: Option<Option<ProjectId>>,
}

impl TransactionPatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amount_cents.is_none()
            && self.category_id.is_none()
            && self.date.is_none()
            && self.money_source_id.is_none()
            && self.comment.is_none()
            && self.receipt.is_none()
            && self.project_id.is_none()
    }

    /// Returns true if the patch touches a field that must stay synchronized
    /// across an advance-issuance pair.
    #[must_use]
    pub fn touches_paired_fields(&self) -> bool {
        self.amount_cents.is_some()
            || self.category_id.is_some()
            || self.date.is_some()
            || self.money_source_id.is_some()
    }
}
