//! Ledger logic for categorized cash transactions.
//!
//! This module implements the core ledger functionality:
//! - Domain records (companies, users, money sources, categories, transactions)
//! - Transaction state machine (create, bounded update, soft delete)
//! - Business rule validation (amounts, category/type fit, source access)
//! - Derived balance calculation (never stored, never memoized)
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod validation_props;

pub use balance::{balance_of, signed_effect, SourceBalance};
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{
    Category, Company, CreateTransactionInput, MoneySource, PlanTier, Project, ProjectStatus,
    ReceiptStatus, Role, SourceGrant, SystemTag, Transaction, TransactionPatch, TransactionType,
    User,
};
