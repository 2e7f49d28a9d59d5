//! Employee cash-advance sub-ledger.
//!
//! Models petty cash handed to an employee: issuance auto-provisions a
//! personal advance sub-account and writes a linked pair of transaction legs;
//! returns move money back through a single tagged internal transfer checked
//! against the live balance.

pub mod error;
pub mod service;
pub mod types;

pub use error::AdvanceError;
pub use service::AdvanceService;
pub use types::{
    AdvanceIssuePlan, AdvanceReturnPlan, IssueAdvanceInput, ReturnAdvanceInput, ReturnAmount,
};
