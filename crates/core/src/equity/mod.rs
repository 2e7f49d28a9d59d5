//! Partner equity and settlement.
//!
//! Answers "who effectively owns how much of the company's money" among
//! users with partner standing, and what single transfer restores an even
//! split between exactly two partners.

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::EquityService;
pub use types::{
    EquityReport, PartnerEquity, PartnerFigures, SettlementStatus, SettlementSummary,
};
