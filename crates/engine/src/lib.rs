//! Ledger store and repositories for Sitebook.
//!
//! This crate provides:
//! - The in-memory transactional record store (the Ledger Store reference
//!   implementation) with per-money-source write serialization
//! - Repositories executing the engine operations end-to-end: validate via
//!   `sitebook-core`, commit atomically, publish domain events

pub mod repositories;
pub mod store;

pub use repositories::{
    AdvanceRepository, AnalyticsRepository, EquityRepository, TransactionRepository,
};
pub use store::MemoryStore;
