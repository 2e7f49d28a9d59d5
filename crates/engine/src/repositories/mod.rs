//! Repositories executing the engine operations.
//!
//! Each repository validates through `sitebook-core`, commits atomically to
//! the store, and publishes domain events after the commit. Write paths hold
//! the locks of every money source they touch; read paths work on snapshots
//! and never block writers longer than the snapshot copy.

pub mod advance;
pub mod analytics;
pub mod equity;
pub mod transaction;

pub use advance::{AdvanceIssueOutcome, AdvanceRepository, AdvanceReturnOutcome};
pub use analytics::AnalyticsRepository;
pub use equity::EquityRepository;
pub use transaction::TransactionRepository;
