//! The Ledger Store.
//!
//! Durable, queryable record storage with per-record soft-delete and atomic
//! multi-record writes. The engine ships an in-memory reference
//! implementation; every component treats the store as the single source of
//! truth and keeps no independently-mutable duplicate state.

pub mod memory;

pub use memory::{MemoryStore, SystemCategories, WriteBatch};
