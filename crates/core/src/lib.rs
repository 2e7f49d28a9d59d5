//! Core business logic for Sitebook.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here; facts that live in the record store (categories, money sources)
//! reach the services through injected lookup closures.
//!
//! # Modules
//!
//! - `ledger` - Transaction validation, state machine, and balance calculation
//! - `advance` - Employee cash-advance sub-ledger planning
//! - `equity` - Partner equity and settlement computation
//! - `analytics` - Read-side period summaries and cash-flow matrices
//! - `events` - Domain events and the publisher seam

pub mod advance;
pub mod analytics;
pub mod equity;
pub mod events;
pub mod ledger;
