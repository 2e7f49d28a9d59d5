//! Shared types, errors, and configuration for Sitebook.
//!
//! This crate provides common types used across all other crates:
//! - Integer-cents money type (no floating point anywhere)
//! - Typed IDs for type-safe entity references
//! - Application-wide error taxonomy
//! - Engine configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{AppError, AppResult};
pub use types::Cents;
