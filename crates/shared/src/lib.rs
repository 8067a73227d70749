//! Shared types, errors, and configuration for Divvy.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Money conversion between decimal amounts and minor currency units
//! - The per-group rounding policy value
//! - Application-wide error types
//! - Configuration management and tracing setup

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
