//! Shared types and configuration for Numera.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Currency codes for tenant ledgers and reports
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
