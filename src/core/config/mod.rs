//! Configuration management for the reconciliation engine.
//!
//! The configuration is read once per invocation and never mutated while a
//! page is being processed.

pub mod errors;
pub mod reconcile;

pub use errors::{ConfigError, ConfigValidator};
pub use reconcile::{OcrMode, ReconcileConfig};
