//! The core module of the reconciliation engine.
//!
//! This module contains the pieces every stage depends on:
//! - Error handling
//! - Configuration management
//! - Traits defining the capability provider interfaces

pub mod config;
pub mod errors;
pub mod traits;

pub use config::{ConfigError, ConfigValidator, OcrMode, ReconcileConfig};
pub use errors::{CapabilityError, CapabilityKind, ImageProcessError, LayoutError, LayoutResult};
pub use traits::{
    Capabilities, HasBBox, HasProvenance, HasText, LayoutDetector, OcrEngine,
    TableStructureModel, WordGrouper,
};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
