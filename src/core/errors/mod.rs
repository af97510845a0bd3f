//! Error types for the reconciliation engine.
//!
//! Only [`LayoutError::NoViableStrategy`] is meant to reach the caller as a
//! hard failure. Every other condition met while reconciling a page degrades
//! output quality instead of halting: bad geometry falls back to a weaker
//! ordering, an empty supplementary list leaves the authoritative list as is.
//! Capability failures abort the page they occurred on and nothing else.
//!
//! # Usage
//!
//! ```rust
//! use oar_reconcile::core::errors::{CapabilityKind, LayoutError};
//!
//! let error = LayoutError::capability(
//!     CapabilityKind::Ocr,
//!     std::io::Error::new(std::io::ErrorKind::TimedOut, "engine did not answer"),
//! );
//! assert!(!error.is_fatal());
//! assert!(LayoutError::NoViableStrategy.is_fatal());
//! ```

pub mod constructors;
pub mod types;

pub use types::{CapabilityError, CapabilityKind, ImageProcessError, LayoutError};

/// Convenient result alias for reconciliation operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
