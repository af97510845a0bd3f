//! Helper constructors for [`LayoutError`].

use super::types::{CapabilityError, CapabilityKind, LayoutError};

impl LayoutError {
    /// Creates an error for an invalid bounding box.
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }

    /// Wraps a failure reported by a capability provider.
    pub fn capability(
        capability: CapabilityKind,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Capability {
            capability,
            context: String::new(),
            source: Box::new(error),
        }
    }

    /// Wraps an already boxed provider failure, adding context about the call.
    pub fn capability_boxed(
        capability: CapabilityKind,
        context: impl Into<String>,
        source: CapabilityError,
    ) -> Self {
        Self::Capability {
            capability,
            context: context.into(),
            source,
        }
    }

    /// Returns true for errors that must be surfaced to the caller as hard failures.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LayoutError::NoViableStrategy)
    }
}
