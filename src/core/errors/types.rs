//! Error enums used across the crate.

use crate::core::config::ConfigError;
use thiserror::Error;

/// Boxed error returned by an external capability provider.
pub type CapabilityError = Box<dyn std::error::Error + Send + Sync>;

/// The external capability a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    /// The learned layout-detection model.
    LayoutModel,
    /// An OCR engine.
    Ocr,
    /// The table-structure-recognition model.
    TableModel,
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapabilityKind::LayoutModel => write!(f, "layout model"),
            CapabilityKind::Ocr => write!(f, "ocr engine"),
            CapabilityKind::TableModel => write!(f, "table model"),
        }
    }
}

/// Errors raised while cropping page images.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageProcessError {
    /// The crop rectangle is empty after rounding to whole pixels.
    #[error("invalid crop coordinates ({x1}, {y1}, {x2}, {y2})")]
    InvalidCropCoordinates { x1: u32, y1: u32, x2: u32, y2: u32 },

    /// The crop rectangle reaches outside the image.
    #[error("crop ({x2}, {y2}) exceeds image bounds {width}x{height}")]
    CropOutOfBounds {
        x2: u32,
        y2: u32,
        width: u32,
        height: u32,
    },
}

/// Errors produced by the reconciliation engine.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// No combination of available capabilities can process the input.
    #[error("no viable strategy: no layout model, no OCR engine and no extractable text")]
    NoViableStrategy,

    /// A bounding box failed the geometry invariant.
    #[error("invalid geometry: {message}")]
    InvalidGeometry {
        /// Description of the offending box.
        message: String,
    },

    /// An external capability provider failed.
    #[error("{capability} failed: {context}")]
    Capability {
        /// Which provider failed.
        capability: CapabilityKind,
        /// Additional context about the call.
        context: String,
        /// The provider's error.
        #[source]
        source: CapabilityError,
    },

    /// Cropping a page image failed.
    #[error("image processing")]
    ImageProcess(#[from] ImageProcessError),

    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error while reading configuration.
    #[error("io")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed.
    #[error("json")]
    Json(#[from] serde_json::Error),
}
