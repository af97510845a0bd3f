//! Strategy resolution.
//!
//! Chooses how a document is processed from what the caller asked for and
//! which capabilities are actually available. Resolution is a pure function:
//! identical inputs always produce the same strategy and the same warnings.

use crate::core::config::ReconcileConfig;
use crate::core::errors::{LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The strategy a caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RequestedStrategy {
    /// Let the resolver decide.
    #[default]
    Auto,
    /// Native text extraction only.
    Fast,
    /// Layout model plus text from native extraction and/or OCR.
    HiRes,
    /// OCR without a layout model.
    OcrOnly,
}

/// The strategy the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Native text extraction only.
    Fast,
    /// Layout model plus text from native extraction and/or OCR.
    HiRes,
    /// OCR without a layout model.
    OcrOnly,
}

impl From<Strategy> for RequestedStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Fast => RequestedStrategy::Fast,
            Strategy::HiRes => RequestedStrategy::HiRes,
            Strategy::OcrOnly => RequestedStrategy::OcrOnly,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Fast => write!(f, "fast"),
            Strategy::HiRes => write!(f, "hi_res"),
            Strategy::OcrOnly => write!(f, "ocr_only"),
        }
    }
}

/// Capability availability, as discovered by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    /// A layout-detection model is available.
    pub layout_model_available: bool,
    /// An OCR engine is available.
    pub ocr_available: bool,
    /// The document has an extractable native text layer.
    pub pdf_text_extractable: bool,
}

impl CapabilitySet {
    /// Returns true if at least one capability can produce output.
    pub fn any(&self) -> bool {
        self.layout_model_available || self.ocr_available || self.pdf_text_extractable
    }
}

/// Page-level hints that push automatic resolution toward `HiRes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageHints {
    /// Table structure should be inferred.
    pub infer_table_structure: bool,
    /// Embedded images should be extracted.
    pub extract_images: bool,
}

impl From<&ReconcileConfig> for PageHints {
    fn from(config: &ReconcileConfig) -> Self {
        Self {
            infer_table_structure: config.infer_table_structure,
            extract_images: config.extract_images,
        }
    }
}

/// An advisory raised when the strategy had to be degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyWarning {
    /// `HiRes` was requested or chosen but no layout model is available.
    LayoutModelUnavailable {
        /// The strategy used instead.
        fallback: Strategy,
    },
    /// `OcrOnly` was requested or chosen but no OCR engine is available.
    OcrUnavailable {
        /// The strategy used instead.
        fallback: Strategy,
    },
}

impl std::fmt::Display for StrategyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyWarning::LayoutModelUnavailable { fallback } => write!(
                f,
                "hi_res requires a layout model, which is unavailable; falling back to {fallback}"
            ),
            StrategyWarning::OcrUnavailable { fallback } => write!(
                f,
                "ocr_only requires an OCR engine, which is unavailable; falling back to {fallback}"
            ),
        }
    }
}

/// The outcome of strategy resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The strategy to run.
    pub strategy: Strategy,
    /// Degradations applied on the way, in order.
    pub warnings: Vec<StrategyWarning>,
}

/// Resolves the processing strategy.
///
/// # Arguments
///
/// * `requested` - The caller's request
/// * `is_image` - Whether the input is a raster image rather than a PDF
/// * `capabilities` - Which providers are available
/// * `hints` - Page hints considered by automatic resolution
///
/// # Returns
///
/// The resolved strategy and any degradation warnings, or
/// [`LayoutError::NoViableStrategy`] when no capability can produce output.
///
/// A `HiRes` fallback ignores `pdf_text_extractable` while an `OcrOnly`
/// fallback consults it. Both rules are applied once, in that order.
pub fn resolve(
    requested: RequestedStrategy,
    is_image: bool,
    capabilities: CapabilitySet,
    hints: PageHints,
) -> LayoutResult<Resolution> {
    if !capabilities.any() {
        return Err(LayoutError::NoViableStrategy);
    }

    let mut strategy = match requested {
        RequestedStrategy::Auto => auto_strategy(is_image, capabilities, hints),
        RequestedStrategy::Fast => Strategy::Fast,
        RequestedStrategy::HiRes => Strategy::HiRes,
        RequestedStrategy::OcrOnly => Strategy::OcrOnly,
    };
    let mut warnings = Vec::new();

    if strategy == Strategy::HiRes && !capabilities.layout_model_available {
        strategy = if capabilities.ocr_available {
            Strategy::OcrOnly
        } else {
            Strategy::Fast
        };
        warnings.push(StrategyWarning::LayoutModelUnavailable { fallback: strategy });
    }

    if strategy == Strategy::OcrOnly && !capabilities.ocr_available {
        strategy = if capabilities.pdf_text_extractable {
            Strategy::Fast
        } else {
            Strategy::HiRes
        };
        warnings.push(StrategyWarning::OcrUnavailable { fallback: strategy });
    }

    for warning in &warnings {
        warn!(?requested, resolved = %strategy, "{warning}");
    }

    Ok(Resolution { strategy, warnings })
}

fn auto_strategy(is_image: bool, capabilities: CapabilitySet, hints: PageHints) -> Strategy {
    if is_image || hints.infer_table_structure || hints.extract_images {
        Strategy::HiRes
    } else if capabilities.pdf_text_extractable {
        Strategy::Fast
    } else {
        Strategy::OcrOnly
    }
}
