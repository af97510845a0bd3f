//! External capability provider interfaces.
//!
//! The engine never owns a model. Providers are constructed once by the caller,
//! bundled into [`Capabilities`] and lent to the engine for the duration of a
//! call. Every call is synchronous from the engine's point of view; retries,
//! timeouts and batching belong to the provider.

use crate::core::errors::CapabilityError;
use crate::domain::{LayoutElement, Provenance, TextRegion};
use crate::processors::TableToken;
use image::RgbImage;

/// A learned layout-detection model.
pub trait LayoutDetector: Send + Sync {
    /// Detects layout elements on a rendered page image, in page-pixel space.
    fn detect(&self, page_image: &RgbImage) -> Result<Vec<LayoutElement>, CapabilityError>;
}

/// An OCR engine.
pub trait OcrEngine: Send + Sync {
    /// Returns word-level (or line-level) regions found in the image.
    fn layout(&self, image: &RgbImage) -> Result<Vec<TextRegion>, CapabilityError>;

    /// Returns the image text with paragraphs separated by a blank line.
    fn text(&self, image: &RgbImage) -> Result<String, CapabilityError>;

    /// Whether [`OcrEngine::text`] segments paragraphs consistently with
    /// [`OcrEngine::layout`]'s tokenisation. When false, word regions are
    /// grouped geometrically instead.
    fn supports_paragraph_text(&self) -> bool {
        true
    }

    /// Provenance tag stamped on regions produced by this engine.
    fn provenance(&self) -> Provenance {
        Provenance::OcrPrimary
    }
}

/// A table-structure-recognition model.
pub trait TableStructureModel: Send + Sync {
    /// Predicts the table's HTML from its crop and the OCR tokens inside it.
    fn predict(&self, crop: &RgbImage, tokens: &[TableToken]) -> Result<String, CapabilityError>;
}

/// Geometric grouping of word regions into block regions.
pub trait WordGrouper: Send + Sync {
    /// Clusters word regions by proximity into larger regions.
    fn group(&self, words: &[TextRegion]) -> Vec<TextRegion>;
}

/// The set of providers available for one run.
///
/// ```rust
/// use oar_reconcile::core::traits::Capabilities;
///
/// let caps = Capabilities::none();
/// assert!(!caps.capability_set(true).layout_model_available);
/// assert!(caps.capability_set(true).pdf_text_extractable);
/// ```
#[derive(Clone, Copy, Default)]
pub struct Capabilities<'a> {
    /// Layout-detection model.
    pub layout_model: Option<&'a dyn LayoutDetector>,
    /// OCR engine.
    pub ocr: Option<&'a dyn OcrEngine>,
    /// Table-structure model.
    pub table_model: Option<&'a dyn TableStructureModel>,
    /// Grouper used when the OCR engine provides no paragraph text.
    pub word_grouper: Option<&'a dyn WordGrouper>,
}

impl<'a> Capabilities<'a> {
    /// An empty capability bundle.
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the layout-detection model.
    pub fn with_layout_model(mut self, model: &'a dyn LayoutDetector) -> Self {
        self.layout_model = Some(model);
        self
    }

    /// Sets the OCR engine.
    pub fn with_ocr(mut self, ocr: &'a dyn OcrEngine) -> Self {
        self.ocr = Some(ocr);
        self
    }

    /// Sets the table-structure model.
    pub fn with_table_model(mut self, model: &'a dyn TableStructureModel) -> Self {
        self.table_model = Some(model);
        self
    }

    /// Sets the geometric word grouper.
    pub fn with_word_grouper(mut self, grouper: &'a dyn WordGrouper) -> Self {
        self.word_grouper = Some(grouper);
        self
    }

    /// Summarises availability for the strategy resolver.
    pub fn capability_set(&self, pdf_text_extractable: bool) -> crate::pipeline::CapabilitySet {
        crate::pipeline::CapabilitySet {
            layout_model_available: self.layout_model.is_some(),
            ocr_available: self.ocr.is_some(),
            pdf_text_extractable,
        }
    }
}

impl std::fmt::Debug for Capabilities<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("layout_model", &self.layout_model.is_some())
            .field("ocr", &self.ocr.is_some())
            .field("table_model", &self.table_model.is_some())
            .field("word_grouper", &self.word_grouper.is_some())
            .finish()
    }
}
