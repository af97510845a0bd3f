//! # OAR Reconcile
//!
//! A layout reconciliation engine. It combines the output of a layout-detection
//! model, a PDF's native text layer and OCR engines into one ordered list of
//! categorised elements per page.
//!
//! ## Features
//!
//! - Strategy resolution (`Fast`, `HiRes`, `OcrOnly`) from available capabilities
//! - Merging and deduplication of regions from different providers
//! - Regrouping of OCR words into paragraphs
//! - Reading-order reconstruction with recursive XY-cut
//! - Table token extraction for table-structure models
//! - Parallel page processing with rayon
//!
//! ## Modules
//!
//! * [`core`] - Errors, configuration and capability traits
//! * [`domain`] - Regions, elements, pages and documents
//! * [`processors`] - Geometry, reading order and table tokens
//! * [`pipeline`] - Strategy, merging, regrouping and the page composer
//! * [`utils`] - Image cropping
//!
//! ## Quick Start
//!
//! ```rust
//! use oar_reconcile::prelude::*;
//! use image::RgbImage;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = ReconcilePipeline::new(ReconcileConfig::default(), Capabilities::none())?
//!     .with_strategy(RequestedStrategy::Fast);
//!
//! let image = RgbImage::new(612, 792);
//! let page = PageInput::new(1, &image, 72.0).with_native_text(vec![TextRegion::with_text(
//!     BoundingBox::from_coords(72.0, 72.0, 300.0, 90.0),
//!     "Hello",
//!     Provenance::NativeText,
//! )]);
//! let document = DocumentInput {
//!     pages: vec![page],
//!     is_image: false,
//!     pdf_text_extractable: true,
//! };
//!
//! let document = pipeline.process_document(&document)?.into_document();
//! assert_eq!(document.pages[0].text(), "Hello");
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use oar_reconcile::prelude::*;
/// ```
///
/// Included items cover running the pipeline: the pipeline and its inputs,
/// configuration, capability traits, the data model and the error types.
pub mod prelude {
    pub use crate::core::{
        Capabilities, LayoutDetector, LayoutError, LayoutResult, OcrEngine, ReconcileConfig,
        TableStructureModel, WordGrouper,
    };
    pub use crate::domain::{Document, ElementCategory, LayoutElement, Page, Provenance, TextRegion};
    pub use crate::pipeline::{
        DocumentInput, PageInput, ReconcilePipeline, RequestedStrategy, Strategy,
    };
    pub use crate::processors::{BoundingBox, ReadingOrderMode, TableToken};
}
