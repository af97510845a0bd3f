//! Trait seams of the engine.
//!
//! * [`capability`] - narrow interfaces to the external providers (layout
//!   model, OCR engine, table-structure model, word grouping).
//! * [`accessors`] - read-only views shared by [`TextRegion`](crate::domain::TextRegion)
//!   and [`LayoutElement`](crate::domain::LayoutElement) so geometry predicates
//!   can take either.

pub mod accessors;
pub mod capability;

pub use accessors::{HasBBox, HasProvenance, HasText};
pub use capability::{Capabilities, LayoutDetector, OcrEngine, TableStructureModel, WordGrouper};
