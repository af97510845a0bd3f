//! Domain-level data model shared across the engine.
//!
//! [`TextRegion`] is what providers exchange; [`LayoutElement`] is what the
//! engine emits, grouped into [`Page`]s and a [`Document`].

pub mod structure;
pub mod text_region;

pub use structure::{
    Document, ElementCategory, ElementId, LayoutElement, PDF_POINTS_PER_INCH, Page, PageImageInfo,
};
pub use text_region::{Provenance, TextRegion, is_font_encoding_artifact};
