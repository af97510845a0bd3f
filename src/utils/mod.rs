//! Utility functions for the reconciliation pipeline.
//!
//! Currently this is the image cropping used by per-element OCR and by the
//! table-token adapter.

pub mod crop;

pub use crop::crop_padded;
