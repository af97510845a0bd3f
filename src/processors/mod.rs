//! Pure geometry and ordering algorithms.
//!
//! # Modules
//!
//! * `geometry` - Bounding boxes, coordinate spaces and overlap predicates
//! * `sorting` - Reading-order reconstruction (XY-cut and basic sorting)
//! * `table_tokens` - Conversion of table-crop OCR output into model tokens

mod geometry;
pub mod sorting;
pub mod table_tokens;

pub use geometry::*;
pub use sorting::{
    PrimaryAxis, ReadingOrderMode, XyCutOptions, apply_order, reading_order, sort_basic,
    sort_by_xycut,
};
pub use table_tokens::{TableCrop, TableToken, extract_table_tokens, tokens_from_regions};
