//! The reconciliation pipeline.
//!
//! * [`strategy`] - Chooses `Fast`, `HiRes` or `OcrOnly` from the request and
//!   available capabilities
//! * [`merge`] - Merges supplementary regions into authoritative elements
//! * [`regroup`] - Regroups OCR words into paragraphs
//! * [`grouping`] - Default geometric word grouper
//! * [`composer`] - Runs the stages for pages and documents

pub mod composer;
pub mod grouping;
pub mod merge;
pub mod regroup;
pub mod strategy;

pub use composer::{
    DocumentInput, DocumentOutcome, PageInput, ReconcilePipeline, assign_hierarchy,
    rescale_regions,
};
pub use grouping::{ProximityConfig, ProximityGrouper};
pub use merge::{
    MergeOptions, dedupe_image_elements, is_near_duplicate, merge_regions, remove_table_fragments,
};
pub use regroup::{ocr_paragraph_regions, regroup_ocr_words, split_paragraphs};
pub use strategy::{
    CapabilitySet, PageHints, RequestedStrategy, Resolution, Strategy, StrategyWarning, resolve,
};
