//! Region merging and deduplication.
//!
//! Combines an authoritative element list (typically layout-model output) with
//! supplementary regions (native text or OCR) into one element list.
//!
//! ## Steps
//!
//! 1. Text supplementation: an authoritative element with blank text, or text
//!    that is a font-encoding artifact, takes the space-joined text of every
//!    supplementary region that is an almost-subregion of it.
//! 2. Fragment removal: native-text regions lying inside exactly one `Table`
//!    are dropped; the table-structure model re-derives cell content.
//! 3. Promotion: regions absorbed by no authoritative element become
//!    standalone elements, skipping near-duplicates of ones already promoted.

use crate::core::config::ReconcileConfig;
use crate::core::traits::{HasBBox, HasProvenance, HasText};
use crate::domain::{ElementCategory, LayoutElement, Provenance, TextRegion, is_font_encoding_artifact};
use itertools::Itertools;
use tracing::debug;

/// Thresholds used by the merger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOptions {
    /// Almost-subregion threshold.
    pub subregion_threshold: f32,
    /// Maximum corner distance, in pixels, for two regions to be near-duplicates.
    pub duplicate_bbox_tolerance: f32,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            subregion_threshold: 0.5,
            duplicate_bbox_tolerance: 2.0,
        }
    }
}

impl From<&ReconcileConfig> for MergeOptions {
    fn from(config: &ReconcileConfig) -> Self {
        Self {
            subregion_threshold: config.subregion_threshold,
            duplicate_bbox_tolerance: config.duplicate_bbox_tolerance,
        }
    }
}

/// Returns true if the text should be treated as missing.
fn needs_text<T: HasText>(value: &T) -> bool {
    value.is_blank() || value.text().is_some_and(is_font_encoding_artifact)
}

/// Returns true if `a` and `b` are near-duplicates.
///
/// Both must have geometry, their corner distance must be below `tolerance`
/// and their texts must be identical.
pub fn is_near_duplicate<A, B>(a: &A, b: &B, tolerance: f32) -> bool
where
    A: HasBBox + HasText + ?Sized,
    B: HasBBox + HasText + ?Sized,
{
    match (a.bbox(), b.bbox()) {
        (Some(ba), Some(bb)) => ba.corner_distance(bb) < tolerance && a.text() == b.text(),
        _ => false,
    }
}

/// Merges supplementary regions into the authoritative elements.
///
/// # Arguments
///
/// * `authoritative` - Elements whose geometry and category are kept
/// * `supplementary` - Regions supplying text or new elements
/// * `options` - Subregion threshold and duplicate tolerance
///
/// # Returns
///
/// The authoritative elements, in their original order, followed by promoted
/// supplementary regions in their original order. The result never holds more
/// than `authoritative.len() + supplementary.len()` elements and provenance is
/// never changed.
pub fn merge_regions(
    mut authoritative: Vec<LayoutElement>,
    supplementary: &[TextRegion],
    options: &MergeOptions,
) -> Vec<LayoutElement> {
    if supplementary.is_empty() {
        debug!("empty supplementary input, nothing to merge");
        return authoritative;
    }
    let threshold = options.subregion_threshold;

    let mut supplemented = 0usize;
    for element in authoritative.iter_mut() {
        if !needs_text(&*element) {
            continue;
        }
        let texts: Vec<&str> = supplementary
            .iter()
            .filter(|region| region.is_almost_subregion_of(&*element, threshold))
            .filter_map(|region| region.text())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .collect();
        // Readable text wins; artifact-only text is still better than none.
        let readable: Vec<&str> = texts
            .iter()
            .copied()
            .filter(|text| !is_font_encoding_artifact(text))
            .collect();
        let joined = if readable.is_empty() {
            texts.iter().join(" ")
        } else {
            readable.iter().join(" ")
        };
        if !joined.is_empty() {
            element.set_text(Some(joined));
            supplemented += 1;
        }
    }

    let tables: Vec<&LayoutElement> = authoritative.iter().filter(|e| e.is_table()).collect();
    let mut fragments = 0usize;
    let mut promoted: Vec<LayoutElement> = Vec::new();
    for region in supplementary {
        if is_table_fragment(region, &tables, threshold) {
            fragments += 1;
            continue;
        }
        let absorbed = authoritative
            .iter()
            .any(|element| region.is_almost_subregion_of(element, threshold));
        if absorbed {
            continue;
        }
        let duplicate = promoted
            .iter()
            .any(|p| is_near_duplicate(p, region, options.duplicate_bbox_tolerance));
        if !duplicate {
            promoted.push(LayoutElement::from(region.clone()));
        }
    }

    debug!(
        supplemented,
        fragments,
        promoted = promoted.len(),
        "merged {} supplementary regions into {} elements",
        supplementary.len(),
        authoritative.len()
    );

    authoritative.extend(promoted);
    authoritative
}

/// Returns true for a native-text value inside exactly one of `tables`.
fn is_table_fragment<R: HasBBox + HasProvenance>(
    region: &R,
    tables: &[&LayoutElement],
    threshold: f32,
) -> bool {
    region.provenance() == Provenance::NativeText
        && tables
            .iter()
            .filter(|table| region.is_almost_subregion_of(**table, threshold))
            .count()
            == 1
}

/// Removes top-level native-text elements that sit inside exactly one table.
///
/// `Table` elements themselves are never removed.
pub fn remove_table_fragments(elements: Vec<LayoutElement>, threshold: f32) -> Vec<LayoutElement> {
    let tables: Vec<LayoutElement> = elements.iter().filter(|e| e.is_table()).cloned().collect();
    if tables.is_empty() {
        return elements;
    }
    let table_refs: Vec<&LayoutElement> = tables.iter().collect();

    let before = elements.len();
    let kept: Vec<LayoutElement> = elements
        .into_iter()
        .filter(|e| e.is_table() || !is_table_fragment(e, &table_refs, threshold))
        .collect();
    if kept.len() != before {
        debug!(removed = before - kept.len(), "removed table fragments");
    }
    kept
}

/// Drops `Image` elements that near-duplicate an earlier `Image` element.
///
/// Keeps the first occurrence; other categories pass through untouched.
pub fn dedupe_image_elements(elements: Vec<LayoutElement>, tolerance: f32) -> Vec<LayoutElement> {
    let before = elements.len();
    let mut kept: Vec<LayoutElement> = Vec::with_capacity(before);
    for element in elements {
        let duplicate = element.category == ElementCategory::Image
            && kept.iter().any(|k| {
                k.category == ElementCategory::Image && is_near_duplicate(k, &element, tolerance)
            });
        if !duplicate {
            kept.push(element);
        }
    }
    if kept.len() != before {
        debug!(removed = before - kept.len(), "collapsed duplicate images");
    }
    kept
}
