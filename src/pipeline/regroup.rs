//! OCR-text regrouping.
//!
//! Turns a flat list of OCR word regions into paragraph-level regions. When
//! the engine also supplies paragraph-segmented text, words are matched to
//! paragraphs greedily and in order; otherwise grouping is delegated to a
//! [`WordGrouper`].

use crate::core::errors::{CapabilityKind, LayoutError, LayoutResult};
use crate::core::traits::{HasText, OcrEngine, WordGrouper};
use crate::domain::{Provenance, TextRegion};
use crate::processors::BoundingBox;
use image::RgbImage;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Paragraph separator: a blank line, possibly containing whitespace.
static PARAGRAPH_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n").unwrap_or_else(|e| panic!("Invalid paragraph break regex: {e}"))
});

/// Splits paragraph-segmented text on blank lines.
///
/// Paragraphs that are empty after trimming are dropped.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK_REGEX
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Regroups OCR word regions into paragraph regions.
///
/// # Arguments
///
/// * `words` - Word regions in the engine's output order
/// * `paragraph_text` - Paragraph-segmented text for the same image, if any
/// * `provenance` - Tag stamped on the produced regions
/// * `grouper` - Fallback used when no paragraph text is available
///
/// # Returns
///
/// One region per paragraph that consumed at least one word.
///
/// Matching is greedy. A cursor walks the pool of words; each paragraph word
/// consumes the first pool word at or after the cursor whose text equals it,
/// and the cursor moves past it. A paragraph word with no match is skipped.
/// Pool words the cursor has passed without consuming are discarded, as are
/// any left over once every paragraph is processed.
pub fn regroup_ocr_words(
    words: &[TextRegion],
    paragraph_text: Option<&str>,
    provenance: Provenance,
    grouper: &dyn WordGrouper,
) -> Vec<TextRegion> {
    let Some(paragraph_text) = paragraph_text else {
        debug!(words = words.len(), "no paragraph text, grouping geometrically");
        return grouper.group(words);
    };

    let mut regions = Vec::new();
    let mut start = 0usize;
    for paragraph in split_paragraphs(paragraph_text) {
        if start >= words.len() {
            break;
        }
        let mut consumed: Vec<&TextRegion> = Vec::new();
        for target in paragraph.split_whitespace() {
            if start >= words.len() {
                break;
            }
            let found = words[start..]
                .iter()
                .position(|w| w.text().is_some_and(|t| t.trim() == target));
            if let Some(offset) = found {
                consumed.push(&words[start + offset]);
                start += offset + 1;
            }
        }
        if let Some(region) = merge_consumed(&consumed, provenance) {
            regions.push(region);
        }
    }

    debug!(
        words = words.len(),
        paragraphs = regions.len(),
        unconsumed = words.len().saturating_sub(start),
        "regrouped OCR words"
    );
    regions
}

fn merge_consumed(consumed: &[&TextRegion], provenance: Provenance) -> Option<TextRegion> {
    if consumed.is_empty() {
        return None;
    }
    let bbox = BoundingBox::enclosing(consumed.iter().filter_map(|w| w.bbox.as_ref()));
    let text = consumed
        .iter()
        .filter_map(|w| w.text())
        .map(str::trim)
        .join(" ");
    Some(TextRegion {
        bbox,
        text: Some(text),
        provenance,
    })
}

/// Runs the OCR engine on an image and regroups its words into paragraphs.
///
/// Paragraph text is requested only when the engine reports that it segments
/// paragraphs consistently with its word output.
pub fn ocr_paragraph_regions(
    image: &RgbImage,
    ocr: &dyn OcrEngine,
    grouper: &dyn WordGrouper,
) -> LayoutResult<Vec<TextRegion>> {
    let words = ocr
        .layout(image)
        .map_err(|e| LayoutError::capability_boxed(CapabilityKind::Ocr, "word layout", e))?;
    let paragraph_text = if ocr.supports_paragraph_text() {
        Some(
            ocr.text(image)
                .map_err(|e| LayoutError::capability_boxed(CapabilityKind::Ocr, "page text", e))?,
        )
    } else {
        None
    };
    Ok(regroup_ocr_words(
        &words,
        paragraph_text.as_deref(),
        ocr.provenance(),
        grouper,
    ))
}
