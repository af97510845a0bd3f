//! Table-token adapter.
//!
//! Converts OCR output on a table crop into the flat token records consumed by
//! an external table-structure-recognition model. No structure inference
//! happens here; this is a format boundary.

use crate::core::errors::{CapabilityKind, LayoutError, LayoutResult};
use crate::core::traits::OcrEngine;
use crate::domain::TextRegion;
use crate::processors::BoundingBox;
use crate::utils::crop_padded;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// One OCR token inside a table crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableToken {
    /// Token box in crop-pixel space.
    pub bbox: BoundingBox,
    /// Token text.
    pub text: String,
    /// Position of the token in the OCR output.
    pub span_num: usize,
    /// Line index; always 0 within a single table crop.
    pub line_num: usize,
    /// Block index; always 0 within a single table crop.
    pub block_num: usize,
}

impl TableToken {
    /// Builds the token for the OCR region at `position`.
    ///
    /// A region without coordinates keeps its slot with an empty box so that
    /// token positions still line up with the OCR output.
    pub fn from_region(region: &TextRegion, position: usize) -> Self {
        Self {
            bbox: region.bbox.unwrap_or_default(),
            text: region.text.clone().unwrap_or_default(),
            span_num: position,
            line_num: 0,
            block_num: 0,
        }
    }
}

/// Converts OCR regions into table tokens, one per region, in order.
pub fn tokens_from_regions(regions: &[TextRegion]) -> Vec<TableToken> {
    regions
        .iter()
        .enumerate()
        .map(|(position, region)| TableToken::from_region(region, position))
        .collect()
}

/// A cropped table together with its OCR tokens.
#[derive(Debug, Clone)]
pub struct TableCrop {
    /// The cropped table image.
    pub image: RgbImage,
    /// Where the crop was taken from, in page-pixel space.
    pub crop_box: BoundingBox,
    /// OCR tokens in crop-pixel space.
    pub tokens: Vec<TableToken>,
}

/// Crops a table out of the page image and OCRs the crop into tokens.
///
/// # Arguments
///
/// * `page_image` - The rendered page
/// * `table_bbox` - The table element's box in page-pixel space
/// * `padding` - Pixels added around the table before cropping
/// * `ocr` - OCR engine invoked on the crop only
///
/// # Returns
///
/// The crop and its tokens, or an error if cropping or OCR failed.
pub fn extract_table_tokens(
    page_image: &RgbImage,
    table_bbox: &BoundingBox,
    padding: f32,
    ocr: &dyn OcrEngine,
) -> LayoutResult<TableCrop> {
    let (image, crop_box) = crop_padded(page_image, table_bbox, padding)?;
    let regions = ocr.layout(&image).map_err(|e| {
        LayoutError::capability_boxed(
            CapabilityKind::Ocr,
            format!("table crop ({}x{})", image.width(), image.height()),
            e,
        )
    })?;
    let tokens = tokens_from_regions(&regions);
    tracing::debug!(
        tokens = tokens.len(),
        width = image.width(),
        height = image.height(),
        "extracted table tokens"
    );
    Ok(TableCrop {
        image,
        crop_box,
        tokens,
    })
}
