//! Engine configuration surface.

use super::errors::{ConfigError, ConfigValidator};
use crate::core::errors::LayoutResult;
use crate::processors::{PrimaryAxis, ReadingOrderMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How OCR is applied on the high-resolution path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OcrMode {
    /// OCR the whole page once and merge the regrouped regions into the layout.
    #[default]
    FullPage,
    /// OCR each text-less layout element on its own padded crop.
    IndividualBlocks,
}

/// Configuration for one reconciliation run.
///
/// ```rust
/// use oar_reconcile::core::config::{ConfigValidator, ReconcileConfig};
///
/// let config = ReconcileConfig::from_json_str(r#"{ "xy_cut_shrink_factor": 0.8 }"#).unwrap();
/// assert_eq!(config.subregion_threshold, 0.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Minimum `area(A ∩ B) / area(A)` for A to count as inside B.
    pub subregion_threshold: f32,
    /// Corner distance in pixels below which two boxes are considered the same.
    pub duplicate_bbox_tolerance: f32,
    /// Factor each box is shrunk toward its centroid before XY-cut.
    pub xy_cut_shrink_factor: f32,
    /// Minimum projection gap separating two bands or columns.
    pub xy_cut_min_gap: u32,
    /// Projection values must exceed this to count as occupied.
    pub xy_cut_min_value: u32,
    /// Axis cut first by XY-cut.
    pub xy_cut_primary_axis: PrimaryAxis,
    /// Reading-order reconstruction mode.
    pub reading_order_mode: ReadingOrderMode,
    /// Padding in pixels around element crops sent to OCR.
    pub element_crop_padding: f32,
    /// Padding in pixels around table crops sent to OCR and the table model.
    pub table_crop_padding: f32,
    /// OCR application mode on the high-resolution path.
    pub ocr_mode: OcrMode,
    /// Run table-structure recognition on table elements.
    pub infer_table_structure: bool,
    /// Caller wants image elements extracted; forces the layout model under `Auto`.
    pub extract_images: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            subregion_threshold: 0.5,
            duplicate_bbox_tolerance: 2.0,
            xy_cut_shrink_factor: 0.9,
            xy_cut_min_gap: 1,
            xy_cut_min_value: 0,
            xy_cut_primary_axis: PrimaryAxis::RowMajor,
            reading_order_mode: ReadingOrderMode::XYCut,
            element_crop_padding: 12.0,
            table_crop_padding: 12.0,
            ocr_mode: OcrMode::FullPage,
            infer_table_structure: false,
            extract_images: false,
        }
    }
}

impl ReconcileConfig {
    /// Parses a configuration from JSON and validates it. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> LayoutResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> LayoutResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

impl ConfigValidator for ReconcileConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_threshold("subregion_threshold", self.subregion_threshold)?;
        self.validate_non_negative("duplicate_bbox_tolerance", self.duplicate_bbox_tolerance)?;
        self.validate_non_negative("element_crop_padding", self.element_crop_padding)?;
        self.validate_non_negative("table_crop_padding", self.table_crop_padding)?;
        if !(self.xy_cut_shrink_factor > 0.0 && self.xy_cut_shrink_factor <= 1.0) {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "xy_cut_shrink_factor must be in (0, 1], got {}",
                    self.xy_cut_shrink_factor
                ),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
