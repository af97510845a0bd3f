//! Reading-order reconstruction.
//!
//! Three modes are available:
//!
//! - **Dont**: identity, elements keep their insertion order
//! - **Basic**: stable sort by `(y1, x1, original index)`, elements without
//!   usable geometry go last
//! - **XYCut**: recursive projection-profile partitioning
//!
//! ## XY-cut Algorithm
//!
//! The XY-cut algorithm recursively divides the page by projecting bounding boxes
//! onto the X and Y axes, finding gaps in the projection, and recursively sorting
//! each partition. This produces a natural reading order for multi-column layouts
//! where a plain top-to-bottom sort interleaves the columns.
//!
//! Before cutting, every box is shrunk toward its own centroid so that boxes in
//! adjacent rows or columns that barely touch do not merge into one band.

use crate::core::config::ReconcileConfig;
use crate::core::traits::HasBBox;
use crate::processors::BoundingBox;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Reading-order reconstruction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReadingOrderMode {
    /// Keep insertion order.
    Dont,
    /// Sort by top edge, then left edge.
    Basic,
    /// Recursive XY-cut.
    #[default]
    XYCut,
}

/// The axis XY-cut partitions first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrimaryAxis {
    /// Cut into horizontal bands first, then columns within each band.
    #[default]
    RowMajor,
    /// Cut into columns first, then bands within each column.
    ColumnMajor,
}

impl PrimaryAxis {
    /// Index into `[x1, y1, x2, y2]` of the coordinate cut first.
    fn index(&self) -> usize {
        match self {
            PrimaryAxis::RowMajor => 1,
            PrimaryAxis::ColumnMajor => 0,
        }
    }
}

/// Parameters of the XY-cut projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XyCutOptions {
    /// Factor applied to every box before cutting (1.0 disables shrinking).
    pub shrink_factor: f32,
    /// Minimum number of empty projection cells separating two segments.
    pub min_gap: u32,
    /// Projection values must exceed this to count as occupied.
    pub min_value: u32,
    /// Axis cut first.
    pub primary_axis: PrimaryAxis,
}

impl Default for XyCutOptions {
    fn default() -> Self {
        Self {
            shrink_factor: 0.9,
            min_gap: 1,
            min_value: 0,
            primary_axis: PrimaryAxis::RowMajor,
        }
    }
}

impl From<&ReconcileConfig> for XyCutOptions {
    fn from(config: &ReconcileConfig) -> Self {
        Self {
            shrink_factor: config.xy_cut_shrink_factor,
            min_gap: config.xy_cut_min_gap,
            min_value: config.xy_cut_min_value,
            primary_axis: config.xy_cut_primary_axis,
        }
    }
}

/// Computes the reading order of `elements` as a permutation of their indices.
///
/// In `XYCut` mode every element must have a valid box; if any does not, the
/// page falls back to its original order and the event is logged at debug level.
pub fn reading_order<T: HasBBox>(
    elements: &[T],
    mode: ReadingOrderMode,
    options: &XyCutOptions,
) -> Vec<usize> {
    match mode {
        ReadingOrderMode::Dont => (0..elements.len()).collect(),
        ReadingOrderMode::Basic => sort_basic(elements),
        ReadingOrderMode::XYCut => {
            let Some(boxes) = elements
                .iter()
                .map(|e| e.bbox().filter(|b| b.is_valid()).copied())
                .collect::<Option<Vec<BoundingBox>>>()
            else {
                debug!(
                    elements = elements.len(),
                    "element without valid geometry, keeping original order"
                );
                return (0..elements.len()).collect();
            };

            let shrunk: Vec<BoundingBox> = boxes
                .iter()
                .map(|b| b.shrink(options.shrink_factor))
                .collect();
            let order = sort_by_xycut(&shrunk, options.primary_axis, options.min_gap, options.min_value);

            if !is_permutation(&order, elements.len()) {
                debug!("xy-cut produced an incomplete order, keeping original order");
                return (0..elements.len()).collect();
            }
            order
        }
    }
}

/// Reorders `items` according to `order`, a permutation of their indices.
///
/// Indices that are out of range or repeated are ignored, and any item not
/// named by `order` keeps its relative position at the end.
pub fn apply_order<T>(items: Vec<T>, order: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut reordered = Vec::with_capacity(slots.len());
    for &idx in order {
        if let Some(item) = slots.get_mut(idx).and_then(Option::take) {
            reordered.push(item);
        }
    }
    reordered.extend(slots.into_iter().flatten());
    reordered
}

/// Stable sort by `(y1, x1, original index)`.
///
/// Elements without a valid box sort after every element that has one,
/// keeping their relative input order.
pub fn sort_basic<T: HasBBox>(elements: &[T]) -> Vec<usize> {
    let mut keyed: Vec<(usize, Option<(f32, f32)>)> = elements
        .iter()
        .enumerate()
        .map(|(idx, e)| {
            let key = e.bbox().filter(|b| b.is_valid()).map(|b| (b.y_min(), b.x_min()));
            (idx, key)
        })
        .collect();

    keyed.sort_by(|(ia, ka), (ib, kb)| match (ka, kb) {
        (Some((ya, xa)), Some((yb, xb))) => ya
            .total_cmp(yb)
            .then_with(|| xa.total_cmp(xb))
            .then_with(|| ia.cmp(ib)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => ia.cmp(ib),
    });

    keyed.into_iter().map(|(idx, _)| idx).collect()
}

/// Upper bound on the projection length along either axis.
const MAX_PROJECTION_CELLS: usize = 65_536;

/// Maps one axis of the page onto grid cells.
///
/// Coordinates are translated so the smallest finite start lands on cell 0,
/// and scaled down when the extent exceeds [`MAX_PROJECTION_CELLS`].
#[derive(Debug, Clone, Copy)]
struct GridAxis {
    origin: f32,
    scale: f32,
}

impl GridAxis {
    fn fit(starts: impl Iterator<Item = f32>, ends: impl Iterator<Item = f32>) -> Self {
        let origin = starts.filter(|v| v.is_finite()).fold(f32::INFINITY, f32::min);
        let origin = if origin.is_finite() { origin } else { 0.0 };
        let extent = ends
            .filter(|v| v.is_finite())
            .fold(0.0f32, |acc, v| acc.max(v - origin));
        let limit = MAX_PROJECTION_CELLS as f32;
        let scale = if extent.is_finite() && extent > limit {
            limit / extent
        } else if extent.is_finite() {
            1.0
        } else {
            // Extent overflowed f32, so every finite span collapses anyway
            0.0
        };
        Self { origin, scale }
    }

    fn cell(&self, value: f32) -> usize {
        // NaN casts to 0, infinities saturate before the clamp
        (((value - self.origin) * self.scale).max(0.0) as usize).min(MAX_PROJECTION_CELLS)
    }
}

/// Sort bounding boxes using the XY-cut algorithm.
///
/// Coordinates are translated to the page's own origin and each axis is
/// compressed onto at most 65 536 cells, so far-off or
/// oversized boxes cannot inflate the projection.
///
/// # Arguments
///
/// * `boxes` - Boxes to order
/// * `axis` - Axis to cut first
/// * `min_gap` - Minimum number of empty cells separating two segments
/// * `min_value` - Projection values must exceed this to count as occupied
///
/// # Returns
///
/// Indices representing the sorted order of input boxes
///
/// # Example
///
/// ```
/// use oar_reconcile::processors::{BoundingBox, PrimaryAxis, sort_by_xycut};
///
/// let boxes = vec![
///     BoundingBox::from_coords(0.0, 0.0, 20.0, 20.0),
///     BoundingBox::from_coords(200.0, 0.0, 230.0, 30.0),
///     BoundingBox::from_coords(0.0, 40.0, 50.0, 50.0),
/// ];
/// assert_eq!(sort_by_xycut(&boxes, PrimaryAxis::RowMajor, 1, 0), vec![0, 1, 2]);
/// assert_eq!(sort_by_xycut(&boxes, PrimaryAxis::ColumnMajor, 1, 0), vec![0, 2, 1]);
/// ```
pub fn sort_by_xycut(
    boxes: &[BoundingBox],
    axis: PrimaryAxis,
    min_gap: u32,
    min_value: u32,
) -> Vec<usize> {
    if boxes.is_empty() {
        return Vec::new();
    }

    // Integer grid at one-unit resolution unless the page is too large
    let x_axis = GridAxis::fit(boxes.iter().map(|b| b.x_min()), boxes.iter().map(|b| b.x_max()));
    let y_axis = GridAxis::fit(boxes.iter().map(|b| b.y_min()), boxes.iter().map(|b| b.y_max()));
    let grid_boxes: Vec<([usize; 4], usize)> = boxes
        .iter()
        .enumerate()
        .map(|(idx, b)| {
            (
                [
                    x_axis.cell(b.x_min()),
                    y_axis.cell(b.y_min()),
                    x_axis.cell(b.x_max()),
                    y_axis.cell(b.y_max()),
                ],
                idx,
            )
        })
        .collect();

    let mut result = Vec::with_capacity(boxes.len());
    recursive_cut(&grid_boxes, axis.index(), min_gap, min_value, &mut result);
    result
}

/// Generate a 1D projection histogram from boxes along a specified axis.
///
/// `axis` is 0 for the X axis and 1 for the Y axis. Every box covers at least
/// its starting cell, so boxes thinner than one unit still register.
fn projection_by_bboxes(boxes: &[([usize; 4], usize)], axis: usize) -> Vec<u32> {
    let Some(max_length) = boxes.iter().map(|(b, _)| b[axis + 2].max(b[axis] + 1)).max() else {
        return Vec::new();
    };

    let mut projection = vec![0u32; max_length];
    for (b, _) in boxes {
        let start = b[axis];
        let end = b[axis + 2].max(start + 1);
        for cell in &mut projection[start..end] {
            *cell += 1;
        }
    }

    projection
}

/// Split the projection profile into `[start, end)` segments separated by gaps.
///
/// Returns `None` when no cell exceeds `min_value`.
fn split_projection_profile(
    values: &[u32],
    min_value: u32,
    min_gap: u32,
) -> Option<Vec<(usize, usize)>> {
    let significant: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v > min_value)
        .map(|(idx, _)| idx)
        .collect();

    let (&first, rest) = significant.split_first()?;

    let mut segments = Vec::new();
    let mut start = first;
    let mut prev = first;
    for &idx in rest {
        // `idx - prev - 1` empty cells lie between the two occupied ones
        if idx - prev > min_gap as usize {
            segments.push((start, prev + 1));
            start = idx;
        }
        prev = idx;
    }
    segments.push((start, prev + 1));

    Some(segments)
}

/// Distributes boxes over `segments` by their start coordinate on `axis`.
///
/// A box whose start lies in no segment, because the cells it starts on did
/// not exceed `min_value`, joins the nearest segment (the earlier one on ties).
/// Boxes keep their relative order within each bucket.
fn assign_to_segments(
    boxes: &[([usize; 4], usize)],
    axis: usize,
    segments: &[(usize, usize)],
) -> Vec<Vec<([usize; 4], usize)>> {
    let mut buckets = vec![Vec::new(); segments.len()];
    for item in boxes {
        let position = item.0[axis];
        let nearest = segments
            .iter()
            .enumerate()
            .min_by_key(|(_, (start, end))| {
                if position < *start {
                    start - position
                } else if position >= *end {
                    position - end + 1
                } else {
                    0
                }
            })
            .map(|(i, _)| i);
        if let Some(bucket) = nearest.and_then(|i| buckets.get_mut(i)) {
            bucket.push(*item);
        }
    }
    buckets
}

/// Recursively cut along `primary`, then along the other axis within each segment.
///
/// A segment that does not split along the secondary axis is a leaf and its
/// boxes are emitted sorted by their secondary coordinate. A segment that does
/// split into at least two non-empty pieces recurses into each piece with the
/// same primary axis.
fn recursive_cut(
    boxes: &[([usize; 4], usize)],
    primary: usize,
    min_gap: u32,
    min_value: u32,
    result: &mut Vec<usize>,
) {
    if boxes.is_empty() {
        return;
    }
    let secondary = 1 - primary;

    let mut primary_sorted = boxes.to_vec();
    primary_sorted.sort_by_key(|(b, _)| b[primary]);

    let primary_projection = projection_by_bboxes(&primary_sorted, primary);
    let Some(primary_segments) =
        split_projection_profile(&primary_projection, min_value, min_gap)
    else {
        result.extend(primary_sorted.iter().map(|(_, idx)| *idx));
        return;
    };

    for mut chunk in assign_to_segments(&primary_sorted, primary, &primary_segments) {
        if chunk.is_empty() {
            continue;
        }

        chunk.sort_by_key(|(b, _)| b[secondary]);

        let secondary_projection = projection_by_bboxes(&chunk, secondary);
        let sub_chunks = split_projection_profile(&secondary_projection, min_value, min_gap)
            .map(|segments| assign_to_segments(&chunk, secondary, &segments))
            .unwrap_or_default();

        // Recursing on an unchanged set would never terminate
        if sub_chunks.iter().filter(|c| !c.is_empty()).count() > 1 {
            for sub_chunk in sub_chunks {
                recursive_cut(&sub_chunk, primary, min_gap, min_value, result);
            }
        } else {
            result.extend(chunk.iter().map(|(_, idx)| *idx));
        }
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &idx in order {
        match seen.get_mut(idx) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ElementCategory, LayoutElement, Provenance, TextRegion};
    use proptest::prelude::*;

    fn element(x1: f32, y1: f32, x2: f32, y2: f32) -> LayoutElement {
        LayoutElement::from_bbox(
            BoundingBox::from_coords(x1, y1, x2, y2),
            ElementCategory::NarrativeText,
            Provenance::LayoutModel,
        )
    }

    fn element_without_geometry() -> LayoutElement {
        LayoutElement::new(
            TextRegion::without_geometry("floating", Provenance::NativeText),
            ElementCategory::NarrativeText,
        )
    }

    #[test]
    fn test_xycut_row_and_column_major() {
        let elements = vec![
            element(0.0, 0.0, 20.0, 20.0),
            element(200.0, 0.0, 230.0, 30.0),
            element(0.0, 40.0, 50.0, 50.0),
        ];
        let row_major = XyCutOptions::default();
        assert_eq!(
            reading_order(&elements, ReadingOrderMode::XYCut, &row_major),
            vec![0, 1, 2]
        );

        let column_major = XyCutOptions {
            primary_axis: PrimaryAxis::ColumnMajor,
            ..Default::default()
        };
        assert_eq!(
            reading_order(&elements, ReadingOrderMode::XYCut, &column_major),
            vec![0, 2, 1]
        );
    }

    #[test]
    fn test_xycut_single_column() {
        let boxes = vec![
            BoundingBox::from_coords(10.0, 70.0, 100.0, 90.0), // bottom
            BoundingBox::from_coords(10.0, 10.0, 100.0, 30.0), // top
            BoundingBox::from_coords(10.0, 40.0, 100.0, 60.0), // middle
        ];
        assert_eq!(sort_by_xycut(&boxes, PrimaryAxis::RowMajor, 1, 0), vec![1, 2, 0]);
    }

    #[test]
    fn test_xycut_two_columns_with_header() {
        // A full-width title above two columns of two paragraphs each
        let elements = vec![
            element(300.0, 100.0, 500.0, 150.0), // right column, second row
            element(10.0, 10.0, 500.0, 30.0),    // title
            element(10.0, 40.0, 200.0, 90.0),    // left column, first row
            element(300.0, 40.0, 500.0, 90.0),   // right column, first row
            element(10.0, 100.0, 200.0, 150.0),  // left column, second row
        ];
        let order = reading_order(&elements, ReadingOrderMode::XYCut, &XyCutOptions::default());
        assert_eq!(order, vec![1, 2, 3, 4, 0]);
    }

    #[test]
    fn test_xycut_falls_back_without_geometry() {
        let elements = vec![
            element(0.0, 50.0, 10.0, 60.0),
            element_without_geometry(),
            element(0.0, 0.0, 10.0, 10.0),
        ];
        let order = reading_order(&elements, ReadingOrderMode::XYCut, &XyCutOptions::default());
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_xycut_falls_back_on_degenerate_box() {
        let elements = vec![element(0.0, 50.0, 10.0, 60.0), element(0.0, 0.0, 0.0, 10.0)];
        let order = reading_order(&elements, ReadingOrderMode::XYCut, &XyCutOptions::default());
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_basic_places_missing_geometry_last() {
        let elements = vec![
            element_without_geometry(),
            element(50.0, 10.0, 60.0, 20.0),
            element(0.0, 10.0, 10.0, 20.0),
            element(0.0, 0.0, 10.0, 5.0),
        ];
        let order = reading_order(&elements, ReadingOrderMode::Basic, &XyCutOptions::default());
        assert_eq!(order, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_basic_is_stable_for_equal_keys() {
        let elements = vec![element(0.0, 0.0, 10.0, 10.0), element(0.0, 0.0, 20.0, 20.0)];
        assert_eq!(sort_basic(&elements), vec![0, 1]);
    }

    #[test]
    fn test_dont_mode_is_identity() {
        let elements = vec![element(0.0, 50.0, 10.0, 60.0), element(0.0, 0.0, 10.0, 10.0)];
        assert_eq!(
            reading_order(&elements, ReadingOrderMode::Dont, &XyCutOptions::default()),
            vec![0, 1]
        );
    }

    #[test]
    fn test_apply_order() {
        let items = vec!["a", "b", "c"];
        assert_eq!(apply_order(items.clone(), &[2, 0, 1]), vec!["c", "a", "b"]);
        assert_eq!(apply_order(items, &[1, 1]), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_xycut_empty_boxes() {
        assert!(sort_by_xycut(&[], PrimaryAxis::RowMajor, 1, 0).is_empty());
    }

    #[test]
    fn test_projection_by_bboxes() {
        let boxes = vec![([10, 0, 20, 10], 0), ([15, 0, 25, 10], 1)];
        let x_proj = projection_by_bboxes(&boxes, 0);
        assert_eq!(x_proj.len(), 25);
        assert_eq!(x_proj[15], 2);
        assert_eq!(x_proj[10], 1);
        assert_eq!(x_proj[9], 0);
    }

    #[test]
    fn test_projection_counts_thin_boxes() {
        let boxes = vec![([4, 0, 4, 10], 0)];
        assert_eq!(projection_by_bboxes(&boxes, 0), vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_split_projection_profile() {
        let profile = vec![1, 1, 0, 0, 0, 1, 1];
        assert_eq!(
            split_projection_profile(&profile, 0, 1),
            Some(vec![(0, 2), (5, 7)])
        );
        // A gap of three empty cells does not split at min_gap = 3
        assert_eq!(split_projection_profile(&profile, 0, 3), Some(vec![(0, 7)]));
        assert_eq!(split_projection_profile(&[0, 0], 0, 1), None);
    }

    #[test]
    fn test_split_projection_profile_min_value() {
        let profile = vec![2, 1, 2];
        assert_eq!(
            split_projection_profile(&profile, 1, 1),
            Some(vec![(0, 1), (2, 3)])
        );
    }

    #[test]
    fn test_xycut_keeps_boxes_starting_below_min_value() {
        // The tall box starts on cells that stay at or below min_value
        let elements = vec![
            element(0.0, 15.0, 10.0, 17.0),
            element(0.0, 0.0, 10.0, 20.0),
            element(0.0, 2.0, 10.0, 4.0),
        ];
        let options = XyCutOptions {
            shrink_factor: 1.0,
            min_gap: 1,
            min_value: 1,
            primary_axis: PrimaryAxis::RowMajor,
        };
        let order = reading_order(&elements, ReadingOrderMode::XYCut, &options);
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_assign_to_segments_uses_nearest_segment() {
        let boxes = vec![([0, 0, 1, 1], 0), ([3, 0, 4, 1], 1), ([9, 0, 10, 1], 2), ([6, 0, 7, 1], 3)];
        let buckets = assign_to_segments(&boxes, 0, &[(2, 5), (8, 10)]);
        let indices: Vec<Vec<usize>> = buckets
            .iter()
            .map(|bucket| bucket.iter().map(|(_, idx)| *idx).collect())
            .collect();
        // Box 3 at 6 is two cells from both segments and takes the earlier one
        assert_eq!(indices, vec![vec![0, 1, 3], vec![2]]);
    }

    #[test]
    fn test_xycut_zero_min_gap_terminates() {
        let boxes = vec![
            BoundingBox::from_coords(0.0, 0.0, 50.0, 5.0),
            BoundingBox::from_coords(0.0, 10.0, 50.0, 15.0),
        ];
        assert_eq!(sort_by_xycut(&boxes, PrimaryAxis::RowMajor, 0, 0), vec![0, 1]);
    }

    #[test]
    fn test_xycut_handles_huge_coordinates() {
        let elements = vec![element(0.0, 0.0, 10.0, 10.0), element(0.0, 20.0, 1e30, 30.0)];
        let order = reading_order(&elements, ReadingOrderMode::XYCut, &XyCutOptions::default());
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_xycut_is_translation_invariant() {
        let offset = 5.0e6;
        let boxes: Vec<BoundingBox> = [
            (0.0, 0.0, 20.0, 20.0),
            (200.0, 0.0, 230.0, 30.0),
            (0.0, 40.0, 50.0, 50.0),
        ]
        .iter()
        .map(|&(x1, y1, x2, y2)| BoundingBox::from_coords(x1 + offset, y1 + offset, x2 + offset, y2 + offset))
        .collect();
        assert_eq!(sort_by_xycut(&boxes, PrimaryAxis::RowMajor, 1, 0), vec![0, 1, 2]);
        assert_eq!(sort_by_xycut(&boxes, PrimaryAxis::ColumnMajor, 1, 0), vec![0, 2, 1]);
    }

    #[test]
    fn test_grid_axis_caps_projection_length() {
        let axis = GridAxis::fit([0.0f32].into_iter(), [1.0e9f32].into_iter());
        assert_eq!(axis.cell(0.0), 0);
        assert!(axis.cell(1.0e9) >= MAX_PROJECTION_CELLS - 1);
        assert_eq!(axis.cell(4.0e9), MAX_PROJECTION_CELLS);
        assert_eq!(axis.cell(f32::NAN), 0);
        assert_eq!(axis.cell(f32::INFINITY), MAX_PROJECTION_CELLS);
    }

    fn arb_boxes() -> impl Strategy<Value = Vec<BoundingBox>> {
        prop::collection::vec(
            (0.0f32..400.0, 0.0f32..400.0, 1.0f32..150.0, 1.0f32..150.0)
                .prop_map(|(x, y, w, h)| BoundingBox::from_coords(x, y, x + w, y + h)),
            0..24,
        )
    }

    proptest! {
        #[test]
        fn test_xycut_is_permutation(boxes in arb_boxes(), column_major in any::<bool>()) {
            let axis = if column_major { PrimaryAxis::ColumnMajor } else { PrimaryAxis::RowMajor };
            let shrunk: Vec<BoundingBox> = boxes.iter().map(|b| b.shrink(0.9)).collect();
            let order = sort_by_xycut(&shrunk, axis, 1, 0);
            let mut sorted = order.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..boxes.len()).collect::<Vec<_>>());
        }
    }
}
