//! Accessor traits implemented by every region-like type.

use crate::domain::Provenance;
use crate::processors::BoundingBox;

/// A value with optional page geometry.
pub trait HasBBox {
    /// The bounding box, or `None` when the provider reported no coordinates.
    fn bbox(&self) -> Option<&BoundingBox>;

    /// Returns true if this value is an almost-subregion of `other` at `threshold`.
    ///
    /// Values without geometry are never a subregion of anything.
    fn is_almost_subregion_of<O: HasBBox + ?Sized>(&self, other: &O, threshold: f32) -> bool {
        match (self.bbox(), other.bbox()) {
            (Some(a), Some(b)) => a.is_almost_subregion_of(b, threshold),
            _ => false,
        }
    }
}

/// A value that may carry recognised text.
pub trait HasText {
    /// The text, if any.
    fn text(&self) -> Option<&str>;

    /// Returns true when the text is absent or whitespace only.
    fn is_blank(&self) -> bool {
        self.text().is_none_or(|t| t.trim().is_empty())
    }
}

/// A value tagged with the capability that produced it.
pub trait HasProvenance {
    /// The producing capability.
    fn provenance(&self) -> Provenance;
}
