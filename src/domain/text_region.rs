//! Provenance-tagged text regions.
//!
//! A [`TextRegion`] is the atomic unit exchanged between capability providers
//! and the merger: a box, optional text and the tag of the provider that
//! produced it.

use crate::core::traits::{HasBBox, HasProvenance, HasText};
use crate::processors::BoundingBox;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `(cid:NN)` placeholders emitted by PDF text extraction for glyphs it
/// could not map through the font's encoding.
static CID_PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(cid:\d+\)").unwrap_or_else(|e| panic!("Invalid cid placeholder regex: {e}"))
});

/// The capability that produced a region.
///
/// Provenance drives merge policy only; reading order never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// The learned layout-detection model.
    LayoutModel,
    /// Direct extraction from the page's native content stream.
    NativeText,
    /// The primary OCR engine.
    OcrPrimary,
    /// A secondary OCR engine.
    OcrSecondary,
    /// Synthesised by the merger from other regions.
    Merged,
}

/// A box with optional text, tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    /// Page-space bounding box; `None` when the provider gave no coordinates.
    pub bbox: Option<BoundingBox>,
    /// Recognised or extracted text.
    pub text: Option<String>,
    /// Which capability produced the region.
    pub provenance: Provenance,
}

impl TextRegion {
    /// Creates a region with a box and no text.
    pub fn new(bbox: BoundingBox, provenance: Provenance) -> Self {
        Self {
            bbox: Some(bbox),
            text: None,
            provenance,
        }
    }

    /// Creates a region with a box and text.
    pub fn with_text(bbox: BoundingBox, text: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            bbox: Some(bbox),
            text: Some(text.into()),
            provenance,
        }
    }

    /// Creates a region that carries text but no coordinates.
    pub fn without_geometry(text: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            bbox: None,
            text: Some(text.into()),
            provenance,
        }
    }
}

impl HasBBox for TextRegion {
    fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }
}

impl HasText for TextRegion {
    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl HasProvenance for TextRegion {
    fn provenance(&self) -> Provenance {
        self.provenance
    }
}

/// Returns true if `text` is recognisably a font-encoding artifact rather than content.
///
/// That is the case when the text contains `(cid:N)` placeholders, or when
/// every non-whitespace character is a replacement, private-use or control glyph.
pub fn is_font_encoding_artifact(text: &str) -> bool {
    if CID_PLACEHOLDER_REGEX.is_match(text) {
        return true;
    }

    let mut glyphs = text.chars().filter(|c| !c.is_whitespace()).peekable();
    glyphs.peek().is_some() && glyphs.all(is_placeholder_glyph)
}

fn is_placeholder_glyph(c: char) -> bool {
    c == '\u{FFFD}'
        || c.is_control()
        || ('\u{E000}'..='\u{F8FF}').contains(&c)
        || ('\u{F0000}'..='\u{FFFFD}').contains(&c)
}
