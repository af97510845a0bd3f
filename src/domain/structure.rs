//! Page and document structure types.
//!
//! [`LayoutElement`] is what the engine emits: a provenance-tagged region with
//! a category, an opaque id and an optional parent. A [`Page`] keeps its
//! elements in insertion order until reading-order reconstruction runs.

use super::text_region::{Provenance, TextRegion};
use crate::core::traits::{HasBBox, HasProvenance, HasText};
use crate::processors::{BoundingBox, CoordinateSpace};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Resolution of the PDF user space, in points per inch.
pub const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Section numbering such as `1`, `2.1`, `3.2.4.` or `(1)` at the start of a title.
static TITLE_NUMBERING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^\s*
        (?:
            # Arabic numerals: 1, 1.2, 1.2.3, etc.
            (?P<dotted>[1-9][0-9]*(?:\.[0-9]+)*)\.?
            |
            # Parenthesized Arabic numerals: (1), (2)
            [(][1-9][0-9]*[)]
            |
            # Roman numerals followed by a period
            (?:I|II|III|IV|V|VI|VII|VIII|IX|X)\.
        )
        \s+\S
    ",
    )
    .unwrap_or_else(|e| panic!("Invalid title numbering regex: {e}"))
});

/// Element category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementCategory {
    /// Document or section title.
    Title,
    /// Running prose.
    NarrativeText,
    /// Text whose role was not determined.
    UncategorizedText,
    /// List item.
    ListItem,
    /// Table.
    Table,
    /// Image or figure.
    Image,
    /// Figure or table caption.
    FigureCaption,
    /// Mathematical formula.
    Formula,
    /// Page header.
    Header,
    /// Page footer.
    Footer,
    /// Page number.
    PageNumber,
}

impl ElementCategory {
    /// Returns the string representation of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementCategory::Title => "Title",
            ElementCategory::NarrativeText => "NarrativeText",
            ElementCategory::UncategorizedText => "UncategorizedText",
            ElementCategory::ListItem => "ListItem",
            ElementCategory::Table => "Table",
            ElementCategory::Image => "Image",
            ElementCategory::FigureCaption => "FigureCaption",
            ElementCategory::Formula => "Formula",
            ElementCategory::Header => "Header",
            ElementCategory::Footer => "Footer",
            ElementCategory::PageNumber => "PageNumber",
        }
    }

    /// Returns true for categories whose content is not plain running text.
    pub fn is_non_text(&self) -> bool {
        matches!(self, ElementCategory::Table | ElementCategory::Image)
    }
}

impl std::fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque element identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub String);

impl ElementId {
    /// Deterministic id for the element at `position` on page `page_number`.
    pub fn for_position(page_number: usize, position: usize) -> Self {
        Self(format!("p{page_number}-e{position}"))
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A categorised region emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutElement {
    /// Geometry, text and provenance.
    pub region: TextRegion,
    /// Element category.
    pub category: ElementCategory,
    /// Opaque identifier, assigned once the page's order is final.
    pub id: Option<ElementId>,
    /// Parent element (the nearest enclosing heading).
    pub parent_id: Option<ElementId>,
    /// Table structure as HTML, for `Table` elements when structure inference ran.
    pub text_as_html: Option<String>,
}

impl LayoutElement {
    /// Creates a new element from a region.
    pub fn new(region: TextRegion, category: ElementCategory) -> Self {
        Self {
            region,
            category,
            id: None,
            parent_id: None,
            text_as_html: None,
        }
    }

    /// Creates a text-less element from a box.
    pub fn from_bbox(bbox: BoundingBox, category: ElementCategory, provenance: Provenance) -> Self {
        Self::new(TextRegion::new(bbox, provenance), category)
    }

    /// Sets the text content for the element.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.region.text = Some(text.into());
        self
    }

    /// Replaces the text.
    pub fn set_text(&mut self, text: Option<String>) {
        self.region.text = text;
    }

    /// Returns true if this element is a table.
    pub fn is_table(&self) -> bool {
        self.category == ElementCategory::Table
    }

    /// Heading depth for `Title` elements, from section numbering when present.
    ///
    /// `"2.1 Method"` has depth 2; an unnumbered title has depth 1. Returns
    /// `None` for other categories.
    pub fn heading_depth(&self) -> Option<usize> {
        if self.category != ElementCategory::Title {
            return None;
        }
        let depth = self
            .region
            .text
            .as_deref()
            .and_then(|text| TITLE_NUMBERING_REGEX.captures(text))
            .and_then(|caps| caps.name("dotted"))
            .map(|m| m.as_str().split('.').count())
            .unwrap_or(1);
        Some(depth)
    }
}

impl From<TextRegion> for LayoutElement {
    /// Wraps a bare region as an uncategorised text element.
    fn from(region: TextRegion) -> Self {
        LayoutElement::new(region, ElementCategory::UncategorizedText)
    }
}

impl HasBBox for LayoutElement {
    fn bbox(&self) -> Option<&BoundingBox> {
        self.region.bbox.as_ref()
    }
}

impl HasText for LayoutElement {
    fn text(&self) -> Option<&str> {
        self.region.text.as_deref()
    }
}

impl HasProvenance for LayoutElement {
    fn provenance(&self) -> Provenance {
        self.region.provenance
    }
}

/// Rendered page image metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageImageInfo {
    /// Image width in pixels.
    pub pixel_width: u32,
    /// Image height in pixels.
    pub pixel_height: u32,
    /// Rendering resolution in dots per inch.
    pub dpi: f32,
}

impl PageImageInfo {
    /// Creates page image metadata.
    pub fn new(pixel_width: u32, pixel_height: u32, dpi: f32) -> Self {
        Self {
            pixel_width,
            pixel_height,
            dpi,
        }
    }

    /// The page's pixel coordinate space.
    pub fn coordinate_space(&self) -> CoordinateSpace {
        CoordinateSpace::new(self.pixel_width as f32, self.pixel_height as f32)
    }

    /// The same page measured in PDF points (1/72 inch).
    pub fn points_space(&self) -> CoordinateSpace {
        let scale = PDF_POINTS_PER_INCH / self.dpi;
        CoordinateSpace::new(
            self.pixel_width as f32 * scale,
            self.pixel_height as f32 * scale,
        )
    }
}

/// One processed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    /// Elements, in reading order once reconstruction has run.
    pub elements: Vec<LayoutElement>,
    /// Image metadata.
    pub image_info: PageImageInfo,
}

impl Page {
    /// Creates a page.
    pub fn new(number: usize, elements: Vec<LayoutElement>, image_info: PageImageInfo) -> Self {
        Self {
            number,
            elements,
            image_info,
        }
    }

    /// Concatenated text of all elements, one element per line.
    pub fn text(&self) -> String {
        self.elements
            .iter()
            .filter_map(|e| e.region.text.as_deref())
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// An ordered list of pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Pages in document order.
    pub pages: Vec<Page>,
}

impl Document {
    /// Creates a document.
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }
}
