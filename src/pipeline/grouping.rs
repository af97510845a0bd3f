//! Geometric grouping of OCR words.
//!
//! Used when an OCR engine returns only word regions and no paragraph text.
//! Words are clustered into lines by vertical centre, and lines into blocks by
//! vertical gap and horizontal overlap.

use crate::core::traits::{HasBBox, WordGrouper};
use crate::domain::TextRegion;
use crate::processors::BoundingBox;
use itertools::Itertools;

/// Configuration for [`ProximityGrouper`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityConfig {
    /// Maximum difference between word centres on the same line, in pixels.
    pub same_line_y_tolerance: f32,
    /// Maximum vertical gap between consecutive lines of one block, as a
    /// multiple of the taller line's height.
    pub line_gap_ratio: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            same_line_y_tolerance: 10.0,
            line_gap_ratio: 1.0,
        }
    }
}

/// Default [`WordGrouper`]: clusters words by proximity.
#[derive(Debug, Clone, Default)]
pub struct ProximityGrouper {
    config: ProximityConfig,
}

struct Line<'a> {
    words: Vec<(&'a TextRegion, BoundingBox)>,
    anchor_y: f32,
}

impl Line<'_> {
    fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(self.words.iter().map(|(_, b)| b))
    }
}

impl ProximityGrouper {
    /// Creates a grouper with the given configuration.
    pub fn new(config: ProximityConfig) -> Self {
        Self { config }
    }

    fn lines<'a>(&self, words: &'a [TextRegion]) -> Vec<Line<'a>> {
        let mut placed: Vec<(&TextRegion, BoundingBox)> = words
            .iter()
            .filter_map(|w| w.bbox().map(|b| (w, *b)))
            .collect();
        placed.sort_by(|(_, a), (_, b)| a.center().y.total_cmp(&b.center().y));

        let mut lines: Vec<Line<'a>> = Vec::new();
        for (word, bbox) in placed {
            let cy = bbox.center().y;
            match lines.last_mut() {
                Some(line) if (cy - line.anchor_y).abs() < self.config.same_line_y_tolerance => {
                    line.words.push((word, bbox));
                }
                _ => lines.push(Line {
                    words: vec![(word, bbox)],
                    anchor_y: cy,
                }),
            }
        }
        for line in &mut lines {
            line.words
                .sort_by(|(_, a), (_, b)| a.x1.total_cmp(&b.x1));
        }
        lines
    }

    fn continues_block(&self, previous: &BoundingBox, next: &BoundingBox) -> bool {
        let gap = next.y1 - previous.y2;
        let limit = previous.height().max(next.height()) * self.config.line_gap_ratio;
        let horizontal_overlap = previous.x2.min(next.x2) - previous.x1.max(next.x1);
        gap <= limit && horizontal_overlap > 0.0
    }
}

impl WordGrouper for ProximityGrouper {
    fn group(&self, words: &[TextRegion]) -> Vec<TextRegion> {
        let mut blocks: Vec<(BoundingBox, Vec<&TextRegion>)> = Vec::new();
        for line in self.lines(words) {
            let Some(line_box) = line.bbox() else {
                continue;
            };
            let line_words = line.words.iter().map(|(w, _)| *w);
            match blocks.last_mut() {
                Some((block_box, members)) if self.continues_block(block_box, &line_box) => {
                    *block_box = block_box.union(&line_box);
                    members.extend(line_words);
                }
                _ => blocks.push((line_box, line_words.collect())),
            }
        }

        blocks
            .into_iter()
            .filter_map(|(bbox, members)| {
                let provenance = members.first()?.provenance;
                let text = members
                    .iter()
                    .filter_map(|w| w.text.as_deref())
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .join(" ");
                Some(TextRegion {
                    bbox: Some(bbox),
                    text: (!text.is_empty()).then_some(text),
                    provenance,
                })
            })
            .collect()
    }
}
