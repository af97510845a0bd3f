//! Page and document composition.
//!
//! [`ReconcilePipeline`] runs the stages for one page in a fixed order:
//!
//! 1. Collect elements for the resolved strategy (layout detection merged with
//!    native text and OCR for `HiRes`, regrouped OCR for `OcrOnly`, native text
//!    for `Fast`).
//! 2. Remove table fragments and collapse duplicate images.
//! 3. Reconstruct reading order.
//! 4. Infer table structure, when requested.
//! 5. Assign element ids and the heading hierarchy.
//!
//! Pages share no mutable state, so a document's pages are processed in
//! parallel with rayon.

use crate::core::config::{ConfigValidator, OcrMode, ReconcileConfig};
use crate::core::errors::{CapabilityKind, LayoutError, LayoutResult};
use crate::core::traits::{Capabilities, HasBBox, HasText, OcrEngine, WordGrouper};
use crate::domain::{
    Document, ElementCategory, ElementId, LayoutElement, Page, PageImageInfo, TextRegion,
    is_font_encoding_artifact,
};
use crate::pipeline::grouping::{ProximityConfig, ProximityGrouper};
use crate::pipeline::merge::{
    MergeOptions, dedupe_image_elements, merge_regions, remove_table_fragments,
};
use crate::pipeline::regroup::ocr_paragraph_regions;
use crate::pipeline::strategy::{PageHints, RequestedStrategy, Resolution, Strategy, resolve};
use crate::processors::{
    CoordinateSpace, XyCutOptions, apply_order, extract_table_tokens, reading_order,
};
use crate::utils::crop_padded;
use image::RgbImage;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Input for one page.
#[derive(Debug, Clone)]
pub struct PageInput<'a> {
    /// 1-based page number.
    pub number: usize,
    /// The rendered page image.
    pub image: &'a RgbImage,
    /// Rendering resolution of `image`.
    pub dpi: f32,
    /// Regions from the page's native text layer, in PDF points.
    pub native_text: Vec<TextRegion>,
}

impl<'a> PageInput<'a> {
    /// Creates a page input without native text.
    pub fn new(number: usize, image: &'a RgbImage, dpi: f32) -> Self {
        Self {
            number,
            image,
            dpi,
            native_text: Vec::new(),
        }
    }

    /// Attaches native text regions measured in PDF points.
    pub fn with_native_text(mut self, regions: Vec<TextRegion>) -> Self {
        self.native_text = regions;
        self
    }

    /// Image metadata for the page.
    pub fn image_info(&self) -> PageImageInfo {
        PageImageInfo::new(self.image.width(), self.image.height(), self.dpi)
    }

    /// Native text rescaled from PDF points into page-pixel space.
    pub fn native_text_in_pixels(&self) -> Vec<TextRegion> {
        let info = self.image_info();
        rescale_regions(&self.native_text, &info.points_space(), &info.coordinate_space())
    }
}

/// Input for a whole document.
#[derive(Debug, Clone)]
pub struct DocumentInput<'a> {
    /// Pages in document order.
    pub pages: Vec<PageInput<'a>>,
    /// The source is a raster image rather than a PDF.
    pub is_image: bool,
    /// The source has an extractable native text layer.
    pub pdf_text_extractable: bool,
}

/// Result of processing a document.
#[derive(Debug)]
pub struct DocumentOutcome {
    /// How the strategy was resolved.
    pub resolution: Resolution,
    /// One result per input page, in document order.
    pub pages: Vec<LayoutResult<Page>>,
}

impl DocumentOutcome {
    /// Builds a document from the pages that succeeded.
    ///
    /// Failed pages are logged and skipped.
    pub fn into_document(self) -> Document {
        let pages = self
            .pages
            .into_iter()
            .enumerate()
            .filter_map(|(index, result)| match result {
                Ok(page) => Some(page),
                Err(e) => {
                    warn!(page = index + 1, error = %e, "dropping failed page");
                    None
                }
            })
            .collect();
        Document::new(pages)
    }
}

/// Rescales every region's box from one coordinate space into another.
///
/// Regions without geometry are passed through unchanged. An invalid source
/// or target space leaves all regions unchanged.
pub fn rescale_regions(
    regions: &[TextRegion],
    from: &CoordinateSpace,
    to: &CoordinateSpace,
) -> Vec<TextRegion> {
    if !from.is_valid() || !to.is_valid() {
        return regions.to_vec();
    }
    regions
        .iter()
        .map(|r| TextRegion {
            bbox: r.bbox.map(|b| b.convert(from, to)),
            ..r.clone()
        })
        .collect()
}

/// Sets element ids from position and links each element to its heading.
///
/// A `Title` is parented to the nearest preceding `Title` of smaller depth;
/// any other element is parented to the nearest preceding `Title`.
pub fn assign_hierarchy(elements: &mut [LayoutElement], page_number: usize) {
    let mut headings: Vec<(usize, ElementId)> = Vec::new();
    for (position, element) in elements.iter_mut().enumerate() {
        let id = ElementId::for_position(page_number, position);
        element.id = Some(id.clone());
        match element.heading_depth() {
            Some(depth) => {
                while headings.last().is_some_and(|(d, _)| *d >= depth) {
                    headings.pop();
                }
                element.parent_id = headings.last().map(|(_, id)| id.clone());
                headings.push((depth, id));
            }
            None => {
                element.parent_id = headings.last().map(|(_, id)| id.clone());
            }
        }
    }
}

/// The reconciliation pipeline.
pub struct ReconcilePipeline<'a> {
    config: ReconcileConfig,
    capabilities: Capabilities<'a>,
    requested: RequestedStrategy,
    default_grouper: ProximityGrouper,
}

impl<'a> ReconcilePipeline<'a> {
    /// Creates a pipeline after validating `config`.
    pub fn new(config: ReconcileConfig, capabilities: Capabilities<'a>) -> LayoutResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            capabilities,
            requested: RequestedStrategy::Auto,
            default_grouper: ProximityGrouper::new(ProximityConfig::default()),
        })
    }

    /// Sets the strategy to request.
    pub fn with_strategy(mut self, requested: RequestedStrategy) -> Self {
        self.requested = requested;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Resolves the strategy for a document.
    pub fn resolve_strategy(
        &self,
        is_image: bool,
        pdf_text_extractable: bool,
    ) -> LayoutResult<Resolution> {
        resolve(
            self.requested,
            is_image,
            self.capabilities.capability_set(pdf_text_extractable),
            PageHints::from(&self.config),
        )
    }

    /// Processes every page of a document in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NoViableStrategy`] when nothing can process the
    /// document. Per-page failures are reported inside the outcome.
    pub fn process_document(&self, document: &DocumentInput<'_>) -> LayoutResult<DocumentOutcome> {
        let resolution = self.resolve_strategy(document.is_image, document.pdf_text_extractable)?;
        let strategy = resolution.strategy;
        info!(
            pages = document.pages.len(),
            strategy = %strategy,
            "processing document"
        );

        let pages: Vec<LayoutResult<Page>> = document
            .pages
            .par_iter()
            .map(|page| self.process_page(strategy, page))
            .collect();

        let failed = pages.iter().filter(|p| p.is_err()).count();
        if failed > 0 {
            warn!(failed, "some pages failed");
        }
        Ok(DocumentOutcome { resolution, pages })
    }

    /// Processes one page with an already resolved strategy.
    pub fn process_page(&self, strategy: Strategy, input: &PageInput<'_>) -> LayoutResult<Page> {
        let start_time = Instant::now();
        let merge_options = MergeOptions::from(&self.config);

        let mut elements = match strategy {
            Strategy::HiRes => self.hi_res_elements(input, &merge_options)?,
            Strategy::OcrOnly => self.ocr_only_elements(input)?,
            Strategy::Fast => self.fast_elements(input),
        };

        elements = remove_table_fragments(elements, self.config.subregion_threshold);
        elements = dedupe_image_elements(elements, self.config.duplicate_bbox_tolerance);

        let order = reading_order(
            &elements,
            self.config.reading_order_mode,
            &XyCutOptions::from(&self.config),
        );
        elements = apply_order(elements, &order);

        if self.config.infer_table_structure {
            self.infer_tables(input, &mut elements)?;
        }

        assign_hierarchy(&mut elements, input.number);

        debug!(
            page = input.number,
            strategy = %strategy,
            elements = elements.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "page processed"
        );
        Ok(Page::new(input.number, elements, input.image_info()))
    }

    fn grouper(&self) -> &dyn WordGrouper {
        match self.capabilities.word_grouper {
            Some(grouper) => grouper,
            None => &self.default_grouper,
        }
    }

    fn hi_res_elements(
        &self,
        input: &PageInput<'_>,
        merge_options: &MergeOptions,
    ) -> LayoutResult<Vec<LayoutElement>> {
        let model = self
            .capabilities
            .layout_model
            .ok_or(LayoutError::NoViableStrategy)?;
        let detected = model.detect(input.image).map_err(|e| {
            LayoutError::capability_boxed(
                CapabilityKind::LayoutModel,
                format!("page {}", input.number),
                e,
            )
        })?;
        debug!(page = input.number, detected = detected.len(), "layout detected");

        let mut elements = merge_regions(detected, &input.native_text_in_pixels(), merge_options);

        if let Some(ocr) = self.capabilities.ocr {
            elements = match self.config.ocr_mode {
                OcrMode::FullPage => {
                    let regions = ocr_paragraph_regions(input.image, ocr, self.grouper())?;
                    merge_regions(elements, &regions, merge_options)
                }
                OcrMode::IndividualBlocks => self.ocr_each_element(input, elements, ocr)?,
            };
        }
        Ok(elements)
    }

    fn ocr_each_element(
        &self,
        input: &PageInput<'_>,
        mut elements: Vec<LayoutElement>,
        ocr: &dyn OcrEngine,
    ) -> LayoutResult<Vec<LayoutElement>> {
        for element in elements.iter_mut() {
            if element.category.is_non_text() {
                continue;
            }
            let has_text = !element.is_blank()
                && !element.text().is_some_and(is_font_encoding_artifact);
            if has_text {
                continue;
            }
            let Some(bbox) = element.bbox().copied() else {
                continue;
            };
            let (crop, _) = match crop_padded(input.image, &bbox, self.config.element_crop_padding)
            {
                Ok(crop) => crop,
                Err(e) => {
                    debug!(page = input.number, error = %e, "skipping element OCR");
                    continue;
                }
            };
            let text = ocr.text(&crop).map_err(|e| {
                LayoutError::capability_boxed(
                    CapabilityKind::Ocr,
                    format!("element crop on page {}", input.number),
                    e,
                )
            })?;
            let text = text.trim();
            if !text.is_empty() {
                element.set_text(Some(text.to_string()));
            }
        }
        Ok(elements)
    }

    fn ocr_only_elements(&self, input: &PageInput<'_>) -> LayoutResult<Vec<LayoutElement>> {
        let ocr = self.capabilities.ocr.ok_or(LayoutError::NoViableStrategy)?;
        let regions = ocr_paragraph_regions(input.image, ocr, self.grouper())?;
        Ok(regions.into_iter().map(LayoutElement::from).collect())
    }

    fn fast_elements(&self, input: &PageInput<'_>) -> Vec<LayoutElement> {
        input
            .native_text_in_pixels()
            .into_iter()
            .filter(|r| !r.is_blank())
            .map(LayoutElement::from)
            .collect()
    }

    fn infer_tables(
        &self,
        input: &PageInput<'_>,
        elements: &mut [LayoutElement],
    ) -> LayoutResult<()> {
        let (Some(model), Some(ocr)) = (self.capabilities.table_model, self.capabilities.ocr)
        else {
            debug!(
                page = input.number,
                "table structure requested without a table model and OCR engine"
            );
            return Ok(());
        };

        for (index, element) in elements.iter_mut().enumerate() {
            if element.category != ElementCategory::Table {
                continue;
            }
            let Some(bbox) = element.bbox().copied() else {
                continue;
            };
            let table = match extract_table_tokens(
                input.image,
                &bbox,
                self.config.table_crop_padding,
                ocr,
            ) {
                Ok(table) => table,
                Err(LayoutError::ImageProcess(e)) => {
                    debug!(page = input.number, table = index, error = %e, "skipping table");
                    continue;
                }
                Err(e) => return Err(e),
            };
            let html = model.predict(&table.image, &table.tokens).map_err(|e| {
                LayoutError::capability_boxed(
                    CapabilityKind::TableModel,
                    format!("table {index} on page {}", input.number),
                    e,
                )
            })?;
            element.text_as_html = Some(html);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::CapabilityError;
    use crate::core::traits::{HasProvenance, LayoutDetector, TableStructureModel};
    use crate::domain::Provenance;
    use crate::processors::{BoundingBox, ReadingOrderMode, TableToken};
    use std::sync::Mutex;

    fn bbox(x1: f32, y1: f32, x2: f32, y2: f32) -> BoundingBox {
        BoundingBox::from_coords(x1, y1, x2, y2)
    }

    struct FakeLayout(Vec<LayoutElement>);

    impl LayoutDetector for FakeLayout {
        fn detect(&self, _page_image: &RgbImage) -> Result<Vec<LayoutElement>, CapabilityError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenLayout;

    impl LayoutDetector for BrokenLayout {
        fn detect(&self, _page_image: &RgbImage) -> Result<Vec<LayoutElement>, CapabilityError> {
            Err("model crashed".into())
        }
    }

    struct FakeOcr {
        words: Vec<TextRegion>,
        text: String,
        paragraphs: bool,
    }

    impl OcrEngine for FakeOcr {
        fn layout(&self, _image: &RgbImage) -> Result<Vec<TextRegion>, CapabilityError> {
            Ok(self.words.clone())
        }

        fn text(&self, _image: &RgbImage) -> Result<String, CapabilityError> {
            Ok(self.text.clone())
        }

        fn supports_paragraph_text(&self) -> bool {
            self.paragraphs
        }
    }

    struct FakeTableModel {
        seen_tokens: Mutex<Vec<usize>>,
    }

    impl TableStructureModel for FakeTableModel {
        fn predict(&self, _crop: &RgbImage, tokens: &[TableToken]) -> Result<String, CapabilityError> {
            if let Ok(mut seen) = self.seen_tokens.lock() {
                seen.push(tokens.len());
            }
            let cells: String = tokens.iter().map(|t| format!("<td>{}</td>", t.text)).collect();
            Ok(format!("<table><tr>{cells}</tr></table>"))
        }
    }

    fn word(x1: f32, y1: f32, x2: f32, y2: f32, text: &str) -> TextRegion {
        TextRegion::with_text(bbox(x1, y1, x2, y2), text, Provenance::OcrPrimary)
    }

    fn detected(b: BoundingBox, category: ElementCategory) -> LayoutElement {
        LayoutElement::from_bbox(b, category, Provenance::LayoutModel)
    }

    #[test]
    fn test_assign_hierarchy() {
        let mut elements = vec![
            detected(bbox(0.0, 0.0, 1.0, 1.0), ElementCategory::Title).with_text("1 Intro"),
            detected(bbox(0.0, 0.0, 1.0, 1.0), ElementCategory::NarrativeText),
            detected(bbox(0.0, 0.0, 1.0, 1.0), ElementCategory::Title).with_text("1.1 Scope"),
            detected(bbox(0.0, 0.0, 1.0, 1.0), ElementCategory::NarrativeText),
            detected(bbox(0.0, 0.0, 1.0, 1.0), ElementCategory::Title).with_text("2 Method"),
        ];
        assign_hierarchy(&mut elements, 3);

        let ids: Vec<String> = elements
            .iter()
            .map(|e| e.id.as_ref().map(|id| id.to_string()).unwrap_or_default())
            .collect();
        assert_eq!(ids[0], ElementId::for_position(3, 0).to_string());
        assert_eq!(elements[0].parent_id, None);
        assert_eq!(elements[1].parent_id.as_ref().map(|i| i.to_string()), Some(ids[0].clone()));
        assert_eq!(elements[2].parent_id.as_ref().map(|i| i.to_string()), Some(ids[0].clone()));
        assert_eq!(elements[3].parent_id.as_ref().map(|i| i.to_string()), Some(ids[2].clone()));
        assert_eq!(elements[4].parent_id, None);
    }

    #[test]
    fn test_rescale_native_text_from_points() {
        let image = RgbImage::new(200, 100);
        let input = PageInput::new(1, &image, 144.0).with_native_text(vec![TextRegion::with_text(
            bbox(10.0, 10.0, 20.0, 20.0),
            "pt",
            Provenance::NativeText,
        )]);
        let scaled = input.native_text_in_pixels();
        assert_eq!(scaled[0].bbox, Some(bbox(20.0, 20.0, 40.0, 40.0)));
    }

    #[test]
    fn test_hi_res_merges_native_text_and_orders() {
        let image = RgbImage::new(400, 400);
        let layout = FakeLayout(vec![
            detected(bbox(0.0, 200.0, 300.0, 260.0), ElementCategory::NarrativeText),
            detected(bbox(0.0, 0.0, 300.0, 60.0), ElementCategory::Title),
        ]);
        let caps = Capabilities::none().with_layout_model(&layout);
        let pipeline = ReconcilePipeline::new(ReconcileConfig::default(), caps)
            .unwrap()
            .with_strategy(RequestedStrategy::HiRes);

        // 72 dpi: points and pixels coincide.
        let input = PageInput::new(1, &image, 72.0).with_native_text(vec![
            TextRegion::with_text(bbox(10.0, 10.0, 100.0, 40.0), "Heading", Provenance::NativeText),
            TextRegion::with_text(bbox(10.0, 210.0, 200.0, 240.0), "Body text", Provenance::NativeText),
        ]);
        let resolution = pipeline.resolve_strategy(false, true).unwrap();
        assert_eq!(resolution.strategy, Strategy::HiRes);

        let page = pipeline.process_page(resolution.strategy, &input).unwrap();
        let texts: Vec<_> = page.elements.iter().filter_map(|e| e.text()).collect();
        assert_eq!(texts, vec!["Heading", "Body text"]);
        assert_eq!(page.elements[0].category, ElementCategory::Title);
        assert_eq!(page.elements[1].parent_id, page.elements[0].id);
        assert!(page.elements.iter().all(|e| e.provenance() == Provenance::LayoutModel));
    }

    #[test]
    fn test_hi_res_full_page_ocr_fills_missing_text() {
        let image = RgbImage::new(300, 300);
        let layout = FakeLayout(vec![detected(
            bbox(0.0, 0.0, 200.0, 50.0),
            ElementCategory::NarrativeText,
        )]);
        let ocr = FakeOcr {
            words: vec![
                word(10.0, 10.0, 50.0, 30.0, "scanned"),
                word(60.0, 10.0, 100.0, 30.0, "words"),
                word(10.0, 200.0, 60.0, 220.0, "stray"),
            ],
            text: "scanned words\n\nstray".to_string(),
            paragraphs: true,
        };
        let caps = Capabilities::none().with_layout_model(&layout).with_ocr(&ocr);
        let pipeline = ReconcilePipeline::new(ReconcileConfig::default(), caps).unwrap();

        let page = pipeline
            .process_page(Strategy::HiRes, &PageInput::new(1, &image, 72.0))
            .unwrap();
        let texts: Vec<_> = page.elements.iter().filter_map(|e| e.text()).collect();
        assert_eq!(texts, vec!["scanned words", "stray"]);
        assert_eq!(page.elements[1].provenance(), Provenance::OcrPrimary);
    }

    #[test]
    fn test_hi_res_individual_blocks() {
        let image = RgbImage::new(300, 300);
        let layout = FakeLayout(vec![
            detected(bbox(0.0, 0.0, 200.0, 50.0), ElementCategory::NarrativeText),
            detected(bbox(0.0, 100.0, 200.0, 150.0), ElementCategory::Image),
        ]);
        let ocr = FakeOcr {
            words: Vec::new(),
            text: "  block text \n".to_string(),
            paragraphs: true,
        };
        let config = ReconcileConfig {
            ocr_mode: OcrMode::IndividualBlocks,
            ..ReconcileConfig::default()
        };
        let caps = Capabilities::none().with_layout_model(&layout).with_ocr(&ocr);
        let pipeline = ReconcilePipeline::new(config, caps).unwrap();

        let page = pipeline
            .process_page(Strategy::HiRes, &PageInput::new(1, &image, 72.0))
            .unwrap();
        assert_eq!(page.elements[0].text(), Some("block text"));
        assert_eq!(page.elements[1].text(), None);
    }

    #[test]
    fn test_table_fragments_removed_and_html_inferred() {
        let image = RgbImage::new(300, 300);
        let layout = FakeLayout(vec![detected(
            bbox(0.0, 0.0, 100.0, 100.0),
            ElementCategory::Table,
        )]);
        let ocr = FakeOcr {
            words: vec![word(1.0, 1.0, 10.0, 10.0, "a"), word(20.0, 1.0, 30.0, 10.0, "b")],
            text: String::new(),
            paragraphs: false,
        };
        let table_model = FakeTableModel {
            seen_tokens: Mutex::new(Vec::new()),
        };
        let config = ReconcileConfig {
            infer_table_structure: true,
            ocr_mode: OcrMode::IndividualBlocks,
            ..ReconcileConfig::default()
        };
        let caps = Capabilities::none()
            .with_layout_model(&layout)
            .with_ocr(&ocr)
            .with_table_model(&table_model);
        let pipeline = ReconcilePipeline::new(config, caps).unwrap();

        let input = PageInput::new(1, &image, 72.0).with_native_text(vec![
            TextRegion::with_text(bbox(10.0, 10.0, 40.0, 20.0), "cell a", Provenance::NativeText),
            TextRegion::with_text(bbox(50.0, 60.0, 90.0, 70.0), "cell b", Provenance::NativeText),
        ]);
        let page = pipeline.process_page(Strategy::HiRes, &input).unwrap();

        assert_eq!(page.elements.len(), 1);
        assert_eq!(page.elements[0].category, ElementCategory::Table);
        assert_eq!(
            page.elements[0].text_as_html.as_deref(),
            Some("<table><tr><td>a</td><td>b</td></tr></table>")
        );
        assert_eq!(*table_model.seen_tokens.lock().unwrap(), vec![2]);
    }

    #[test]
    fn test_ocr_only_without_paragraph_text_groups_words() {
        let image = RgbImage::new(300, 300);
        let ocr = FakeOcr {
            words: vec![
                word(0.0, 100.0, 40.0, 120.0, "second"),
                word(0.0, 0.0, 40.0, 20.0, "first"),
            ],
            text: String::new(),
            paragraphs: false,
        };
        let caps = Capabilities::none().with_ocr(&ocr);
        let pipeline = ReconcilePipeline::new(ReconcileConfig::default(), caps).unwrap();
        let resolution = pipeline.resolve_strategy(true, false).unwrap();
        assert_eq!(resolution.strategy, Strategy::OcrOnly);

        let page = pipeline
            .process_page(resolution.strategy, &PageInput::new(1, &image, 72.0))
            .unwrap();
        let texts: Vec<_> = page.elements.iter().filter_map(|e| e.text()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(
            page.elements
                .iter()
                .all(|e| e.category == ElementCategory::UncategorizedText)
        );
    }

    #[test]
    fn test_fast_with_basic_order_and_missing_geometry() {
        let image = RgbImage::new(100, 100);
        let config = ReconcileConfig {
            reading_order_mode: ReadingOrderMode::Basic,
            ..ReconcileConfig::default()
        };
        let pipeline = ReconcilePipeline::new(config, Capabilities::none()).unwrap();
        let input = PageInput::new(1, &image, 72.0).with_native_text(vec![
            TextRegion::without_geometry("floating", Provenance::NativeText),
            TextRegion::with_text(bbox(0.0, 50.0, 10.0, 60.0), "lower", Provenance::NativeText),
            TextRegion::with_text(bbox(0.0, 0.0, 10.0, 10.0), "upper", Provenance::NativeText),
            TextRegion::with_text(bbox(0.0, 70.0, 10.0, 80.0), "   ", Provenance::NativeText),
        ]);
        let page = pipeline.process_page(Strategy::Fast, &input).unwrap();
        let texts: Vec<_> = page.elements.iter().filter_map(|e| e.text()).collect();
        assert_eq!(texts, vec!["upper", "lower", "floating"]);
    }

    #[test]
    fn test_process_document_no_viable_strategy() {
        let pipeline = ReconcilePipeline::new(ReconcileConfig::default(), Capabilities::none()).unwrap();
        let image = RgbImage::new(10, 10);
        let document = DocumentInput {
            pages: vec![PageInput::new(1, &image, 72.0)],
            is_image: true,
            pdf_text_extractable: false,
        };
        let err = pipeline.process_document(&document).unwrap_err();
        assert!(matches!(err, LayoutError::NoViableStrategy));
    }

    #[test]
    fn test_process_document_isolates_page_failures() {
        let image = RgbImage::new(50, 50);
        let caps = Capabilities::none().with_layout_model(&BrokenLayout);
        let pipeline = ReconcilePipeline::new(ReconcileConfig::default(), caps).unwrap();
        let document = DocumentInput {
            pages: vec![PageInput::new(1, &image, 72.0), PageInput::new(2, &image, 72.0)],
            is_image: true,
            pdf_text_extractable: false,
        };
        let outcome = pipeline.process_document(&document).unwrap();
        assert_eq!(outcome.resolution.strategy, Strategy::HiRes);
        assert_eq!(outcome.pages.len(), 2);
        assert!(outcome.pages.iter().all(|p| matches!(
            p,
            Err(LayoutError::Capability {
                capability: CapabilityKind::LayoutModel,
                ..
            })
        )));
        assert!(outcome.into_document().pages.is_empty());
    }

    #[test]
    fn test_process_document_keeps_page_order() {
        let image = RgbImage::new(100, 100);
        let pipeline = ReconcilePipeline::new(ReconcileConfig::default(), Capabilities::none())
            .unwrap()
            .with_strategy(RequestedStrategy::Fast);
        let pages: Vec<PageInput<'_>> = (1..=8)
            .map(|n| {
                PageInput::new(n, &image, 72.0).with_native_text(vec![TextRegion::with_text(
                    bbox(0.0, 0.0, 10.0, 10.0),
                    format!("page {n}"),
                    Provenance::NativeText,
                )])
            })
            .collect();
        let document = DocumentInput {
            pages,
            is_image: false,
            pdf_text_extractable: true,
        };
        let doc = pipeline.process_document(&document).unwrap().into_document();
        let numbers: Vec<usize> = doc.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, (1..=8).collect::<Vec<_>>());
        assert_eq!(doc.pages[4].text(), "page 5");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ReconcileConfig {
            subregion_threshold: 1.5,
            ..ReconcileConfig::default()
        };
        assert!(matches!(
            ReconcilePipeline::new(config, Capabilities::none()),
            Err(LayoutError::Config(_))
        ));
    }
}
