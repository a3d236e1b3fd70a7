//! Markdown report to PDF rendering.
//!
//! [`ReportRenderer`] resolves its font once, converts markdown into [`RenderBlock`]s with the
//! configured [`crate::markdown::MarkdownStrategy`] and hands every block to a [`BlockSink`].
//! A block that cannot be emitted or laid out is skipped with a warning; only failures that
//! affect the whole document abort a render call.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use genpdf::elements::{Break, LinearLayout};
use genpdf::style::Style;
use genpdf::{Alignment, Element, Margins};
use log::{debug, info, warn};

#[cfg(feature = "hyphenation")]
use hyphenation::Load;

use crate::builder::{DocumentBuilder, PageTracker};
use crate::config::{ReportConfig, Typography};
use crate::elements::{
    mm_from_f64, Guarded, OutlineLog, PageMarker, ReportTable, SkipLog, TextBlock,
};
use crate::error::{BlockRenderError, RenderError, SkippedBlock};
use crate::fonts::{ActiveFont, FontResolver};
use crate::model::{BlockKind, FontWeight, RenderBlock, RenderSummary};
use crate::richtext::Span;

const TABLE_SPACING_LINES: f64 = 0.5;

/// Receives converted blocks in document order.
pub trait BlockSink {
    /// Places one block; an error skips the block and the render call continues.
    fn emit(&mut self, index: usize, block: &RenderBlock) -> Result<(), BlockRenderError>;

    /// Called once after the last block.
    fn finish(&mut self) {}
}

/// Feeds `blocks` into `sink`, skipping and logging every block the sink rejects.
pub fn emit_blocks<S>(blocks: &[RenderBlock], sink: &mut S) -> RenderSummary
where
    S: BlockSink + ?Sized,
{
    let mut summary = RenderSummary::default();
    for (index, block) in blocks.iter().enumerate() {
        match sink.emit(index, block) {
            Ok(()) => {
                debug!("emitted {} block {}", block.kind(), index);
                summary.record_rendered(index, block);
            }
            Err(reason) => {
                let text = block.text();
                warn!("Skipping line due to rendering error: {:?} ({})", text, reason);
                summary.record_skipped(SkippedBlock {
                    index,
                    kind: block.kind(),
                    text,
                    reason,
                });
            }
        }
    }
    sink.finish();
    summary
}

struct PendingTable {
    members: Vec<(usize, BlockKind, String)>,
    table: ReportTable,
}

/// Sink that turns blocks into genpdf elements of one document.
struct PdfSink<'a> {
    document: genpdf::Document,
    font: &'a ActiveFont,
    typography: Typography,
    tracker: PageTracker,
    skipped: SkipLog,
    outline: OutlineLog,
    table: Option<PendingTable>,
}

impl<'a> PdfSink<'a> {
    fn new(
        document: genpdf::Document,
        font: &'a ActiveFont,
        typography: Typography,
        tracker: PageTracker,
    ) -> Self {
        Self {
            document,
            font,
            typography,
            tracker,
            skipped: Rc::new(RefCell::new(Vec::new())),
            outline: Rc::new(RefCell::new(Vec::new())),
            table: None,
        }
    }

    fn text(spans: &[Span], base: Style) -> TextBlock {
        TextBlock::new(spans.to_vec(), base)
    }

    /// Wraps heading text so the outline records the page its first line lands on.
    fn marked(&self, block: &RenderBlock, text: TextBlock) -> PageMarker {
        PageMarker::new(
            Box::new(text),
            block.text(),
            block.kind(),
            self.tracker.clone(),
            Rc::clone(&self.outline),
        )
    }

    fn heading(&self, block: &RenderBlock, spans: &[Span], base: Style) -> LinearLayout {
        let mut layout = LinearLayout::vertical();
        layout.push(Break::new(self.typography.heading_spacing));
        layout.push(self.marked(block, Self::text(spans, base)));
        layout
    }

    fn push(&mut self, index: usize, block: &RenderBlock, element: impl Element + 'static) {
        self.document.push(Guarded::new(
            index,
            block.kind(),
            block.text(),
            Box::new(element),
            Rc::clone(&self.skipped),
        ));
    }

    fn flush_table(&mut self) {
        let Some(pending) = self.table.take() else {
            return;
        };
        let mut layout = LinearLayout::vertical();
        layout.push(Break::new(TABLE_SPACING_LINES));
        layout.push(pending.table);
        self.document.push(Guarded::covering(
            pending.members,
            Box::new(layout),
            Rc::clone(&self.skipped),
        ));
    }

    fn into_parts(mut self) -> (genpdf::Document, SkipLog, OutlineLog) {
        self.flush_table();
        (self.document, self.skipped, self.outline)
    }
}

impl BlockSink for PdfSink<'_> {
    fn emit(&mut self, index: usize, block: &RenderBlock) -> Result<(), BlockRenderError> {
        if let Some(character) = self.font.unsupported_char(&block.text()) {
            return Err(BlockRenderError::UnsupportedCharacter { character });
        }

        if !matches!(block, RenderBlock::TableRow(_)) {
            self.flush_table();
        }

        let typography = self.typography;
        let mut base = Style::new();
        if block.weight() == FontWeight::Bold {
            base.set_bold();
        }

        match block {
            RenderBlock::Title(spans) => {
                let text = Self::text(spans, base.with_font_size(typography.title_size))
                    .aligned(Alignment::Center);
                let title = self.marked(block, text).padded(Margins::trbl(
                    mm_from_f64(0.0),
                    mm_from_f64(0.0),
                    mm_from_f64(typography.title_spacing_mm),
                    mm_from_f64(0.0),
                ));
                self.push(index, block, title);
            }
            RenderBlock::Heading(spans) => {
                let base = base.with_font_size(typography.heading_size);
                let heading = self.heading(block, spans, base);
                self.push(index, block, heading);
            }
            RenderBlock::SubHeading(spans) => {
                let base = base.with_font_size(typography.subheading_size);
                let heading = self.heading(block, spans, base);
                self.push(index, block, heading);
            }
            RenderBlock::Paragraph(spans) => {
                self.push(index, block, Self::text(spans, base));
            }
            RenderBlock::BulletItem { depth, spans } => {
                let indent = *depth as f64 * typography.list_indent_mm;
                let item = Self::text(spans, base).padded(Margins::trbl(
                    mm_from_f64(0.0),
                    mm_from_f64(0.0),
                    mm_from_f64(0.0),
                    mm_from_f64(indent),
                ));
                self.push(index, block, item);
            }
            RenderBlock::TableRow(row) => {
                let tracker = self.tracker.clone();
                let pending = self.table.get_or_insert_with(|| PendingTable {
                    members: Vec::new(),
                    table: ReportTable::new(typography.table_size, tracker),
                });
                pending.members.push((index, block.kind(), block.text()));
                pending.table.push_row(row.clone());
            }
            RenderBlock::Blank => {
                self.push(index, block, Break::new(1.0));
            }
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.flush_table();
    }
}

/// Renders markdown reports with a font resolved once at construction.
pub struct ReportRenderer {
    config: ReportConfig,
    font: ActiveFont,
    #[cfg(feature = "hyphenation")]
    hyphenation: Option<(hyphenation::Language, PathBuf)>,
}

impl ReportRenderer {
    /// Resolves the font described by `config` and creates the renderer.
    pub fn new(config: ReportConfig) -> Self {
        let font = FontResolver::from_config(&config).resolve().clone();
        Self::with_font(config, font)
    }

    /// Creates a renderer around an already resolved font.
    pub fn with_font(config: ReportConfig, font: ActiveFont) -> Self {
        Self {
            config,
            font,
            #[cfg(feature = "hyphenation")]
            hyphenation: None,
        }
    }

    /// Enables hyphenation with the dictionary stored at `dictionary`.
    #[cfg(feature = "hyphenation")]
    pub fn with_hyphenation(
        mut self,
        language: hyphenation::Language,
        dictionary: impl Into<PathBuf>,
    ) -> Self {
        self.hyphenation = Some((language, dictionary.into()));
        self
    }

    /// The font every render call uses.
    pub fn active_font(&self) -> &ActiveFont {
        &self.font
    }

    /// The configuration the renderer was created with.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    fn document_builder(&self, tracker: PageTracker) -> DocumentBuilder {
        let builder = DocumentBuilder::from_config(&self.config).with_tracker(tracker);

        #[cfg(feature = "hyphenation")]
        if let Some((language, path)) = &self.hyphenation {
            match hyphenation::Standard::from_path(*language, path) {
                Ok(hyphenator) => return builder.with_hyphenator(hyphenator),
                Err(err) => warn!(
                    "hyphenation dictionary {} not loaded: {}",
                    path.display(),
                    err
                ),
            }
        }

        builder
    }

    /// Renders `markdown` into PDF bytes.
    pub fn render_to_bytes(
        &self,
        markdown: &str,
    ) -> Result<(Vec<u8>, RenderSummary), RenderError> {
        let family = self
            .font
            .font_family()
            .cloned()
            .ok_or(RenderError::FontUnavailable)?;

        let blocks = self.config.strategy().to_blocks(markdown);
        debug!(
            "converted markdown into {} blocks ({} strategy)",
            blocks.len(),
            self.config.strategy()
        );

        let tracker = PageTracker::new();
        let document = self.document_builder(tracker.clone()).build(family);
        let typography = *self.config.typography();
        let mut sink = PdfSink::new(document, &self.font, typography, tracker.clone());
        let mut summary = emit_blocks(&blocks, &mut sink);
        let (document, skipped, outline) = sink.into_parts();

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;

        for block in skipped.borrow_mut().drain(..) {
            summary.record_skipped(block);
        }
        summary.set_outline(outline.take());
        summary.set_pages(tracker.page());

        #[cfg(feature = "bookmarks")]
        let bytes = crate::bookmarks::apply_outline(&bytes, summary.outline())?;

        Ok((bytes, summary))
    }

    /// Renders `markdown` and writes the PDF to `output`, creating missing parent directories.
    pub fn render(&self, markdown: &str, output: &Path) -> Result<RenderSummary, RenderError> {
        let (bytes, summary) = self.render_to_bytes(markdown)?;

        let write_error = |source| RenderError::DocumentWrite {
            path: PathBuf::from(output),
            source,
        };
        if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(output, bytes).map_err(write_error)?;

        info!("PDF saved to {}", output.display());
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontCandidate;
    use crate::model::BlockKind;

    #[derive(Default)]
    struct RecordingSink {
        emitted: Vec<String>,
        finished: bool,
    }

    impl BlockSink for RecordingSink {
        fn emit(&mut self, _index: usize, block: &RenderBlock) -> Result<(), BlockRenderError> {
            let text = block.text();
            if text.contains("boom") {
                return Err(BlockRenderError::Layout("exploded".into()));
            }
            self.emitted.push(text);
            Ok(())
        }

        fn finish(&mut self) {
            self.finished = true;
        }
    }

    fn paragraph(text: &str) -> RenderBlock {
        RenderBlock::Paragraph(vec![Span::new(text)])
    }

    #[test]
    fn failing_blocks_are_skipped_in_order() {
        let blocks = vec![
            RenderBlock::Title(vec![Span::new("Report")]),
            paragraph("boom one"),
            paragraph("kept"),
            paragraph("boom two"),
            RenderBlock::bullet(0, vec![Span::new("last")]),
        ];
        let mut sink = RecordingSink::default();
        let summary = emit_blocks(&blocks, &mut sink);

        assert!(sink.finished);
        assert_eq!(sink.emitted, vec!["Report", "kept", "  - last"]);
        assert_eq!(summary.rendered().len(), blocks.len() - summary.skipped().len());
        assert_eq!(
            summary.kinds(),
            vec![BlockKind::Title, BlockKind::Paragraph, BlockKind::BulletItem]
        );

        let skipped: Vec<_> = summary.skipped().iter().map(|block| block.index).collect();
        assert_eq!(skipped, vec![1, 3]);
        assert_eq!(
            summary.skipped()[0].reason,
            BlockRenderError::Layout("exploded".into())
        );
    }

    #[test]
    fn missing_font_data_is_fatal() {
        let config = ReportConfig::new()
            .with_font_candidates(vec![FontCandidate::regular_only("/__missing__/a.ttf")])
            .with_fallback_metrics(Vec::new());
        let renderer = ReportRenderer::new(config);
        assert!(!renderer.active_font().is_loaded());

        let err = renderer.render_to_bytes("# Report\n").unwrap_err();
        assert!(matches!(err, RenderError::FontUnavailable));
    }
}
