//! Layout blocks produced from a markdown report.
//!
//! A [`RenderBlock`] is the unit the renderer hands to the page layout engine.  Blocks are
//! produced transiently by the converters in [`crate::markdown`] and consumed immediately by a
//! [`crate::renderer::BlockSink`]; nothing here references genpdf so the conversion can be
//! tested without a font.

use std::fmt;

use crate::error::SkippedBlock;
use crate::richtext::{self, Span};

/// Prefix substituted for list markers. A plain hyphen keeps the line renderable with fonts that
/// lack a bullet glyph.
pub const BULLET_PREFIX: &str = "  - ";

/// Discriminant of a [`RenderBlock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Document title (`# `).
    Title,
    /// Section heading (`## `).
    Heading,
    /// Subheading (`### ` and deeper).
    SubHeading,
    /// Wrapped body text.
    Paragraph,
    /// A list entry.
    BulletItem,
    /// One row of a table.
    TableRow,
    /// Vertical separator.
    Blank,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::Heading => "heading",
            Self::SubHeading => "subheading",
            Self::Paragraph => "paragraph",
            Self::BulletItem => "bullet item",
            Self::TableRow => "table row",
            Self::Blank => "blank",
        };
        f.write_str(name)
    }
}

/// Font weight a block is drawn with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontWeight {
    /// Regular face.
    #[default]
    Regular,
    /// Bold face (aliased to regular when the resolved font has no bold file).
    Bold,
}

/// Horizontal alignment of a table column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
}

/// A table row with its cells and the alignment of every column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableRow {
    cells: Vec<Vec<Span>>,
    alignments: Vec<CellAlignment>,
    header: bool,
}

impl TableRow {
    /// Creates a body row.
    pub fn new(cells: Vec<Vec<Span>>) -> Self {
        Self {
            cells,
            ..Self::default()
        }
    }

    /// Marks the row as part of the table header.
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Sets the column alignments.
    pub fn with_alignments(mut self, alignments: Vec<CellAlignment>) -> Self {
        self.alignments = alignments;
        self
    }

    /// Returns the cells of the row.
    pub fn cells(&self) -> &[Vec<Span>] {
        &self.cells
    }

    /// Returns the alignment of the given column.
    pub fn alignment(&self, column: usize) -> CellAlignment {
        self.alignments.get(column).copied().unwrap_or_default()
    }

    /// Returns whether the row belongs to the table header.
    pub fn is_header(&self) -> bool {
        self.header
    }
}

/// A unit of layout content.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderBlock {
    /// Centered document title.
    Title(Vec<Span>),
    /// Bold section heading.
    Heading(Vec<Span>),
    /// Smaller bold subheading.
    SubHeading(Vec<Span>),
    /// Wrapped body text.
    Paragraph(Vec<Span>),
    /// List entry. The spans already start with the list marker prefix.
    BulletItem {
        /// Nesting level, zero for top-level items.
        depth: usize,
        /// Marker followed by the item content.
        spans: Vec<Span>,
    },
    /// One table row.
    TableRow(TableRow),
    /// Vertical space.
    Blank,
}

impl RenderBlock {
    /// Builds a bullet item, prefixing the content with [`BULLET_PREFIX`].
    pub fn bullet(depth: usize, content: Vec<Span>) -> Self {
        Self::list_item(depth, BULLET_PREFIX, content)
    }

    /// Builds a list item with an arbitrary marker prefix.
    pub fn list_item(depth: usize, marker: &str, content: Vec<Span>) -> Self {
        let mut spans = Vec::with_capacity(content.len() + 1);
        spans.push(Span::new(marker));
        spans.extend(content);
        Self::BulletItem { depth, spans }
    }

    /// Returns the kind of the block.
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Title(_) => BlockKind::Title,
            Self::Heading(_) => BlockKind::Heading,
            Self::SubHeading(_) => BlockKind::SubHeading,
            Self::Paragraph(_) => BlockKind::Paragraph,
            Self::BulletItem { .. } => BlockKind::BulletItem,
            Self::TableRow(_) => BlockKind::TableRow,
            Self::Blank => BlockKind::Blank,
        }
    }

    /// Returns the weight the block is drawn with.
    pub fn weight(&self) -> FontWeight {
        match self {
            Self::Title(_) | Self::Heading(_) | Self::SubHeading(_) => FontWeight::Bold,
            Self::TableRow(row) if row.is_header() => FontWeight::Bold,
            _ => FontWeight::Regular,
        }
    }

    /// Returns the inline spans of text blocks; empty for tables and blanks.
    pub fn spans(&self) -> &[Span] {
        match self {
            Self::Title(spans)
            | Self::Heading(spans)
            | Self::SubHeading(spans)
            | Self::Paragraph(spans)
            | Self::BulletItem { spans, .. } => spans,
            Self::TableRow(_) | Self::Blank => &[],
        }
    }

    /// Returns the plain text that ends up on the page.
    ///
    /// Table cells are joined with ` | `.
    pub fn text(&self) -> String {
        match self {
            Self::TableRow(row) => row
                .cells()
                .iter()
                .map(|cell| richtext::plain_text(cell))
                .collect::<Vec<_>>()
                .join(" | "),
            other => richtext::plain_text(other.spans()),
        }
    }
}

/// A block that made it into the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedBlock {
    /// Position of the block in the converted block sequence.
    pub index: usize,
    /// Kind of the block.
    pub kind: BlockKind,
    /// Plain text of the block.
    pub text: String,
}

/// A heading together with the page it was placed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Plain heading text.
    pub title: String,
    /// Kind of the heading block.
    pub kind: BlockKind,
    /// One-based page number.
    pub page: usize,
}

/// Outcome of a render call: which blocks were placed and which were skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderSummary {
    rendered: Vec<RenderedBlock>,
    skipped: Vec<SkippedBlock>,
    outline: Vec<OutlineEntry>,
    pages: usize,
}

impl RenderSummary {
    pub(crate) fn record_rendered(&mut self, index: usize, block: &RenderBlock) {
        self.rendered.push(RenderedBlock {
            index,
            kind: block.kind(),
            text: block.text(),
        });
    }

    pub(crate) fn record_skipped(&mut self, skipped: SkippedBlock) {
        self.rendered.retain(|block| block.index != skipped.index);
        self.skipped.push(skipped);
        self.skipped.sort_by_key(|block| block.index);
    }

    pub(crate) fn set_pages(&mut self, pages: usize) {
        self.pages = pages;
    }

    pub(crate) fn set_outline(&mut self, outline: Vec<OutlineEntry>) {
        self.outline = outline;
    }

    /// Blocks placed into the document, in document order.
    pub fn rendered(&self) -> &[RenderedBlock] {
        &self.rendered
    }

    /// Blocks dropped because they failed to render, in document order.
    pub fn skipped(&self) -> &[SkippedBlock] {
        &self.skipped
    }

    /// Headings with the page they landed on, in document order.
    pub fn outline(&self) -> &[OutlineEntry] {
        &self.outline
    }

    /// Number of pages in the rendered document (zero before rendering).
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Kinds of all rendered blocks, in order.
    pub fn kinds(&self) -> Vec<BlockKind> {
        self.rendered.iter().map(|block| block.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlockRenderError;

    #[test]
    fn bullet_text_starts_with_prefix() {
        let block = RenderBlock::bullet(0, vec![Span::new("item one")]);
        assert_eq!(block.kind(), BlockKind::BulletItem);
        assert_eq!(block.text(), "  - item one");
    }

    #[test]
    fn headings_are_bold_and_body_is_regular() {
        assert_eq!(RenderBlock::Title(Vec::new()).weight(), FontWeight::Bold);
        assert_eq!(RenderBlock::SubHeading(Vec::new()).weight(), FontWeight::Bold);
        assert_eq!(RenderBlock::Paragraph(Vec::new()).weight(), FontWeight::Regular);

        let header = RenderBlock::TableRow(TableRow::new(Vec::new()).with_header(true));
        assert_eq!(header.weight(), FontWeight::Bold);
    }

    #[test]
    fn table_row_text_joins_cells() {
        let row = TableRow::new(vec![vec![Span::new("a")], vec![Span::new("b").bold()]]);
        assert_eq!(RenderBlock::TableRow(row).text(), "a | b");
    }

    #[test]
    fn skipped_block_is_removed_from_rendered() {
        let mut summary = RenderSummary::default();
        let first = RenderBlock::Paragraph(vec![Span::new("one")]);
        let second = RenderBlock::Paragraph(vec![Span::new("two")]);
        summary.record_rendered(0, &first);
        summary.record_rendered(1, &second);
        summary.record_skipped(SkippedBlock {
            index: 0,
            kind: BlockKind::Paragraph,
            text: "one".into(),
            reason: BlockRenderError::Layout("boom".into()),
        });

        assert_eq!(summary.rendered().len(), 1);
        assert_eq!(summary.rendered()[0].text, "two");
        assert_eq!(summary.skipped().len(), 1);
    }
}
