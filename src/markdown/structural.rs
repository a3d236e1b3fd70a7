//! Structural markdown conversion backed by pulldown-cmark.
//!
//! The event stream is folded into blocks in one pass.  Soft and hard line breaks inside a
//! paragraph start a new paragraph block so that reports keep the line structure they were written
//! with.

use pulldown_cmark::{Alignment, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::model::{CellAlignment, RenderBlock, TableRow, BULLET_PREFIX};
use crate::richtext::{self, Span};

/// Continuation marker for additional paragraphs inside a loose list item.
const CONTINUATION_PREFIX: &str = "    ";

#[derive(Default)]
struct TableState {
    alignments: Vec<CellAlignment>,
    cells: Vec<Vec<Span>>,
}

struct ListState {
    next_number: Option<u64>,
}

#[derive(Default)]
struct Converter {
    blocks: Vec<RenderBlock>,
    inline: Vec<Span>,
    bold: usize,
    italic: usize,
    heading: Option<HeadingLevel>,
    lists: Vec<ListState>,
    pending_marker: Option<(usize, String)>,
    table: Option<TableState>,
    code_block: bool,
}

impl Converter {
    fn push_text(&mut self, text: &str) {
        self.inline.push(
            Span::new(text)
                .with_bold(self.bold > 0)
                .with_italic(self.italic > 0),
        );
    }

    fn take_inline(&mut self) -> Vec<Span> {
        richtext::trim(std::mem::take(&mut self.inline))
    }

    fn in_list(&self) -> bool {
        !self.lists.is_empty()
    }

    fn flush_paragraph(&mut self) {
        let spans = self.take_inline();
        if !spans.is_empty() {
            self.blocks.push(RenderBlock::Paragraph(spans));
        }
    }

    fn flush_item(&mut self) {
        let spans = self.take_inline();
        match self.pending_marker.take() {
            Some((depth, marker)) => self
                .blocks
                .push(RenderBlock::list_item(depth, &marker, spans)),
            None if !spans.is_empty() => {
                let depth = self.lists.len().saturating_sub(1);
                self.blocks
                    .push(RenderBlock::list_item(depth, CONTINUATION_PREFIX, spans));
            }
            None => {}
        }
    }

    fn flush_text(&mut self) {
        if self.in_list() {
            self.flush_item();
        } else {
            self.flush_paragraph();
        }
    }

    fn line_break(&mut self) {
        if self.heading.is_some() || self.table.is_some() || self.pending_marker.is_some() {
            self.push_text(" ");
        } else {
            self.flush_text();
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_text();
                self.heading = Some(level);
            }
            Tag::List(start) => {
                if self.in_list() {
                    self.flush_item();
                } else {
                    self.flush_paragraph();
                }
                self.lists.push(ListState { next_number: start });
            }
            Tag::Item => {
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(ListState {
                        next_number: Some(number),
                    }) => {
                        let marker = format!("  {number}. ");
                        *number += 1;
                        marker
                    }
                    _ => BULLET_PREFIX.to_owned(),
                };
                self.pending_marker = Some((depth, marker));
            }
            Tag::Table(alignments) => {
                self.flush_text();
                self.table = Some(TableState {
                    alignments: alignments.into_iter().map(cell_alignment).collect(),
                    cells: Vec::new(),
                });
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.cells.clear();
                }
            }
            Tag::TableCell => self.inline.clear(),
            Tag::CodeBlock(_) => {
                self.flush_text();
                self.code_block = true;
            }
            Tag::Emphasis => self.italic += 1,
            Tag::Strong => self.bold += 1,
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                let spans = self.take_inline();
                if let Some(level) = self.heading.take() {
                    if !spans.is_empty() {
                        self.blocks.push(heading_block(level, spans));
                    }
                }
            }
            TagEnd::Paragraph => self.flush_text(),
            TagEnd::Item => self.flush_item(),
            TagEnd::List(_) => {
                self.flush_item();
                self.lists.pop();
            }
            TagEnd::TableCell => {
                let cell = self.take_inline();
                if let Some(table) = self.table.as_mut() {
                    table.cells.push(cell);
                }
            }
            TagEnd::TableHead => self.finish_row(true),
            TagEnd::TableRow => self.finish_row(false),
            TagEnd::Table => self.table = None,
            TagEnd::CodeBlock => self.code_block = false,
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            _ => {}
        }
    }

    fn finish_row(&mut self, header: bool) {
        if let Some(table) = self.table.as_mut() {
            let cells = std::mem::take(&mut table.cells);
            let row = TableRow::new(cells)
                .with_header(header)
                .with_alignments(table.alignments.clone());
            self.blocks.push(RenderBlock::TableRow(row));
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) if self.code_block => {
                for line in text.lines().filter(|line| !line.trim().is_empty()) {
                    self.blocks
                        .push(RenderBlock::Paragraph(vec![Span::new(line.trim_end())]));
                }
            }
            Event::Text(text) | Event::Code(text) => self.push_text(&text),
            Event::SoftBreak | Event::HardBreak => self.line_break(),
            Event::Rule => {
                self.flush_text();
                self.blocks.push(RenderBlock::Blank);
            }
            Event::TaskListMarker(checked) => {
                self.push_text(if checked { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<RenderBlock> {
        self.flush_text();
        self.blocks
    }
}

fn cell_alignment(alignment: Alignment) -> CellAlignment {
    match alignment {
        Alignment::Center => CellAlignment::Center,
        Alignment::Right => CellAlignment::Right,
        Alignment::Left | Alignment::None => CellAlignment::Left,
    }
}

fn heading_block(level: HeadingLevel, spans: Vec<Span>) -> RenderBlock {
    match level {
        HeadingLevel::H1 => RenderBlock::Title(spans),
        HeadingLevel::H2 => RenderBlock::Heading(spans),
        _ => RenderBlock::SubHeading(spans),
    }
}

/// Parses the whole document and converts it into layout blocks.
pub fn to_blocks(markdown: &str) -> Vec<RenderBlock> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut converter = Converter::default();
    for event in Parser::new_ext(markdown, options) {
        converter.event(event);
    }
    converter.finish()
}
