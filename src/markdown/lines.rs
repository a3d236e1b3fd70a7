//! Line-based markdown classification.
//!
//! Every line is matched against a fixed set of prefixes, first match wins:
//! `# ` title, `## ` heading, `### ` subheading, blank lines are dropped, `- `/`* ` bullets,
//! everything else is a paragraph.

use log::debug;

use crate::model::RenderBlock;
use crate::richtext::parse_inline;

/// Classifies a single line; `None` for lines that produce no block.
pub fn classify_line(line: &str) -> Option<RenderBlock> {
    let block = if let Some(text) = line.strip_prefix("# ") {
        RenderBlock::Title(parse_inline(text.trim()))
    } else if let Some(text) = line.strip_prefix("## ") {
        RenderBlock::Heading(parse_inline(text.trim()))
    } else if let Some(text) = line.strip_prefix("### ") {
        RenderBlock::SubHeading(parse_inline(text.trim()))
    } else if line.trim().is_empty() {
        return None;
    } else if let Some(text) = bullet_content(line.trim()) {
        RenderBlock::bullet(0, parse_inline(text))
    } else {
        RenderBlock::Paragraph(parse_inline(line.trim_end()))
    };
    Some(block)
}

fn bullet_content(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
}

/// Converts a whole document line by line.
pub fn to_blocks(markdown: &str) -> Vec<RenderBlock> {
    markdown
        .lines()
        .filter_map(|line| {
            let block = classify_line(line);
            if let Some(block) = &block {
                debug!("{:?} <- {:?}", block.kind(), line);
            }
            block
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;
    use crate::model::BULLET_PREFIX;

    #[test]
    fn headings_are_classified_by_prefix() {
        let title = classify_line("# Title").expect("title block");
        assert_eq!(title.kind(), BlockKind::Title);
        assert_eq!(title.text(), "Title");

        let heading = classify_line("## Section").expect("heading block");
        assert_eq!(heading.kind(), BlockKind::Heading);
        assert_eq!(heading.text(), "Section");

        let sub = classify_line("### Detail").expect("subheading block");
        assert_eq!(sub.kind(), BlockKind::SubHeading);
        assert_eq!(sub.text(), "Detail");
    }

    #[test]
    fn whitespace_lines_produce_no_block() {
        assert!(classify_line("").is_none());
        assert!(classify_line("   \t ").is_none());
        assert!(to_blocks("\n  \n\t\n").is_empty());
    }

    #[test]
    fn bullets_are_normalized() {
        let block = classify_line("- item one").expect("bullet block");
        assert_eq!(block.kind(), BlockKind::BulletItem);
        assert!(block.text().starts_with(BULLET_PREFIX));
        assert_eq!(block.text(), "  - item one");

        let star = classify_line("   * starred").expect("bullet block");
        assert_eq!(star.text(), "  - starred");
    }

    #[test]
    fn deeper_headings_and_other_lines_are_paragraphs() {
        let block = classify_line("#### Too deep").expect("paragraph block");
        assert_eq!(block.kind(), BlockKind::Paragraph);
        assert_eq!(block.text(), "#### Too deep");

        let hashtag = classify_line("#hashtag").expect("paragraph block");
        assert_eq!(hashtag.kind(), BlockKind::Paragraph);
    }

    #[test]
    fn inline_emphasis_is_interpreted() {
        let block = classify_line("**Key point**: details").expect("paragraph block");
        assert_eq!(block.text(), "Key point: details");
        assert!(block.spans()[0].is_bold());
        assert!(!block.spans()[1].is_bold());
    }

    #[test]
    fn document_order_is_preserved() {
        let blocks = to_blocks("# Report\n\nIntro text\n## Findings\n- A\n* B\n");
        let kinds: Vec<_> = blocks.iter().map(RenderBlock::kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Title,
                BlockKind::Paragraph,
                BlockKind::Heading,
                BlockKind::BulletItem,
                BlockKind::BulletItem,
            ]
        );
    }
}
