//! Conversion of markdown reports into [`RenderBlock`]s.
//!
//! Two converters exist: a line classifier that only understands headings, bullets and plain
//! lines ([`lines`]), and a structural converter backed by pulldown-cmark that also handles
//! nested lists, tables and inline emphasis ([`structural`]).

pub mod lines;
pub mod structural;

use std::fmt;
use std::str::FromStr;

use crate::model::RenderBlock;

/// How markdown is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarkdownStrategy {
    /// Line-by-line prefix classification.
    Lines,
    /// Full CommonMark parse with tables.
    #[default]
    Structural,
}

impl MarkdownStrategy {
    /// Converts `markdown` into layout blocks.
    pub fn to_blocks(self, markdown: &str) -> Vec<RenderBlock> {
        match self {
            Self::Lines => lines::to_blocks(markdown),
            Self::Structural => structural::to_blocks(markdown),
        }
    }
}

impl fmt::Display for MarkdownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lines => f.write_str("lines"),
            Self::Structural => f.write_str("structural"),
        }
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownStrategy(String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown markdown strategy `{}` (expected `lines` or `structural`)",
            self.0
        )
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for MarkdownStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lines" | "line" => Ok(Self::Lines),
            "structural" | "structure" => Ok(Self::Structural),
            other => Err(UnknownStrategy(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;

    #[test]
    fn strategies_parse_from_names() {
        assert_eq!("lines".parse(), Ok(MarkdownStrategy::Lines));
        assert_eq!(" Structural ".parse(), Ok(MarkdownStrategy::Structural));
        assert!("html".parse::<MarkdownStrategy>().is_err());
    }

    #[test]
    fn both_strategies_agree_on_simple_reports() {
        let markdown = "# Report\n\n## Findings\n\n- A\n- B\n";
        let expected = vec![
            BlockKind::Title,
            BlockKind::Heading,
            BlockKind::BulletItem,
            BlockKind::BulletItem,
        ];

        for strategy in [MarkdownStrategy::Lines, MarkdownStrategy::Structural] {
            let blocks = strategy.to_blocks(markdown);
            let kinds: Vec<_> = blocks.iter().map(RenderBlock::kind).collect();
            assert_eq!(kinds, expected, "strategy {strategy}");
            assert_eq!(blocks[2].text(), "  - A");
            assert_eq!(blocks[3].text(), "  - B");
        }
    }
}
