//! Utilities for working with styled text fragments.
//!
//! The types in this module provide a light-weight representation of text "spans" that carry
//! the inline emphasis a report may use (bold and italic).  They act as an intermediary layer
//! between the markdown converters and the elements that lay out the final PDF document.

use genpdf::style::Style;

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span should be rendered in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the span should be rendered in italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Sets the bold flag and returns the updated span.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Sets the italic flag and returns the updated span.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Convenience shorthand that marks the span as bold.
    pub fn bold(self) -> Self {
        self.with_bold(true)
    }

    /// Convenience shorthand that marks the span as italic.
    pub fn italic(self) -> Self {
        self.with_italic(true)
    }

    /// Builds a [`Style`] representation for the span on top of `base`.
    pub fn style_over(&self, base: Style) -> Style {
        let mut style = base;
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }
}

/// Concatenates the text of all spans.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}

/// Merges adjacent spans that share the same style.
pub fn coalesce(spans: Vec<Span>) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        if span.text.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.bold == span.bold && last.italic == span.italic => {
                last.text.push_str(&span.text);
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// Strips leading whitespace from the first span and trailing whitespace from the last one.
pub fn trim(spans: Vec<Span>) -> Vec<Span> {
    let mut spans = coalesce(spans);
    if let Some(first) = spans.first_mut() {
        first.text = first.text.trim_start().to_owned();
    }
    if let Some(last) = spans.last_mut() {
        last.text = last.text.trim_end().to_owned();
    }
    spans.retain(|span| !span.text.is_empty());
    spans
}

/// Splits one line of markdown into styled spans.
///
/// `**` toggles bold, `*` toggles italic and text between backticks is copied verbatim.  An
/// emphasis marker opens only when text follows it and the same marker appears again later in
/// the line; it closes only right after text.  Every other asterisk, such as the one in `5 * 3`,
/// stays literal, so the function never fails.
pub fn parse_inline(input: &str) -> Vec<Span> {
    let mut scanner = Scanner::default();
    let mut previous = None;
    let mut rest = input;

    while let Some(ch) = rest.chars().next() {
        if ch == '`' {
            if let Some(end) = rest[1..].find('`') {
                scanner.flush();
                scanner.text.push_str(&rest[1..1 + end]);
                scanner.flush();
                previous = Some('`');
                rest = &rest[end + 2..];
                continue;
            }
        } else if ch == '*' {
            let emphasis = if rest.starts_with("**") {
                Emphasis::Bold
            } else {
                Emphasis::Italic
            };
            let after = &rest[emphasis.marker().len()..];
            if scanner.accepts(emphasis, previous, after) {
                scanner.toggle(emphasis);
                previous = Some('*');
                rest = after;
                continue;
            }
        }

        scanner.text.push(ch);
        previous = Some(ch);
        rest = &rest[ch.len_utf8()..];
    }

    scanner.flush();
    coalesce(scanner.spans)
}

#[derive(Clone, Copy)]
enum Emphasis {
    Bold,
    Italic,
}

impl Emphasis {
    fn marker(self) -> &'static str {
        match self {
            Emphasis::Bold => "**",
            Emphasis::Italic => "*",
        }
    }

    fn closes_later(self, after: &str) -> bool {
        match self {
            Emphasis::Bold => after.contains("**"),
            Emphasis::Italic => after.split("**").any(|part| part.contains('*')),
        }
    }
}

#[derive(Default)]
struct Scanner {
    spans: Vec<Span>,
    text: String,
    bold: bool,
    italic: bool,
}

impl Scanner {
    fn is_open(&self, emphasis: Emphasis) -> bool {
        match emphasis {
            Emphasis::Bold => self.bold,
            Emphasis::Italic => self.italic,
        }
    }

    fn accepts(&self, emphasis: Emphasis, previous: Option<char>, after: &str) -> bool {
        let touches_text = |ch: Option<char>| ch.map_or(false, |ch| !ch.is_whitespace());
        if self.is_open(emphasis) {
            touches_text(previous)
        } else {
            touches_text(after.chars().next()) && emphasis.closes_later(after)
        }
    }

    fn toggle(&mut self, emphasis: Emphasis) {
        self.flush();
        match emphasis {
            Emphasis::Bold => self.bold = !self.bold,
            Emphasis::Italic => self.italic = !self.italic,
        }
    }

    fn flush(&mut self) {
        if self.text.is_empty() {
            return;
        }
        self.spans.push(Span {
            text: std::mem::take(&mut self.text),
            bold: self.bold,
            italic: self.italic,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_style_reflects_flags() {
        let style = Span::new("Hello")
            .bold()
            .italic()
            .style_over(Style::new().with_font_size(11));
        assert!(style.is_bold());
        assert!(style.is_italic());
        assert_eq!(style.font_size(), 11);
        assert!(!Span::new("plain").style_over(Style::new()).is_bold());
    }

    #[test]
    fn plain_lines_are_one_span() {
        assert_eq!(parse_inline("Hello world"), vec![Span::new("Hello world")]);
        assert!(parse_inline("").is_empty());
    }

    #[test]
    fn emphasis_can_nest() {
        let spans = parse_inline("Agents got **much *faster***.");
        assert_eq!(
            spans,
            vec![
                Span::new("Agents got "),
                Span::new("much ").bold(),
                Span::new("faster").bold().italic(),
                Span::new("."),
            ]
        );
    }

    #[test]
    fn code_spans_are_copied_verbatim() {
        let spans = parse_inline("run `a*b*c` now");
        assert_eq!(plain_text(&spans), "run a*b*c now");
        assert!(spans.iter().all(|span| !span.is_italic()));
        assert_eq!(plain_text(&parse_inline("a ` tick")), "a ` tick");
    }

    #[test]
    fn stray_asterisks_stay_literal() {
        assert_eq!(parse_inline("5 * 3 = 15"), vec![Span::new("5 * 3 = 15")]);
        assert_eq!(parse_inline("**oops"), vec![Span::new("**oops")]);
        assert_eq!(parse_inline("a * b * c"), vec![Span::new("a * b * c")]);
        assert_eq!(
            parse_inline("**見出し** です"),
            vec![Span::new("見出し").bold(), Span::new(" です")]
        );
    }

    #[test]
    fn coalesce_merges_same_style() {
        let merged = coalesce(vec![Span::new("a"), Span::new("b"), Span::new("c").bold()]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text(), "ab");
    }
}
