//! Character coverage of the PDF built-in fonts.
//!
//! Built-in Type1 fonts are referenced with WinAnsiEncoding, so only characters that exist in
//! Windows-1252 can be drawn with them.

/// The printable characters Windows-1252 maps into the 0x80..=0x9F range.
const WINANSI_EXTRAS: &[char] = &[
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•',
    '–', '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// Returns whether `c` can be encoded for a built-in font.
pub fn is_winansi(c: char) -> bool {
    c.is_ascii() || ('\u{A0}'..='\u{FF}').contains(&c) || WINANSI_EXTRAS.contains(&c)
}

/// Returns the first character of `text` that a built-in font cannot encode.
pub fn first_unsupported(text: &str) -> Option<char> {
    text.chars().find(|c| !is_winansi(*c))
}
