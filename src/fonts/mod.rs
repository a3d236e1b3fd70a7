//! Font resolution for report rendering.
//!
//! Reports are usually Japanese, so the renderer walks an ordered list of (regular, bold) font
//! file pairs and uses the first one that loads.  When none does, it degrades to the PDF
//! built-in Helvetica faces; genpdf still needs real glyph metrics for line breaking, so those are
//! borrowed from a Latin "metrics font" found on the system.

pub mod coverage;

use std::cell::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};

use genpdf::fonts::{FontData, FontFamily};
use log::{info, warn};
use printpdf::BuiltinFont;

use crate::config::ReportConfig;
use crate::error::FontLoadError;

/// Family name reported when no candidate font could be loaded.
pub const FALLBACK_FAMILY_NAME: &str = "Helvetica";

/// An ordered (regular, bold) pair of font files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontCandidate {
    regular: PathBuf,
    bold: Option<PathBuf>,
}

impl FontCandidate {
    /// Creates a candidate with a dedicated bold file.
    pub fn new(regular: impl Into<PathBuf>, bold: impl Into<PathBuf>) -> Self {
        Self {
            regular: regular.into(),
            bold: Some(bold.into()),
        }
    }

    /// Creates a candidate that only provides a regular face.
    pub fn regular_only(regular: impl Into<PathBuf>) -> Self {
        Self {
            regular: regular.into(),
            bold: None,
        }
    }

    /// Path of the regular face.
    pub fn regular(&self) -> &Path {
        &self.regular
    }

    /// Path of the bold face, if one was configured.
    pub fn bold(&self) -> Option<&Path> {
        self.bold.as_deref()
    }

    /// Parses a `regular|bold;regular|bold` list as used by the environment configuration.
    ///
    /// Empty entries are ignored; a pair without `|` has no bold face.
    pub fn parse_list(value: &str) -> Vec<Self> {
        value
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once('|') {
                Some((regular, bold)) if !bold.trim().is_empty() => {
                    Self::new(regular.trim(), bold.trim())
                }
                Some((regular, _)) => Self::regular_only(regular.trim()),
                None => Self::regular_only(entry),
            })
            .collect()
    }
}

/// Whether a style is backed by its own font file or reuses the regular one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleBacking {
    /// The style has its own font resource.
    Distinct,
    /// The style reuses the regular font resource.
    AliasedToRegular,
}

/// The font family chosen for a render session.
#[derive(Clone)]
pub struct ActiveFont {
    family_name: String,
    regular_path: Option<PathBuf>,
    bold_path: Option<PathBuf>,
    bold_backing: StyleBacking,
    loaded: bool,
    family: Option<FontFamily<FontData>>,
}

impl ActiveFont {
    /// Name of the resolved family.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// `true` when a candidate font loaded; `false` for the built-in fallback.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// How the bold style is backed.
    pub fn bold_backing(&self) -> StyleBacking {
        self.bold_backing
    }

    /// Italic faces are never modeled; italic always reuses the regular resource.
    pub fn italic_backing(&self) -> StyleBacking {
        StyleBacking::AliasedToRegular
    }

    /// Bold-italic reuses whatever resource backs bold.
    pub fn bold_italic_backing(&self) -> StyleBacking {
        self.bold_backing
    }

    /// File backing the regular style (the metrics font for the built-in fallback).
    pub fn regular_path(&self) -> Option<&Path> {
        self.regular_path.as_deref()
    }

    /// File backing the bold style.
    pub fn bold_path(&self) -> Option<&Path> {
        self.bold_path.as_deref()
    }

    /// The loaded genpdf font family, absent when the fallback found no metrics font.
    pub fn font_family(&self) -> Option<&FontFamily<FontData>> {
        self.family.as_ref()
    }

    /// Whether `text` can be drawn with this font.
    ///
    /// Embedded TrueType fonts accept everything (missing glyphs degrade to the notdef glyph).
    /// The built-in fallback only encodes WinAnsi; the first unsupported character is returned.
    pub fn unsupported_char(&self, text: &str) -> Option<char> {
        if self.loaded {
            None
        } else {
            coverage::first_unsupported(text)
        }
    }
}

impl fmt::Debug for ActiveFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveFont")
            .field("family_name", &self.family_name)
            .field("regular_path", &self.regular_path)
            .field("bold_path", &self.bold_path)
            .field("bold_backing", &self.bold_backing)
            .field("loaded", &self.loaded)
            .field("has_font_data", &self.family.is_some())
            .finish()
    }
}

/// Picks the first loadable font candidate, caching the result for the lifetime of the resolver.
pub struct FontResolver {
    candidates: Vec<FontCandidate>,
    fallback_metrics: Vec<FontCandidate>,
    resolved: OnceCell<ActiveFont>,
}

impl FontResolver {
    /// Creates a resolver over the given candidates, in priority order.
    pub fn new(candidates: impl IntoIterator<Item = FontCandidate>) -> Self {
        Self {
            candidates: candidates.into_iter().collect(),
            fallback_metrics: Vec::new(),
            resolved: OnceCell::new(),
        }
    }

    /// Creates a resolver from the font settings of a report configuration.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.font_candidates().iter().cloned())
            .with_fallback_metrics(config.fallback_metrics().iter().cloned())
    }

    /// Sets the metrics fonts used when the built-in fallback is selected.
    pub fn with_fallback_metrics(
        mut self,
        fallback_metrics: impl IntoIterator<Item = FontCandidate>,
    ) -> Self {
        self.fallback_metrics = fallback_metrics.into_iter().collect();
        self
    }

    /// Resolves the active font. Font files are loaded on the first call only.
    pub fn resolve(&self) -> &ActiveFont {
        self.resolved.get_or_init(|| self.resolve_uncached())
    }

    fn resolve_uncached(&self) -> ActiveFont {
        for candidate in &self.candidates {
            match load_candidate(candidate) {
                Ok(font) => {
                    info!(
                        "Loaded font family: {} (Bold: {})",
                        candidate.regular().display(),
                        font.bold_path
                            .as_deref()
                            .unwrap_or(candidate.regular())
                            .display()
                    );
                    return font;
                }
                Err(FontLoadError::Missing(path)) => {
                    log::debug!("font candidate {} not present", path.display());
                }
                Err(err) => warn!("{}", err),
            }
        }

        warn!(
            "No suitable Japanese font found/loaded. Using {} (Japanese characters may not display).",
            FALLBACK_FAMILY_NAME
        );
        builtin_fallback(&self.fallback_metrics)
    }
}

fn load_face(path: &Path, builtin: Option<BuiltinFont>) -> Result<FontData, FontLoadError> {
    if !path.is_file() {
        return Err(FontLoadError::Missing(path.to_path_buf()));
    }
    FontData::load(path, builtin).map_err(|source| FontLoadError::Unloadable {
        path: path.to_path_buf(),
        source,
    })
}

fn load_candidate(candidate: &FontCandidate) -> Result<ActiveFont, FontLoadError> {
    let regular = load_face(candidate.regular(), None)?;

    let distinct_bold = candidate
        .bold()
        .filter(|bold| bold.is_file() && *bold != candidate.regular());
    let (bold, bold_path, bold_backing) = match distinct_bold {
        Some(path) => (
            load_face(path, None)?,
            path.to_path_buf(),
            StyleBacking::Distinct,
        ),
        None => (
            regular.clone(),
            candidate.regular().to_path_buf(),
            StyleBacking::AliasedToRegular,
        ),
    };

    let family_name = candidate
        .regular()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_FAMILY_NAME.to_owned());

    Ok(ActiveFont {
        family_name,
        regular_path: Some(candidate.regular().to_path_buf()),
        bold_path: Some(bold_path),
        bold_backing,
        loaded: true,
        family: Some(FontFamily {
            regular: regular.clone(),
            bold: bold.clone(),
            italic: regular,
            bold_italic: bold,
        }),
    })
}

fn load_builtin_metrics(candidate: &FontCandidate) -> Result<ActiveFont, FontLoadError> {
    let regular_path = candidate.regular();
    let bold_path = candidate
        .bold()
        .filter(|bold| bold.is_file())
        .unwrap_or(regular_path);

    let regular = load_face(regular_path, Some(BuiltinFont::Helvetica))?;
    let bold = load_face(bold_path, Some(BuiltinFont::HelveticaBold))?;

    Ok(ActiveFont {
        family_name: FALLBACK_FAMILY_NAME.to_owned(),
        regular_path: Some(regular_path.to_path_buf()),
        bold_path: Some(bold_path.to_path_buf()),
        bold_backing: StyleBacking::Distinct,
        loaded: false,
        family: Some(FontFamily {
            regular: regular.clone(),
            bold: bold.clone(),
            italic: regular,
            bold_italic: bold,
        }),
    })
}

fn builtin_fallback(metrics: &[FontCandidate]) -> ActiveFont {
    for candidate in metrics {
        match load_builtin_metrics(candidate) {
            Ok(font) => return font,
            Err(FontLoadError::Missing(_)) => {}
            Err(err) => warn!("{}", err),
        }
    }

    warn!(
        "No metrics font available for the built-in {} fallback; rendering will fail.",
        FALLBACK_FAMILY_NAME
    );
    ActiveFont {
        family_name: FALLBACK_FAMILY_NAME.to_owned(),
        regular_path: None,
        bold_path: None,
        bold_backing: StyleBacking::Distinct,
        loaded: false,
        family: None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config;

    /// Returns the first metrics font installed on this machine, if any.
    pub(crate) fn system_font() -> Option<PathBuf> {
        config::default_fallback_metrics()
            .into_iter()
            .map(|candidate| candidate.regular().to_path_buf())
            .find(|path| path.is_file())
    }

    #[test]
    fn parses_candidate_list() {
        let list = FontCandidate::parse_list("a.ttf|b.ttf; c.ttf ;;d.ttf|");
        assert_eq!(
            list,
            vec![
                FontCandidate::new("a.ttf", "b.ttf"),
                FontCandidate::regular_only("c.ttf"),
                FontCandidate::regular_only("d.ttf"),
            ]
        );
    }

    #[test]
    fn missing_candidates_fall_back_to_builtin() {
        let resolver = FontResolver::new(vec![
            FontCandidate::new("/__missing__/regular.ttf", "/__missing__/bold.ttf"),
            FontCandidate::regular_only("/__missing__/other.ttc"),
        ]);

        let font = resolver.resolve();
        assert!(!font.is_loaded());
        assert_eq!(font.family_name(), FALLBACK_FAMILY_NAME);
        assert!(font.font_family().is_none());
    }

    #[test]
    fn corrupt_candidate_is_skipped() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let corrupt = dir.path().join("corrupt.ttf");
        std::fs::write(&corrupt, b"definitely not a font").expect("write corrupt font");

        let Some(system) = system_font() else {
            eprintln!("Skipping corrupt_candidate_is_skipped: no system TrueType font found");
            return;
        };

        let resolver = FontResolver::new(vec![
            FontCandidate::regular_only(&corrupt),
            FontCandidate::regular_only(&system),
        ]);
        let font = resolver.resolve();
        assert!(font.is_loaded());
        assert_eq!(font.regular_path(), Some(system.as_path()));
    }

    #[test]
    fn corrupt_only_candidate_degrades_without_panicking() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let corrupt = dir.path().join("corrupt.ttf");
        std::fs::write(&corrupt, b"\0\0\0\0garbage").expect("write corrupt font");

        let resolver = FontResolver::new(vec![FontCandidate::regular_only(&corrupt)]);
        let font = resolver.resolve();
        assert!(!font.is_loaded());
        assert_eq!(font.family_name(), FALLBACK_FAMILY_NAME);
    }

    #[test]
    fn missing_bold_reuses_regular() {
        let Some(system) = system_font() else {
            eprintln!("Skipping missing_bold_reuses_regular: no system TrueType font found");
            return;
        };

        let resolver = FontResolver::new(vec![FontCandidate::new(
            &system,
            "/__missing__/bold.ttf",
        )]);
        let font = resolver.resolve();
        assert!(font.is_loaded());
        assert_eq!(font.bold_backing(), StyleBacking::AliasedToRegular);
        assert_eq!(font.bold_path(), font.regular_path());
        assert_eq!(font.italic_backing(), StyleBacking::AliasedToRegular);
    }

    #[test]
    fn fallback_borrows_metrics_font() {
        let Some(system) = system_font() else {
            eprintln!("Skipping fallback_borrows_metrics_font: no system TrueType font found");
            return;
        };

        let font = FontResolver::new(Vec::new())
            .with_fallback_metrics(vec![FontCandidate::regular_only(&system)])
            .resolve()
            .clone();
        assert!(!font.is_loaded());
        assert!(font.font_family().is_some());
        assert_eq!(font.unsupported_char("日本語"), Some('日'));
        assert_eq!(font.unsupported_char("Café – naïve"), None);
    }

    #[test]
    fn resolution_is_cached() {
        let resolver = FontResolver::new(Vec::new());
        let first = resolver.resolve() as *const ActiveFont;
        let second = resolver.resolve() as *const ActiveFont;
        assert_eq!(first, second);
    }
}
