//! Explicit configuration for the report renderer.
//!
//! Everything the renderer needs is carried by [`ReportConfig`]; there is no process-wide state.
//! [`ReportConfig::from_env`] layers the `TECHSPRING_*` environment variables over the defaults.

use std::env;
use std::path::{Path, PathBuf};

use genpdf::PaperSize;

use crate::fonts::FontCandidate;
use crate::markdown::MarkdownStrategy;

/// Semicolon-separated `regular|bold` font pairs tried before the defaults.
pub const FONT_CANDIDATES_ENV: &str = "TECHSPRING_FONT_CANDIDATES";
/// Semicolon-separated `regular|bold` metrics fonts for the built-in fallback.
pub const FALLBACK_FONTS_ENV: &str = "TECHSPRING_FALLBACK_FONTS";
/// Directory the PDF is written to.
pub const OUTPUT_DIR_ENV: &str = "TECHSPRING_OUTPUT_DIR";
/// `lines` or `structural`.
pub const STRATEGY_ENV: &str = "TECHSPRING_STRATEGY";

const DEFAULT_OUTPUT_DIR: &str = "report";

/// Font sizes (pt) and vertical rhythm of the rendered report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Typography {
    /// Body text size.
    pub body_size: u8,
    /// `# ` title size.
    pub title_size: u8,
    /// `## ` heading size.
    pub heading_size: u8,
    /// `### ` subheading size.
    pub subheading_size: u8,
    /// Table cell size.
    pub table_size: u8,
    /// Line spacing factor applied to the whole document.
    pub line_spacing: f64,
    /// Space after the title, in millimetres.
    pub title_spacing_mm: f64,
    /// Space before headings, in lines.
    pub heading_spacing: f64,
    /// Indentation per list nesting level, in millimetres.
    pub list_indent_mm: f64,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            body_size: 11,
            title_size: 16,
            heading_size: 14,
            subheading_size: 12,
            table_size: 10,
            line_spacing: 1.25,
            title_spacing_mm: 5.0,
            heading_spacing: 0.5,
            list_indent_mm: 5.0,
        }
    }
}

/// Page geometry.
#[derive(Clone, Copy, Debug)]
pub struct PageSetup {
    /// Paper size of every page.
    pub paper: PaperSize,
    /// Margins in millimetres as (top, right, bottom, left).
    pub margins_mm: (f64, f64, f64, f64),
    /// Whether a `Page N` footer is printed.
    pub page_numbers: bool,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4,
            margins_mm: (15.0, 15.0, 15.0, 15.0),
            page_numbers: true,
        }
    }
}

/// Configuration handed to [`crate::renderer::ReportRenderer`].
#[derive(Clone, Debug)]
pub struct ReportConfig {
    font_candidates: Vec<FontCandidate>,
    fallback_metrics: Vec<FontCandidate>,
    output_dir: PathBuf,
    strategy: MarkdownStrategy,
    typography: Typography,
    page: PageSetup,
    title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            font_candidates: default_font_candidates(),
            fallback_metrics: default_fallback_metrics(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            strategy: MarkdownStrategy::default(),
            typography: Typography::default(),
            page: PageSetup::default(),
            title: "Tech Research Report".to_owned(),
        }
    }
}

impl ReportConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration with `TECHSPRING_*` environment overrides applied.
    ///
    /// Candidates from the environment are tried before the built-in defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(value) = env_value(FONT_CANDIDATES_ENV) {
            let mut candidates = FontCandidate::parse_list(&value);
            candidates.append(&mut config.font_candidates);
            config.font_candidates = candidates;
        }

        if let Some(value) = env_value(FALLBACK_FONTS_ENV) {
            let mut metrics = FontCandidate::parse_list(&value);
            metrics.append(&mut config.fallback_metrics);
            config.fallback_metrics = metrics;
        }

        if let Some(dir) = env_value(OUTPUT_DIR_ENV) {
            config.output_dir = PathBuf::from(dir);
        }

        if let Some(strategy) = env_value(STRATEGY_ENV) {
            match strategy.parse() {
                Ok(strategy) => config.strategy = strategy,
                Err(err) => log::warn!("ignoring {}: {}", STRATEGY_ENV, err),
            }
        }

        config
    }

    /// Font candidates in priority order.
    pub fn font_candidates(&self) -> &[FontCandidate] {
        &self.font_candidates
    }

    /// Metrics fonts for the built-in fallback, in priority order.
    pub fn fallback_metrics(&self) -> &[FontCandidate] {
        &self.fallback_metrics
    }

    /// Directory the report PDF is written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Markdown interpretation strategy.
    pub fn strategy(&self) -> MarkdownStrategy {
        self.strategy
    }

    /// Font sizes and spacing.
    pub fn typography(&self) -> &Typography {
        &self.typography
    }

    /// Page geometry.
    pub fn page(&self) -> &PageSetup {
        &self.page
    }

    /// Document title stored in the PDF metadata.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replaces the font candidates.
    pub fn with_font_candidates(mut self, candidates: Vec<FontCandidate>) -> Self {
        self.font_candidates = candidates;
        self
    }

    /// Replaces the fallback metrics fonts.
    pub fn with_fallback_metrics(mut self, metrics: Vec<FontCandidate>) -> Self {
        self.fallback_metrics = metrics;
        self
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the markdown strategy.
    pub fn with_strategy(mut self, strategy: MarkdownStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the typography.
    pub fn with_typography(mut self, typography: Typography) -> Self {
        self.typography = typography;
        self
    }

    /// Sets the page geometry.
    pub fn with_page(mut self, page: PageSetup) -> Self {
        self.page = page;
        self
    }

    /// Sets the document title metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

fn env_value(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn windows_font_directory() -> PathBuf {
    env::var_os("WINDIR")
        .or_else(|| env::var_os("SystemRoot"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("C:\\Windows"))
        .join("Fonts")
}

/// Japanese-capable fonts on Windows, Linux and macOS, in priority order.
pub fn default_font_candidates() -> Vec<FontCandidate> {
    let windows = windows_font_directory();
    vec![
        FontCandidate::new(windows.join("YuGothM.ttc"), windows.join("YuGothB.ttc")),
        FontCandidate::new(windows.join("meiryo.ttc"), windows.join("meiryob.ttc")),
        FontCandidate::new(windows.join("msgothic.ttc"), windows.join("msgothic.ttc")),
        FontCandidate::new(
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
        ),
        FontCandidate::regular_only("/usr/share/fonts/opentype/ipafont-gothic/ipag.ttf"),
        FontCandidate::regular_only("/usr/share/fonts/truetype/takao-gothic/TakaoGothic.ttf"),
        FontCandidate::new(
            "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
            "/System/Library/Fonts/ヒラギノ角ゴシック W6.ttc",
        ),
    ]
}

/// Latin TrueType fonts whose metrics stand in for the built-in Helvetica faces.
pub fn default_fallback_metrics() -> Vec<FontCandidate> {
    let windows = windows_font_directory();
    vec![
        FontCandidate::new(
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        ),
        FontCandidate::new(
            "/usr/share/fonts/truetype/liberation2/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/liberation2/LiberationSans-Bold.ttf",
        ),
        FontCandidate::new(
            "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
            "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
        ),
        FontCandidate::new(
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        ),
        FontCandidate::new(
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        ),
        FontCandidate::new(
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
        ),
        FontCandidate::new(windows.join("arial.ttf"), windows.join("arialbd.ttf")),
        FontCandidate::new(
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        ),
        FontCandidate::new("/Library/Fonts/Arial.ttf", "/Library/Fonts/Arial Bold.ttf"),
    ]
}
