//! Technology research reports rendered from markdown into paginated PDF documents.
//!
//! The [`renderer::ReportRenderer`] is the entry point for rendering; the
//! [`research`] module gathers the markdown it renders.

pub mod builder;
pub mod config;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod markdown;
pub mod model;
pub mod output;
pub mod renderer;
pub mod research;
pub mod richtext;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use config::{PageSetup, ReportConfig, Typography};
pub use error::{BlockRenderError, FontLoadError, MissingInputError, RenderError, SkippedBlock};
pub use fonts::{ActiveFont, FontCandidate, FontResolver};
pub use markdown::MarkdownStrategy;
pub use model::{BlockKind, RenderBlock, RenderSummary};
pub use output::{next_available_path, today_report_path};
pub use renderer::ReportRenderer;
