//! Error types shared by the font resolver, the block renderer and the report writer.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::model::BlockKind;

/// A single font candidate could not be registered.
///
/// Never escapes [`crate::fonts::FontResolver`]; the resolver logs it and moves on to the
/// next candidate.
#[derive(Debug)]
pub enum FontLoadError {
    /// The regular font file does not exist.
    Missing(PathBuf),
    /// The font file exists but could not be read or parsed.
    Unloadable {
        /// Path of the offending font file.
        path: PathBuf,
        /// Underlying genpdf error.
        source: genpdf::error::Error,
    },
}

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "font file {} does not exist", path.display()),
            Self::Unloadable { path, source } => {
                write!(f, "failed to load font {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for FontLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Missing(_) => None,
            Self::Unloadable { source, .. } => Some(source),
        }
    }
}

/// A single block could not be placed into the document.
///
/// The renderer skips the block, logs the reason and continues with the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRenderError {
    /// The active font has no glyph for a character in the block.
    UnsupportedCharacter {
        /// The first character that cannot be encoded.
        character: char,
    },
    /// The block could not be converted into a layout element.
    Layout(String),
}

impl fmt::Display for BlockRenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedCharacter { character } => write!(
                f,
                "character {:?} (U+{:04X}) is not covered by the active font",
                character, *character as u32
            ),
            Self::Layout(message) => write!(f, "layout failed: {message}"),
        }
    }
}

impl std::error::Error for BlockRenderError {}

/// Errors that abort a whole render call.
#[derive(Debug)]
pub enum RenderError {
    /// No candidate font loaded and no metrics font exists for the built-in fallback.
    FontUnavailable,
    /// genpdf failed to serialize the document.
    Serialize(genpdf::error::Error),
    /// Writing the PDF bytes to disk failed.
    DocumentWrite {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The outline could not be embedded into the rendered document.
    #[cfg(feature = "bookmarks")]
    Bookmarks(crate::bookmarks::BookmarkError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontUnavailable => write!(
                f,
                "no font candidate loaded and no metrics font is available for the built-in fallback"
            ),
            Self::Serialize(err) => write!(f, "failed to serialize PDF document: {err}"),
            Self::DocumentWrite { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(err) => write!(f, "failed to embed outline: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FontUnavailable => None,
            Self::Serialize(err) => Some(err),
            Self::DocumentWrite { source, .. } => Some(source),
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(err) => Some(err),
        }
    }
}

impl From<genpdf::error::Error> for RenderError {
    fn from(err: genpdf::error::Error) -> Self {
        Self::Serialize(err)
    }
}

#[cfg(feature = "bookmarks")]
impl From<crate::bookmarks::BookmarkError> for RenderError {
    fn from(err: crate::bookmarks::BookmarkError) -> Self {
        Self::Bookmarks(err)
    }
}

/// The markdown source for a report does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingInputError {
    path: PathBuf,
}

impl MissingInputError {
    /// Creates the error for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path that was expected to hold the markdown source.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl fmt::Display for MissingInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not find report at {}", self.path.display())
    }
}

impl std::error::Error for MissingInputError {}

/// A skipped block together with the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    /// Position of the block in the converted block sequence.
    pub index: usize,
    /// Kind of the dropped block.
    pub kind: BlockKind,
    /// Plain text of the dropped block, used for diagnostics.
    pub text: String,
    /// Why the block was dropped.
    pub reason: BlockRenderError,
}
