//! rendertext text - fonts, segmentation, shaping
//!
//! This crate provides the text half of the rendertext pipeline:
//! - Font handles at a fixed pixel size (fontdb + ttf-parser)
//! - Emoji classification and word-boundary segmentation into runs
//! - Text shaping with two-font fallback (rustybuzz - HarfBuzz port)
//! - Glyph rasterization for outlines and embedded bitmap strikes (tiny-skia)
//! - Extent measurement ahead of drawing

use std::fmt;
use std::path::PathBuf;

pub mod font;
pub mod segment;
pub mod shaping;
pub mod render;
pub mod measure;

pub use font::{FontHandle, FontSet, Strike};
pub use segment::{Run, Segmenter, SpanClassification, TextBuffer};
pub use shaping::{PositionedGlyph, ShapedRun, TextShaper};
pub use render::{GlyphBitmap, GlyphCache, GlyphRasterizer, RasterizedGlyph, rasterize_strike};
pub use measure::{Measurer, TextExtent};

/// Rendering kind of a run, and the role of the font that serves it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunKind {
    Text,
    Emoji,
}

impl RunKind {
    /// The other kind (the fallback role)
    pub fn other(self) -> Self {
        match self {
            RunKind::Text => RunKind::Emoji,
            RunKind::Emoji => RunKind::Text,
        }
    }
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunKind::Text => f.write_str("text"),
            RunKind::Emoji => f.write_str("emoji"),
        }
    }
}

/// Text pipeline error types
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("Failed to load {role} font {}: {reason}", .path.display())]
    FontLoad {
        role: RunKind,
        path: PathBuf,
        reason: String,
    },

    #[error("Failed to parse font: {0}")]
    FontParsing(String),

    #[error("Failed to select emoji size: {0}")]
    StrikeSelect(String),

    #[error("Text conversion failed: {0}")]
    TextConversion(String),

    #[error("Failed to iterate over words: {0}")]
    Segmentation(String),

    #[error("Shaping failed: {0}")]
    ShapingFailed(String),

    #[error("Rasterization failed: {0}")]
    RasterizationFailed(String),
}

pub type Result<T> = std::result::Result<T, TextError>;
