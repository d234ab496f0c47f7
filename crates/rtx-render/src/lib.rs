//! rendertext render - Canvas, compositing, encoding
//!
//! Glyph bitmaps from `rtx-text` are written into a fixed-size RGBA
//! canvas and the finished canvas is encoded to an image file.

use std::path::PathBuf;

mod canvas;
mod compositor;
mod encoder;

pub use canvas::{BYTES_PER_PIXEL, Canvas};
pub use compositor::{Compositor, PenPosition, draw_glyph};
pub use encoder::{OutputFormat, encode};

use rtx_text::TextError;

/// Render error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid output size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Write at ({x}, {y}) is outside the {width}x{height} canvas")]
    BoundsViolation {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error(transparent)]
    Text(#[from] TextError),

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, RenderError>;
