//! Text extent measurement
//!
//! Shapes every run and sizes the glyph bitmaps without drawing. The
//! extent may exceed the canvas; only drawing treats that as an error.

use crate::font::FontSet;
use crate::render::GlyphCache;
use crate::segment::{Run, TextBuffer};
use crate::shaping::TextShaper;
use crate::Result;

/// Measured size of a line of text in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextExtent {
    /// Total pen advance
    pub width: u32,
    /// Tallest glyph bitmap
    pub height: u32,
}

impl TextExtent {
    /// Whether the extent fits inside a `width` x `height` canvas
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.width <= width && self.height <= height
    }
}

/// Measures runs with the same shaping and rasterization as drawing
pub struct Measurer<'a> {
    shaper: &'a TextShaper,
}

impl<'a> Measurer<'a> {
    pub fn new(shaper: &'a TextShaper) -> Self {
        Self { shaper }
    }

    /// Total advance width and maximum bitmap height across all runs
    pub fn measure(
        &self,
        buffer: &TextBuffer,
        runs: &[Run],
        fonts: &FontSet,
        cache: &mut GlyphCache,
    ) -> Result<TextExtent> {
        let mut width: i64 = 0;
        let mut height: u32 = 0;

        for run in runs {
            let shaped = self.shaper.shape(
                run.text(buffer),
                fonts.get(run.kind),
                Some(fonts.fallback(run.kind)),
            )?;
            width += shaped.width_px();

            for glyph in shaped.glyphs.iter().filter(|g| !g.is_placeholder()) {
                let rasterized = cache.rasterize(fonts.get(glyph.source), glyph.glyph_id)?;
                height = height.max(rasterized.rows);
            }
        }

        let extent = TextExtent {
            width: u32::try_from(width.max(0)).unwrap_or(u32::MAX),
            height,
        };
        tracing::debug!("Measured {} runs: {}x{}", runs.len(), extent.width, extent.height);
        Ok(extent)
    }
}
