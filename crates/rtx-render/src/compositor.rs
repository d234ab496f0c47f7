//! Compositor - draws shaped runs into the canvas
//!
//! Every glyph bitmap is bottom-aligned to the canvas edge
//! (`top = canvas.height - rows - y_offset`) and placed at the pen.
//! Pixels are overwritten, never blended: glyphs are not expected to
//! overlap and the canvas starts transparent.

use rtx_text::{FontSet, GlyphBitmap, GlyphCache, RasterizedGlyph, ShapedRun, TextError};

use crate::canvas::{BYTES_PER_PIXEL, Canvas};
use crate::Result;

/// Pen position in whole pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PenPosition {
    pub x: i64,
    pub y: i64,
}

impl PenPosition {
    pub fn origin() -> Self {
        Self::default()
    }

    /// Move right by `dx` pixels
    pub fn advance(self, dx: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
        }
    }
}

/// Draws positioned glyphs into a [`Canvas`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Compositor;

impl Compositor {
    pub fn new() -> Self {
        Self
    }

    /// Composite one shaped run, returning the advanced pen
    ///
    /// Each glyph is rasterized with the font that shaped it. Placeholders
    /// for missing glyphs draw nothing and do not move the pen.
    pub fn composite(
        &self,
        canvas: &mut Canvas,
        run: &ShapedRun,
        fonts: &FontSet,
        cache: &mut GlyphCache,
        pen: PenPosition,
    ) -> Result<PenPosition> {
        let mut pen = pen;

        for glyph in &run.glyphs {
            if glyph.is_placeholder() {
                continue;
            }

            let rasterized = cache.rasterize(fonts.get(glyph.source), glyph.glyph_id)?;
            let left = pen.x + i64::from(glyph.x_offset >> 6);
            draw_glyph(canvas, rasterized, left, i64::from(glyph.y_offset >> 6))?;

            pen = pen.advance(i64::from(glyph.advance_px()));
        }

        tracing::trace!("Composited {} run ({} glyphs), pen at {}", run.kind, run.len(), pen.x);
        Ok(pen)
    }
}

/// Draw one glyph bitmap with its left edge at column `left`
///
/// The whole bitmap box is checked against the canvas before any pixel
/// is written, so a failing glyph leaves the canvas untouched.
pub fn draw_glyph(canvas: &mut Canvas, glyph: &RasterizedGlyph, left: i64, y_offset: i64) -> Result<()> {
    if glyph.is_empty() {
        return Ok(());
    }

    let top = i64::from(canvas.height()) - i64::from(glyph.rows) - y_offset;
    canvas.check_rect(left, top, glyph.width, glyph.rows)?;

    let width = glyph.width as usize;
    match &glyph.bitmap {
        GlyphBitmap::Grayscale(coverage) => {
            check_len(glyph, coverage, 1)?;
            for (row, src) in (0..).zip(coverage.chunks_exact(width)) {
                let dest = canvas.span_mut(left, top + row, glyph.width)?;
                for (px, &c) in dest.chunks_exact_mut(BYTES_PER_PIXEL).zip(src) {
                    let ink = 255 - c;
                    px.copy_from_slice(&[ink, ink, ink, c]);
                }
            }
        }
        GlyphBitmap::PreRenderedColor(bgra) => {
            check_len(glyph, bgra, BYTES_PER_PIXEL)?;
            for (row, src) in (0..).zip(bgra.chunks_exact(width * BYTES_PER_PIXEL)) {
                let dest = canvas.span_mut(left, top + row, glyph.width)?;
                for (px, s) in dest
                    .chunks_exact_mut(BYTES_PER_PIXEL)
                    .zip(src.chunks_exact(BYTES_PER_PIXEL))
                {
                    px.copy_from_slice(&[s[2], s[1], s[0], s[3]]);
                }
            }
        }
    }

    Ok(())
}

fn check_len(glyph: &RasterizedGlyph, data: &[u8], bytes_per_pixel: usize) -> Result<()> {
    let expected = glyph.width as usize * glyph.rows as usize * bytes_per_pixel;
    if data.len() != expected {
        return Err(TextError::RasterizationFailed(format!(
            "glyph {}: bitmap holds {} bytes for a {}x{} box",
            glyph.glyph_id,
            data.len(),
            glyph.width,
            glyph.rows
        ))
        .into());
    }
    Ok(())
}
