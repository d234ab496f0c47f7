//! Glyph rasterization

use tiny_skia::{FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};
use ttf_parser::{Face, GlyphId, OutlineBuilder, RasterGlyphImage, RasterImageFormat};

use crate::font::FontHandle;
use crate::{Result, TextError};

/// Pixels of a rasterized glyph, row-major, `width` pixels per row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlyphBitmap {
    /// Anti-aliased coverage, 1 byte per pixel (255 = fully covered)
    Grayscale(Vec<u8>),
    /// Pre-rendered color, 4 bytes per pixel in B, G, R, A order (premultiplied)
    PreRenderedColor(Vec<u8>),
}

/// A rasterized glyph
#[derive(Debug, Clone)]
pub struct RasterizedGlyph {
    /// Glyph ID
    pub glyph_id: u16,
    /// Bitmap width
    pub width: u32,
    /// Bitmap rows
    pub rows: u32,
    /// X bearing (offset from origin)
    pub bearing_x: i32,
    /// Y bearing (top edge above baseline)
    pub bearing_y: i32,
    pub bitmap: GlyphBitmap,
}

impl RasterizedGlyph {
    /// Create an empty glyph
    pub fn empty(glyph_id: u16) -> Self {
        Self {
            glyph_id,
            width: 0,
            rows: 0,
            bearing_x: 0,
            bearing_y: 0,
            bitmap: GlyphBitmap::Grayscale(Vec::new()),
        }
    }

    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.rows == 0
    }
}

/// Glyph rasterizer using tiny-skia
#[derive(Debug, Clone)]
pub struct GlyphRasterizer {
    /// Anti-alias outline edges
    pub anti_alias: bool,
}

impl GlyphRasterizer {
    /// Create a new rasterizer
    pub fn new() -> Self {
        Self { anti_alias: true }
    }

    /// Rasterize a glyph with the font's current size and strike
    ///
    /// Glyphs without outline or bitmap (spaces) come back empty.
    pub fn rasterize(&self, font: &FontHandle, glyph_id: u16) -> Result<RasterizedGlyph> {
        font.with_face(|face| self.rasterize_from_face(face, font, glyph_id))?
    }

    fn rasterize_from_face(
        &self,
        face: &Face<'_>,
        font: &FontHandle,
        glyph_id: u16,
    ) -> Result<RasterizedGlyph> {
        let glyph = GlyphId(glyph_id);

        if let Some(strike) = font.strike() {
            if let Some(raster) = face.glyph_raster_image(glyph, strike.ppem) {
                return rasterize_strike(&raster, glyph_id, font.strike_scale(raster.pixels_per_em));
            }
        }

        if let Some(rasterized) = self.rasterize_outline(face, glyph_id, font.layout_size()) {
            return Ok(rasterized);
        }

        // Bitmap-only faces used without a selected strike
        let ppem = u16::try_from(font.pixel_size()).unwrap_or(u16::MAX);
        if let Some(raster) = face.glyph_raster_image(glyph, ppem) {
            return rasterize_strike(&raster, glyph_id, font.strike_scale(raster.pixels_per_em));
        }

        Ok(RasterizedGlyph::empty(glyph_id))
    }

    /// Rasterize an outline glyph from a parsed face
    pub fn rasterize_outline(
        &self,
        face: &Face<'_>,
        glyph_id: u16,
        font_size: f32,
    ) -> Option<RasterizedGlyph> {
        let glyph = GlyphId(glyph_id);

        // Get glyph bounding box
        let bbox = face.glyph_bounding_box(glyph)?;

        // Scale factor
        let scale = font_size / face.units_per_em() as f32;

        // Calculate dimensions
        let width = ((bbox.x_max - bbox.x_min) as f32 * scale).ceil() as u32;
        let rows = ((bbox.y_max - bbox.y_min) as f32 * scale).ceil() as u32;

        if width == 0 || rows == 0 {
            return Some(RasterizedGlyph::empty(glyph_id));
        }

        // Create outline builder for tiny-skia
        let mut builder = PathBuilder::new(scale, bbox.x_min as f32, bbox.y_max as f32);
        face.outline_glyph(glyph, &mut builder)?;
        let path = builder.finish()?;

        let mut pixmap = Pixmap::new(width, rows)?;

        let mut paint = tiny_skia::Paint::default();
        paint.set_color(tiny_skia::Color::WHITE);
        paint.anti_alias = self.anti_alias;

        pixmap.fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            Transform::identity(),
            None,
        );

        // Alpha channel is the coverage
        let coverage: Vec<u8> = pixmap.pixels().iter().map(|p| p.alpha()).collect();

        Some(RasterizedGlyph {
            glyph_id,
            width,
            rows,
            bearing_x: (bbox.x_min as f32 * scale).floor() as i32,
            bearing_y: (bbox.y_max as f32 * scale).ceil() as i32,
            bitmap: GlyphBitmap::Grayscale(coverage),
        })
    }
}

impl Default for GlyphRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an embedded bitmap and resample it by `scale`
///
/// PNG and BGRA32 strikes become premultiplied BGRA color; Gray8 strikes
/// become coverage. Other formats fail.
pub fn rasterize_strike(raster: &RasterGlyphImage<'_>, glyph_id: u16, scale: f32) -> Result<RasterizedGlyph> {
    let failed = |reason: String| TextError::RasterizationFailed(format!("glyph {glyph_id}: {reason}"));

    let (pixmap, grayscale) = match raster.format {
        RasterImageFormat::PNG => {
            let pixmap = Pixmap::decode_png(raster.data).map_err(|e| failed(e.to_string()))?;
            (pixmap, false)
        }
        RasterImageFormat::BitmapPremulBgra32 => {
            let mut rgba = raster.data.to_vec();
            swap_red_blue(&mut rgba);
            (pixmap_from(rgba, raster, &failed)?, false)
        }
        RasterImageFormat::BitmapGray8 => {
            let rgba = raster.data.iter().flat_map(|&a| [0, 0, 0, a]).collect();
            (pixmap_from(rgba, raster, &failed)?, true)
        }
        other => return Err(failed(format!("unsupported embedded bitmap format {other:?}"))),
    };

    let pixmap = resample(pixmap, scale).ok_or_else(|| failed("cannot resample bitmap".into()))?;
    let (width, rows) = (pixmap.width(), pixmap.height());

    let bitmap = if grayscale {
        GlyphBitmap::Grayscale(pixmap.pixels().iter().map(|p| p.alpha()).collect())
    } else {
        let mut bgra = pixmap.take();
        swap_red_blue(&mut bgra);
        GlyphBitmap::PreRenderedColor(bgra)
    };

    let bearing_x = (f32::from(raster.x) * scale).round() as i32;
    let bottom = (f32::from(raster.y) * scale).round() as i32;

    Ok(RasterizedGlyph {
        glyph_id,
        width,
        rows,
        bearing_x,
        bearing_y: bottom + rows as i32,
        bitmap,
    })
}

fn pixmap_from(
    rgba: Vec<u8>,
    raster: &RasterGlyphImage<'_>,
    failed: &dyn Fn(String) -> TextError,
) -> Result<Pixmap> {
    let size = IntSize::from_wh(u32::from(raster.width), u32::from(raster.height))
        .ok_or_else(|| failed("empty bitmap".into()))?;
    Pixmap::from_vec(rgba, size).ok_or_else(|| failed("bitmap size does not match its data".into()))
}

fn resample(pixmap: Pixmap, scale: f32) -> Option<Pixmap> {
    if (scale - 1.0).abs() < f32::EPSILON {
        return Some(pixmap);
    }

    let width = ((pixmap.width() as f32 * scale).round() as u32).max(1);
    let height = ((pixmap.height() as f32 * scale).round() as u32).max(1);
    let mut scaled = Pixmap::new(width, height)?;

    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    let transform = Transform::from_scale(
        width as f32 / pixmap.width() as f32,
        height as f32 / pixmap.height() as f32,
    );
    scaled.draw_pixmap(0, 0, pixmap.as_ref(), &paint, transform, None);
    Some(scaled)
}

/// RGBA <-> BGRA in place
fn swap_red_blue(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}

/// Path builder that converts ttf-parser outlines to tiny-skia paths
struct PathBuilder {
    builder: tiny_skia::PathBuilder,
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl PathBuilder {
    fn new(scale: f32, offset_x: f32, offset_y: f32) -> Self {
        Self {
            builder: tiny_skia::PathBuilder::new(),
            scale,
            offset_x,
            offset_y,
        }
    }

    fn transform_x(&self, x: f32) -> f32 {
        (x - self.offset_x) * self.scale
    }

    fn transform_y(&self, y: f32) -> f32 {
        (self.offset_y - y) * self.scale // Flip Y axis
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for PathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.transform_x(x), self.transform_y(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.transform_x(x), self.transform_y(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x2), self.transform_y(y2),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(format: RasterImageFormat, width: u16, height: u16, data: &[u8]) -> RasterGlyphImage<'_> {
        RasterGlyphImage {
            x: 0,
            y: -2,
            width,
            height,
            pixels_per_em: 8,
            format,
            data,
        }
    }

    #[test]
    fn test_empty_glyph() {
        let glyph = RasterizedGlyph::empty(7);
        assert!(glyph.is_empty());
        assert_eq!(glyph.bitmap, GlyphBitmap::Grayscale(Vec::new()));
    }

    #[test]
    fn test_bgra_strike_kept_in_bgra_order() {
        // One opaque pixel: B=10, G=20, R=30
        let data = [10, 20, 30, 255];
        let glyph = rasterize_strike(&raster(RasterImageFormat::BitmapPremulBgra32, 1, 1, &data), 3, 1.0).unwrap();
        assert_eq!(glyph.bitmap, GlyphBitmap::PreRenderedColor(vec![10, 20, 30, 255]));
        assert_eq!((glyph.width, glyph.rows), (1, 1));
        assert_eq!(glyph.bearing_y, -1);
    }

    #[test]
    fn test_gray_strike_becomes_coverage() {
        let data = [0, 128, 255, 64];
        let glyph = rasterize_strike(&raster(RasterImageFormat::BitmapGray8, 2, 2, &data), 3, 1.0).unwrap();
        assert_eq!(glyph.bitmap, GlyphBitmap::Grayscale(vec![0, 128, 255, 64]));
    }

    #[test]
    fn test_strike_resampled() {
        let data = [255u8; 4 * 4 * 4];
        let glyph = rasterize_strike(&raster(RasterImageFormat::BitmapPremulBgra32, 4, 4, &data), 3, 0.5).unwrap();
        assert_eq!((glyph.width, glyph.rows), (2, 2));
        match glyph.bitmap {
            GlyphBitmap::PreRenderedColor(bgra) => assert_eq!(bgra.len(), 2 * 2 * 4),
            other => panic!("unexpected bitmap {other:?}"),
        }
    }

    #[test]
    fn test_png_strike_decoded_to_bgra() {
        let mut pixmap = Pixmap::new(2, 2).unwrap();
        pixmap.data_mut().copy_from_slice(&[
            200, 100, 50, 255, 0, 0, 0, 0,
            10, 20, 30, 255, 255, 255, 255, 255,
        ]);
        let png = pixmap.encode_png().unwrap();

        let glyph = rasterize_strike(&raster(RasterImageFormat::PNG, 2, 2, &png), 3, 1.0).unwrap();
        assert_eq!((glyph.width, glyph.rows), (2, 2));
        assert_eq!(
            glyph.bitmap,
            GlyphBitmap::PreRenderedColor(vec![
                50, 100, 200, 255, 0, 0, 0, 0,
                30, 20, 10, 255, 255, 255, 255, 255,
            ])
        );
    }

    #[test]
    fn test_corrupt_png_fails() {
        let data = [0x89, b'P', b'N', b'G', 0, 0];
        let err = rasterize_strike(&raster(RasterImageFormat::PNG, 4, 4, &data), 3, 1.0).unwrap_err();
        assert!(matches!(err, TextError::RasterizationFailed(_)));
    }

    #[test]
    fn test_unsupported_format_fails() {
        let data = [0xFF];
        let err = rasterize_strike(&raster(RasterImageFormat::BitmapMono, 8, 1, &data), 3, 1.0).unwrap_err();
        assert!(matches!(err, TextError::RasterizationFailed(_)));
    }

    #[test]
    fn test_swap_red_blue() {
        let mut px = [1, 2, 3, 4, 5, 6, 7, 8];
        swap_red_blue(&mut px);
        assert_eq!(px, [3, 2, 1, 4, 7, 6, 5, 8]);
    }
}
