//! Glyph rendering module

mod rasterizer;
mod atlas;

pub use rasterizer::{GlyphBitmap, GlyphRasterizer, RasterizedGlyph, rasterize_strike};
pub use atlas::{GlyphCache, GlyphKey};
