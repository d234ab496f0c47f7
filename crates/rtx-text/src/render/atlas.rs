//! Per-render glyph cache

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::{GlyphRasterizer, RasterizedGlyph};
use crate::font::FontHandle;
use crate::{Result, RunKind};

/// Key for glyph cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    /// Font role (one font per role within a render call)
    pub role: RunKind,
    /// Glyph ID in font
    pub glyph_id: u16,
    /// Font size in pixels
    pub size_px: u32,
}

/// Rasterized glyphs shared by measuring and compositing
///
/// Lives for one render call and is dropped with it.
pub struct GlyphCache {
    rasterizer: GlyphRasterizer,
    cache: HashMap<GlyphKey, RasterizedGlyph>,
    /// Cache hits
    pub hits: u64,
    /// Cache misses
    pub misses: u64,
}

impl GlyphCache {
    /// Create an empty cache around a rasterizer
    pub fn new(rasterizer: GlyphRasterizer) -> Self {
        Self {
            rasterizer,
            cache: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Get a rasterized glyph, rasterizing it on first use
    pub fn rasterize(&mut self, font: &FontHandle, glyph_id: u16) -> Result<&RasterizedGlyph> {
        let key = GlyphKey {
            role: font.role(),
            glyph_id,
            size_px: font.pixel_size(),
        };

        match self.cache.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                self.misses += 1;
                let glyph = self.rasterizer.rasterize(font, glyph_id)?;
                Ok(entry.insert(glyph))
            }
        }
    }

    /// Number of cached glyphs
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Hit rate (0.0 - 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new(GlyphRasterizer::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache() {
        let cache = GlyphCache::default();
        assert!(cache.is_empty());
        assert_eq!(cache.hit_rate(), 0.0);
    }
}
