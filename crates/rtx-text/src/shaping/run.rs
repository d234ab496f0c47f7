//! Shaped text run

use crate::RunKind;

/// A shaped glyph with position
///
/// Advances and offsets are 26.6 fixed point pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedGlyph {
    /// Glyph ID in the source font (0 for a placeholder)
    pub glyph_id: u16,
    /// Horizontal advance
    pub x_advance: i32,
    /// Vertical advance
    pub y_advance: i32,
    /// X offset from the pen position
    pub x_offset: i32,
    /// Y offset from the baseline (positive is up)
    pub y_offset: i32,
    /// Byte offset of the cluster within the run text
    pub cluster: u32,
    /// Font that produced the glyph
    pub source: RunKind,
}

impl PositionedGlyph {
    /// Zero-advance stand-in for a code point no font covers
    pub fn placeholder(cluster: u32, source: RunKind) -> Self {
        Self {
            glyph_id: 0,
            x_advance: 0,
            y_advance: 0,
            x_offset: 0,
            y_offset: 0,
            cluster,
            source,
        }
    }

    /// Whether this glyph stands in for a missing one
    pub fn is_placeholder(&self) -> bool {
        self.glyph_id == 0
    }

    /// Horizontal advance in whole pixels
    pub fn advance_px(&self) -> i32 {
        self.x_advance >> 6
    }
}

/// A run of shaped glyphs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapedRun {
    /// Kind of the run that was shaped
    pub kind: RunKind,
    /// The shaped glyphs, in visual order
    pub glyphs: Vec<PositionedGlyph>,
    /// Code points no font could cover
    pub missing: usize,
}

impl ShapedRun {
    /// Create an empty run
    pub fn empty(kind: RunKind) -> Self {
        Self {
            kind,
            glyphs: Vec::new(),
            missing: 0,
        }
    }

    /// Sum of advances in 26.6 fixed point
    pub fn total_advance(&self) -> i64 {
        self.glyphs.iter().map(|g| i64::from(g.x_advance)).sum()
    }

    /// Width in pixels as the pen will travel it
    pub fn width_px(&self) -> i64 {
        self.glyphs.iter().map(|g| i64::from(g.advance_px())).sum()
    }

    /// Glyphs that are not placeholders
    pub fn shaped_count(&self) -> usize {
        self.glyphs.iter().filter(|g| !g.is_placeholder()).count()
    }

    /// Number of glyphs
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(glyph_id: u16, x_advance: i32) -> PositionedGlyph {
        PositionedGlyph {
            glyph_id,
            x_advance,
            ..PositionedGlyph::placeholder(0, RunKind::Text)
        }
    }

    #[test]
    fn test_advance_truncates_per_glyph() {
        // 10.5px + 10.5px travels 20px, not 21px
        let run = ShapedRun {
            kind: RunKind::Text,
            glyphs: vec![glyph(3, 672), glyph(4, 672)],
            missing: 0,
        };
        assert_eq!(run.total_advance(), 1344);
        assert_eq!(run.width_px(), 20);
    }

    #[test]
    fn test_placeholder() {
        let p = PositionedGlyph::placeholder(5, RunKind::Emoji);
        assert!(p.is_placeholder());
        assert_eq!(p.advance_px(), 0);

        let run = ShapedRun {
            kind: RunKind::Text,
            glyphs: vec![glyph(3, 640), p],
            missing: 1,
        };
        assert_eq!(run.shaped_count(), 1);
        assert_eq!(run.len(), 2);
    }
}
