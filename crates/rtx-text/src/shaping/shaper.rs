//! Text shaper using rustybuzz

use std::str::FromStr;

use rustybuzz::{UnicodeBuffer, shape};

use super::{PositionedGlyph, ShapedRun};
use crate::font::FontHandle;
use crate::{Result, TextError};

/// Text shaper using HarfBuzz (via rustybuzz)
///
/// Always shapes left to right; script is guessed per run.
#[derive(Debug, Clone, Default)]
pub struct TextShaper {
    /// Language for shaping
    language: Option<rustybuzz::Language>,
}

impl TextShaper {
    /// Create a new text shaper
    pub fn new() -> Self {
        Self { language: None }
    }

    /// Set language (for automatic feature selection)
    ///
    /// Unknown tags and the root locale leave the language unset.
    pub fn language(mut self, language: &str) -> Self {
        self.language = if language.eq_ignore_ascii_case("root") {
            None
        } else {
            rustybuzz::Language::from_str(&language.replace('_', "-")).ok()
        };
        self
    }

    /// Shape one run with its font, falling back per code point
    ///
    /// Code points neither font covers become zero-advance placeholders.
    /// Fails only when a non-empty run yields no real glyph at all.
    pub fn shape(
        &self,
        text: &str,
        font: &FontHandle,
        fallback: Option<&FontHandle>,
    ) -> Result<ShapedRun> {
        let kind = font.role();
        let mut run = ShapedRun::empty(kind);
        if text.is_empty() {
            return Ok(run);
        }

        let size = font.layout_size();
        let primary = font.with_shaping_face(|face| {
            let mut buffer = UnicodeBuffer::new();
            buffer.push_str(text);
            buffer.set_direction(rustybuzz::Direction::LeftToRight);
            if let Some(ref lang) = self.language {
                buffer.set_language(lang.clone());
            }
            buffer.guess_segment_properties();

            let output = shape(face, &[], buffer);
            let upem = face.units_per_em() as f32;

            output
                .glyph_infos()
                .iter()
                .zip(output.glyph_positions())
                .map(|(info, pos)| PositionedGlyph {
                    glyph_id: info.glyph_id as u16,
                    x_advance: to_fixed(pos.x_advance, size, upem),
                    y_advance: to_fixed(pos.y_advance, size, upem),
                    x_offset: to_fixed(pos.x_offset, size, upem),
                    y_offset: to_fixed(pos.y_offset, size, upem),
                    cluster: info.cluster,
                    source: kind,
                })
                .collect::<Vec<_>>()
        })?;

        let mut last_missing = None;
        for glyph in primary {
            if !glyph.is_placeholder() {
                run.glyphs.push(glyph);
                continue;
            }
            // Several .notdef glyphs in one cluster resolve once
            if last_missing == Some(glyph.cluster) {
                run.glyphs.push(PositionedGlyph::placeholder(glyph.cluster, kind));
                continue;
            }
            last_missing = Some(glyph.cluster);

            let c = text
                .get(glyph.cluster as usize..)
                .and_then(|rest| rest.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            let resolved = match fallback {
                Some(fallback) => fallback_glyph(fallback, c, glyph.cluster)?,
                None => None,
            };

            match resolved {
                Some(substitute) => {
                    tracing::trace!("U+{:04X} -> {} (fallback)", c as u32, fallback.map_or("", |f| f.family()));
                    run.glyphs.push(substitute);
                }
                None => {
                    tracing::warn!("Missing glyph for code point U+{:04X}", c as u32);
                    run.missing += 1;
                    run.glyphs.push(PositionedGlyph::placeholder(glyph.cluster, kind));
                }
            }
        }

        if run.shaped_count() == 0 {
            return Err(TextError::ShapingFailed(format!(
                "no glyph for {:?} in {} font '{}'",
                text,
                kind,
                font.family()
            )));
        }

        Ok(run)
    }
}

/// Look up a single code point in the fallback font
fn fallback_glyph(font: &FontHandle, c: char, cluster: u32) -> Result<Option<PositionedGlyph>> {
    let size = font.layout_size();
    font.with_face(|face| {
        let id = face.glyph_index(c).filter(|id| id.0 != 0)?;
        let advance = face.glyph_hor_advance(id).unwrap_or(0);
        Some(PositionedGlyph {
            glyph_id: id.0,
            x_advance: to_fixed(i32::from(advance), size, f32::from(face.units_per_em())),
            y_advance: 0,
            x_offset: 0,
            y_offset: 0,
            cluster,
            source: font.role(),
        })
    })
}

/// Font units to 26.6 fixed point pixels
fn to_fixed(units: i32, pixel_size: f32, units_per_em: f32) -> i32 {
    if units_per_em <= 0.0 {
        return 0;
    }
    (units as f32 * pixel_size * 64.0 / units_per_em).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed() {
        // 1000 units at 32px / 2048 upem = 15.625px
        assert_eq!(to_fixed(1000, 32.0, 2048.0), 1000);
        assert_eq!(to_fixed(2048, 32.0, 2048.0), 32 * 64);
        assert_eq!(to_fixed(0, 32.0, 2048.0), 0);
        assert_eq!(to_fixed(100, 32.0, 0.0), 0);
    }

    #[test]
    fn test_language() {
        assert!(TextShaper::new().language("root").language.is_none());
        assert!(TextShaper::new().language("ru").language.is_some());
        assert!(TextShaper::new().language("en_US").language.is_some());
    }
}
