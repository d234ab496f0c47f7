//! Font handle - one loaded font file at a pixel size

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fontdb::{Database, ID, Source};

use super::strike::{self, Strike};
use crate::{Result, RunKind, TextError};

/// A font resource owned for the duration of one render call
///
/// The font bytes live in a private fontdb database holding exactly this
/// file; dropping the handle releases them.
pub struct FontHandle {
    db: Database,
    id: ID,
    path: PathBuf,
    family: String,
    role: RunKind,
    pixel_size: u32,
    strike: Option<Strike>,
    scale_strikes: bool,
}

impl FontHandle {
    /// Load the first face of a font file
    pub fn load(path: &Path, pixel_size: u32, role: RunKind) -> Result<Self> {
        let load_error = |reason: String| TextError::FontLoad {
            role,
            path: path.to_path_buf(),
            reason,
        };

        let data = std::fs::read(path).map_err(|e| load_error(e.to_string()))?;
        let mut db = Database::new();
        let ids = db.load_font_source(Source::Binary(Arc::new(data)));
        let id = *ids
            .first()
            .ok_or_else(|| load_error("no font faces found".into()))?;

        let family = db
            .face(id)
            .map(|info| {
                info.families
                    .first()
                    .map(|(name, _)| name.clone())
                    .unwrap_or_else(|| info.post_script_name.clone())
            })
            .unwrap_or_default();

        tracing::debug!("Loaded {} font '{}' from {} at {}px", role, family, path.display(), pixel_size);

        Ok(Self {
            db,
            id,
            path: path.to_path_buf(),
            family,
            role,
            pixel_size,
            strike: None,
            scale_strikes: true,
        })
    }

    /// Resample strike bitmaps to the requested pixel size (default `true`)
    pub fn with_strike_scaling(mut self, scale: bool) -> Self {
        self.scale_strikes = scale;
        self
    }

    /// Role this font plays in the pipeline
    pub fn role(&self) -> RunKind {
        self.role
    }

    /// Family name (or PostScript name when the font has none)
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Path the font was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Requested pixel size
    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// Selected strike, if any
    pub fn strike(&self) -> Option<Strike> {
        self.strike
    }

    /// Pixel size used for advances and outlines
    ///
    /// Equals the strike size when a strike is drawn at native size.
    pub fn layout_size(&self) -> f32 {
        match self.strike {
            Some(strike) if !self.scale_strikes => f32::from(strike.ppem),
            _ => self.pixel_size as f32,
        }
    }

    /// Factor from a bitmap's native ppem to drawn pixels
    pub fn strike_scale(&self, native_ppem: u16) -> f32 {
        if self.scale_strikes && native_ppem > 0 {
            self.pixel_size as f32 / f32::from(native_ppem)
        } else {
            1.0
        }
    }

    /// Horizontal ppem of each fixed strike (empty for scalable fonts)
    pub fn available_strike_sizes(&self) -> Result<Vec<u16>> {
        self.with_face(|face| strike::available_strike_sizes(face))
    }

    /// Use strike `index` for every glyph drawn with this font
    pub fn select_strike(&mut self, index: usize) -> Result<Strike> {
        let sizes = self.available_strike_sizes()?;
        let ppem = sizes.get(index).copied().ok_or_else(|| {
            TextError::StrikeSelect(format!(
                "strike {} out of range ({} available) in {}",
                index,
                sizes.len(),
                self.path.display()
            ))
        })?;
        if ppem == 0 {
            return Err(TextError::StrikeSelect(format!(
                "strike {} of {} has zero size",
                index,
                self.path.display()
            )));
        }

        let strike = Strike { index, ppem };
        self.strike = Some(strike);
        Ok(strike)
    }

    /// Select the strike closest to the requested pixel size
    ///
    /// Returns `None` for scalable fonts, which need no strike.
    pub fn select_closest_strike(&mut self) -> Result<Option<Strike>> {
        let sizes = self.available_strike_sizes()?;
        match strike::closest_strike(&sizes, self.pixel_size) {
            Some(index) => {
                let strike = self.select_strike(index)?;
                tracing::debug!(
                    "Selected strike {} ({}px) of {} for {}px",
                    strike.index,
                    strike.ppem,
                    self.family,
                    self.pixel_size
                );
                Ok(Some(strike))
            }
            None => Ok(None),
        }
    }

    /// Glyph id for a character, if the font covers it
    pub fn glyph_index(&self, c: char) -> Option<u16> {
        self.with_face(|face| face.glyph_index(c).map(|id| id.0))
            .ok()
            .flatten()
    }

    /// Run `f` with the parsed ttf-parser face
    pub fn with_face<R>(&self, f: impl FnOnce(&ttf_parser::Face<'_>) -> R) -> Result<R> {
        self.db
            .with_face_data(self.id, |data, index| {
                ttf_parser::Face::parse(data, index)
                    .map(|face| f(&face))
                    .map_err(|e| TextError::FontParsing(format!("{}: {}", self.path.display(), e)))
            })
            .ok_or_else(|| self.missing_face())?
    }

    /// Run `f` with the rustybuzz shaping face
    pub fn with_shaping_face<R>(&self, f: impl FnOnce(&rustybuzz::Face<'_>) -> R) -> Result<R> {
        self.db
            .with_face_data(self.id, |data, index| {
                rustybuzz::Face::from_slice(data, index)
                    .map(|face| f(&face))
                    .ok_or_else(|| TextError::FontParsing(format!("{}: not shapeable", self.path.display())))
            })
            .ok_or_else(|| self.missing_face())?
    }

    fn missing_face(&self) -> TextError {
        TextError::FontParsing(format!("{}: face data unavailable", self.path.display()))
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("family", &self.family)
            .field("path", &self.path)
            .field("role", &self.role)
            .field("pixel_size", &self.pixel_size)
            .field("strike", &self.strike)
            .finish()
    }
}
