//! Pipeline driver
//!
//! One render call walks `Init -> FontsLoaded -> Segmented ->
//! RunProcessing(n)* -> Encoded -> Done`. Any error moves the pipeline to
//! `Failed` and skips the remaining steps; there is no partial output.
//! Fonts, buffers and the canvas are owned by the call and dropped on
//! every exit path.

use std::fmt;
use std::path::{Path, PathBuf};

use rtx_render::{Canvas, Compositor, OutputFormat, PenPosition};
use rtx_text::{
    FontHandle, FontSet, GlyphCache, Measurer, Run, RunKind, Segmenter, TextBuffer, TextExtent,
    TextShaper,
};

use crate::{RenderConfig, RenderRequest, Result};

/// Pipeline states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    FontsLoaded,
    Segmented,
    /// Shaping and compositing run `n` (zero-based)
    RunProcessing(usize),
    Encoded,
    Done,
    Failed,
}

impl PipelineState {
    /// Whether the pipeline has stopped
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Init => f.write_str("INIT"),
            PipelineState::FontsLoaded => f.write_str("FONTS_LOADED"),
            PipelineState::Segmented => f.write_str("SEGMENTED"),
            PipelineState::RunProcessing(n) => write!(f, "RUN_PROCESSING({n})"),
            PipelineState::Encoded => f.write_str("ENCODED"),
            PipelineState::Done => f.write_str("DONE"),
            PipelineState::Failed => f.write_str("FAILED"),
        }
    }
}

/// What a successful render produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    /// Runs drawn
    pub runs: usize,
    /// Glyphs drawn (placeholders excluded)
    pub glyphs: usize,
    /// Code points neither font covered
    pub missing_glyphs: usize,
    /// Pen after the last run
    pub pen: PenPosition,
    pub output: PathBuf,
    pub format: OutputFormat,
}

/// Drives one render request through the pipeline states
pub struct Pipeline<'a> {
    config: &'a RenderConfig,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            state: PipelineState::Init,
            history: vec![PipelineState::Init],
        }
    }

    /// Current state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Every state visited, in order
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Render the request to its output file
    pub fn run(&mut self, request: &RenderRequest) -> Result<RenderSummary> {
        match self.execute(request) {
            Ok(summary) => Ok(summary),
            Err(err) => {
                tracing::debug!("Render failed in {}: {}", self.state, err);
                self.transition(PipelineState::Failed);
                Err(err)
            }
        }
    }

    fn execute(&mut self, request: &RenderRequest) -> Result<RenderSummary> {
        request.validate()?;
        let mut canvas = Canvas::new(request.width, request.height)?;

        let fonts = load_fonts(request, self.config)?;
        self.transition(PipelineState::FontsLoaded);

        let (buffer, runs) = prepare_text(request, self.config)?;
        self.transition(PipelineState::Segmented);

        let shaper = TextShaper::new().language(&self.config.locale);
        let mut cache = GlyphCache::default();

        if self.config.preflight_measure {
            let extent = Measurer::new(&shaper).measure(&buffer, &runs, &fonts, &mut cache)?;
            if !extent.fits(canvas.width(), canvas.height()) {
                tracing::warn!(
                    "Text needs {}x{} but the canvas is {}x{}",
                    extent.width,
                    extent.height,
                    canvas.width(),
                    canvas.height()
                );
            }
        }

        let compositor = Compositor::new();
        let mut pen = PenPosition::origin();
        let mut glyphs = 0;
        let mut missing_glyphs = 0;

        for (index, run) in runs.iter().enumerate() {
            self.transition(PipelineState::RunProcessing(index));

            let shaped = shaper.shape(
                run.text(&buffer),
                fonts.get(run.kind),
                Some(fonts.fallback(run.kind)),
            )?;
            pen = compositor.composite(&mut canvas, &shaped, &fonts, &mut cache, pen)?;

            glyphs += shaped.shaped_count();
            missing_glyphs += shaped.missing;
        }

        let format = rtx_render::encode(&canvas, &request.output)?;
        self.transition(PipelineState::Encoded);

        tracing::debug!(
            "Glyph cache: {} glyphs, {:.0}% hits",
            cache.len(),
            cache.hit_rate() * 100.0
        );
        self.transition(PipelineState::Done);

        Ok(RenderSummary {
            runs: runs.len(),
            glyphs,
            missing_glyphs,
            pen,
            output: request.output.clone(),
            format,
        })
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!("Pipeline {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
    }
}

/// Load the text font, then the emoji font with its closest strike
///
/// The emoji font is not touched when the text font fails.
pub(crate) fn load_fonts(request: &RenderRequest, config: &RenderConfig) -> Result<FontSet> {
    let text = load_font(&request.text_font, request.font_size, RunKind::Text, config)?;
    let emoji = load_font(&request.emoji_font, request.font_size, RunKind::Emoji, config)?;
    Ok(FontSet::new(text, emoji))
}

fn load_font(
    path: &Path,
    font_size: u32,
    role: RunKind,
    config: &RenderConfig,
) -> Result<FontHandle> {
    let mut font = FontHandle::load(path, font_size, role)?
        .with_strike_scaling(config.scale_color_strikes);
    font.select_closest_strike()?;
    Ok(font)
}

/// Normalize and segment the request text
pub(crate) fn prepare_text(request: &RenderRequest, config: &RenderConfig) -> Result<(TextBuffer, Vec<Run>)> {
    let buffer = request.text.to_buffer()?;
    let segmenter = Segmenter::with_locale(&config.locale)?.classification(config.classification);
    let runs = segmenter.segment(&buffer);
    tracing::debug!("Segmented {} code points into {} runs", buffer.char_count(), runs.len());
    Ok((buffer, runs))
}

/// Measure the request text without drawing
pub(crate) fn measure(request: &RenderRequest, config: &RenderConfig) -> Result<TextExtent> {
    if request.font_size == 0 {
        return Err(crate::Error::Configuration("font size must be positive".into()));
    }
    let fonts = load_fonts(request, config)?;
    let (buffer, runs) = prepare_text(request, config)?;
    let shaper = TextShaper::new().language(&config.locale);
    let mut cache = GlyphCache::default();
    Ok(Measurer::new(&shaper).measure(&buffer, &runs, &fonts, &mut cache)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_state_display() {
        assert_eq!(PipelineState::RunProcessing(2).to_string(), "RUN_PROCESSING(2)");
        assert_eq!(PipelineState::FontsLoaded.to_string(), "FONTS_LOADED");
        assert!(PipelineState::Failed.is_terminal());
        assert!(!PipelineState::Encoded.is_terminal());
    }

    #[test]
    fn test_invalid_request_fails_from_init() {
        let config = RenderConfig::default();
        let request = RenderRequest::new("Hi", 32, "/nonexistent/a.ttf", "/nonexistent/b.ttf", 0, 10, "/nonexistent/out.png");
        let mut pipeline = Pipeline::new(&config);

        let err = pipeline.run(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(pipeline.history(), &[PipelineState::Init, PipelineState::Failed]);
    }

    #[test]
    fn test_missing_text_font_fails_before_fonts_loaded() {
        let config = RenderConfig::default();
        let request = RenderRequest::new("Hi", 32, "/nonexistent/a.ttf", "/nonexistent/b.ttf", 10, 10, "/nonexistent/out.png");
        let mut pipeline = Pipeline::new(&config);

        match pipeline.run(&request).unwrap_err() {
            crate::Error::Text(rtx_text::TextError::FontLoad { role, .. }) => assert_eq!(role, RunKind::Text),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(pipeline.state(), PipelineState::Failed);
        assert!(!pipeline.history().contains(&PipelineState::FontsLoaded));
    }
}
