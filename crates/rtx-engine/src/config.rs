//! Render configuration and requests

use std::path::PathBuf;

use rtx_text::{Segmenter, SpanClassification, TextBuffer};

use crate::{Error, Result};

/// Renderer options that are not part of a single request
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Word-break locale
    pub locale: String,

    /// How a word span picks its run kind
    pub classification: SpanClassification,

    /// Resample bitmap-strike glyphs to the requested pixel size
    pub scale_color_strikes: bool,

    /// Measure the text before drawing and log the extent
    pub preflight_measure: bool,
}

impl RenderConfig {
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn classification(mut self, classification: SpanClassification) -> Self {
        self.classification = classification;
        self
    }

    pub fn scale_color_strikes(mut self, scale: bool) -> Self {
        self.scale_color_strikes = scale;
        self
    }

    pub fn preflight_measure(mut self, measure: bool) -> Self {
        self.preflight_measure = measure;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            locale: Segmenter::ROOT_LOCALE.to_string(),
            classification: SpanClassification::default(),
            scale_color_strikes: true,
            preflight_measure: false,
        }
    }
}

/// Text to render, in the encoding the caller has it in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    Utf8(String),
    /// UTF-16 code units, surrogate pairs allowed
    Utf16(Vec<u16>),
    /// Unicode scalar values
    CodePoints(Vec<u32>),
}

impl TextInput {
    /// Convert to a normalized text buffer
    pub fn to_buffer(&self) -> rtx_text::Result<TextBuffer> {
        match self {
            TextInput::Utf8(text) => Ok(TextBuffer::new(text)),
            TextInput::Utf16(units) => TextBuffer::from_utf16(units),
            TextInput::CodePoints(code_points) => TextBuffer::from_code_points(code_points),
        }
    }
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        TextInput::Utf8(text.to_string())
    }
}

impl From<String> for TextInput {
    fn from(text: String) -> Self {
        TextInput::Utf8(text)
    }
}

/// One render call: what to draw, with which fonts, and where
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub text: TextInput,
    /// Requested glyph size in pixels
    pub font_size: u32,
    pub text_font: PathBuf,
    pub emoji_font: PathBuf,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    pub output: PathBuf,
}

impl RenderRequest {
    pub fn new(
        text: impl Into<TextInput>,
        font_size: u32,
        text_font: impl Into<PathBuf>,
        emoji_font: impl Into<PathBuf>,
        width: u32,
        height: u32,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            text: text.into(),
            font_size,
            text_font: text_font.into(),
            emoji_font: emoji_font.into(),
            width,
            height,
            output: output.into(),
        }
    }

    /// Check the request before anything is loaded
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Configuration(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.font_size == 0 {
            return Err(Error::Configuration("font size must be positive".into()));
        }
        Ok(())
    }
}
