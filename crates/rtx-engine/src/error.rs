//! Render errors

use std::fmt;

use rtx_render::RenderError;
use rtx_text::TextError;

/// What went wrong, independent of which layer reported it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid canvas size or font size
    Configuration,
    /// Text or emoji font unreadable or corrupt
    FontLoad,
    /// No fixed size could be selected on a bitmap-strike font
    StrikeSelect,
    /// Input text is not valid Unicode
    TextConversion,
    /// Word-break setup failed
    Segmentation,
    /// A run produced no glyphs, or a glyph could not be rasterized
    Shaping,
    /// A glyph would be drawn outside the canvas
    BoundsViolation,
    /// Output file could not be written
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::FontLoad => "FontLoadError",
            ErrorKind::StrikeSelect => "StrikeSelectError",
            ErrorKind::TextConversion => "TextConversionError",
            ErrorKind::Segmentation => "SegmentationError",
            ErrorKind::Shaping => "ShapingError",
            ErrorKind::BoundsViolation => "BoundsViolationError",
            ErrorKind::Io => "IOError",
        };
        f.write_str(name)
    }
}

/// Render error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Text(#[from] TextError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::Text(err) => text_kind(err),
            Error::Render(err) => match err {
                RenderError::InvalidSize { .. } => ErrorKind::Configuration,
                RenderError::BoundsViolation { .. } => ErrorKind::BoundsViolation,
                RenderError::Text(err) => text_kind(err),
                RenderError::Io { .. } | RenderError::Encode { .. } => ErrorKind::Io,
            },
        }
    }
}

fn text_kind(err: &TextError) -> ErrorKind {
    match err {
        TextError::FontLoad { .. } | TextError::FontParsing(_) => ErrorKind::FontLoad,
        TextError::StrikeSelect(_) => ErrorKind::StrikeSelect,
        TextError::TextConversion(_) => ErrorKind::TextConversion,
        TextError::Segmentation(_) => ErrorKind::Segmentation,
        TextError::ShapingFailed(_) | TextError::RasterizationFailed(_) => ErrorKind::Shaping,
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_through_layers() {
        let err = Error::from(RenderError::Text(TextError::ShapingFailed("x".into())));
        assert_eq!(err.kind(), ErrorKind::Shaping);

        let err = Error::from(TextError::StrikeSelect("x".into()));
        assert_eq!(err.kind(), ErrorKind::StrikeSelect);

        let err = Error::from(RenderError::InvalidSize { width: 0, height: 1 });
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = Error::from(RenderError::BoundsViolation { x: 5, y: 0, width: 4, height: 4 });
        assert_eq!(err.kind(), ErrorKind::BoundsViolation);
    }

    #[test]
    fn test_message_is_readable() {
        let err = Error::from(RenderError::BoundsViolation { x: 5, y: 0, width: 4, height: 4 });
        assert_eq!(err.to_string(), "Write at (5, 0) is outside the 4x4 canvas");
        assert_eq!(err.kind().to_string(), "BoundsViolationError");
    }
}
