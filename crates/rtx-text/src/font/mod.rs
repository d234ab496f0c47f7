//! Font loading, strike selection and emoji classification

mod handle;
pub mod emoji;
pub mod strike;

pub use handle::FontHandle;
pub use strike::Strike;

use crate::RunKind;

/// The text font and the emoji font of one render call
#[derive(Debug)]
pub struct FontSet {
    text: FontHandle,
    emoji: FontHandle,
}

impl FontSet {
    /// Pair a text font with an emoji font
    pub fn new(text: FontHandle, emoji: FontHandle) -> Self {
        Self { text, emoji }
    }

    /// Font serving runs of `kind`
    pub fn get(&self, kind: RunKind) -> &FontHandle {
        match kind {
            RunKind::Text => &self.text,
            RunKind::Emoji => &self.emoji,
        }
    }

    /// Font tried when the primary font for `kind` lacks a glyph
    pub fn fallback(&self, kind: RunKind) -> &FontHandle {
        self.get(kind.other())
    }
}
