//! Text buffer and word-boundary segmentation
//!
//! Text is NFC-normalized once, then split at UAX #29 word boundaries.
//! Each boundary span becomes a [`Run`] tagged text or emoji.

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::font::emoji::{is_emoji, is_emoji_component};
use crate::{Result, RunKind, TextError};

/// Immutable, normalized input text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    char_count: usize,
}

impl TextBuffer {
    /// Normalize UTF-8 text (NFC)
    pub fn new(text: &str) -> Self {
        let text: String = text.nfc().collect();
        let char_count = text.chars().count();
        Self { text, char_count }
    }

    /// Convert UTF-16 code units, rejecting unpaired surrogates
    pub fn from_utf16(units: &[u16]) -> Result<Self> {
        String::from_utf16(units)
            .map(|text| Self::new(&text))
            .map_err(|e| TextError::TextConversion(e.to_string()))
    }

    /// Convert Unicode scalar values, rejecting surrogates and out-of-range values
    pub fn from_code_points(code_points: &[u32]) -> Result<Self> {
        let text = code_points
            .iter()
            .enumerate()
            .map(|(i, &cp)| {
                char::from_u32(cp).ok_or_else(|| {
                    TextError::TextConversion(format!("invalid code point U+{cp:04X} at index {i}"))
                })
            })
            .collect::<Result<String>>()?;
        Ok(Self::new(&text))
    }

    /// Normalized text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes (the offset space of runs)
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of code points
    pub fn char_count(&self) -> usize {
        self.char_count
    }
}

/// A span of the buffer rendered with one font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    pub kind: RunKind,
}

impl Run {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Text covered by this run
    pub fn text<'a>(&self, buffer: &'a TextBuffer) -> &'a str {
        &buffer.as_str()[self.start..self.end]
    }
}

/// How a word-boundary span is assigned its kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpanClassification {
    /// The whole span takes the kind of its first code point
    #[default]
    FirstCodePoint,
    /// Split spans wherever the emoji property changes; emoji
    /// components (ZWJ, VS16, skin tones, tags) stay with their sequence
    PerCodePoint,
}

/// Word-boundary segmenter
#[derive(Debug, Clone)]
pub struct Segmenter {
    locale: String,
    classification: SpanClassification,
}

impl Segmenter {
    /// Language-neutral locale
    pub const ROOT_LOCALE: &'static str = "root";

    /// Create a segmenter for the root locale
    pub fn new() -> Self {
        Self {
            locale: Self::ROOT_LOCALE.to_string(),
            classification: SpanClassification::default(),
        }
    }

    /// Create a segmenter for a BCP 47 style locale tag
    ///
    /// Boundaries follow the default UAX #29 rules for every locale.
    pub fn with_locale(locale: &str) -> Result<Self> {
        validate_locale(locale)?;
        if !locale.eq_ignore_ascii_case(Self::ROOT_LOCALE) {
            tracing::debug!("No word-break tailoring for locale '{}', using root rules", locale);
        }
        Ok(Self {
            locale: locale.to_string(),
            classification: SpanClassification::default(),
        })
    }

    /// Set span classification
    pub fn classification(mut self, classification: SpanClassification) -> Self {
        self.classification = classification;
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Split the buffer into contiguous runs covering `[0, len)`
    pub fn segment(&self, buffer: &TextBuffer) -> Vec<Run> {
        let text = buffer.as_str();
        let mut runs = Vec::new();

        for (start, word) in text.split_word_bound_indices() {
            let end = start + word.len();
            match self.classification {
                SpanClassification::FirstCodePoint => {
                    let kind = word.chars().next().map_or(RunKind::Text, kind_of);
                    runs.push(Run { start, end, kind });
                }
                SpanClassification::PerCodePoint => split_by_kind(word, start, &mut runs),
            }
        }

        tracing::trace!("Segmented {} bytes into {} runs", text.len(), runs.len());
        runs
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

fn kind_of(c: char) -> RunKind {
    if is_emoji(c) { RunKind::Emoji } else { RunKind::Text }
}

fn split_by_kind(word: &str, offset: usize, runs: &mut Vec<Run>) {
    let mut current: Option<Run> = None;

    for (i, c) in word.char_indices() {
        let at = offset + i;
        let kind = match current {
            Some(run) if is_emoji_component(c) => run.kind,
            _ => kind_of(c),
        };
        match current {
            Some(ref mut run) if run.kind == kind => run.end = at + c.len_utf8(),
            _ => {
                runs.extend(current.take());
                current = Some(Run { start: at, end: at + c.len_utf8(), kind });
            }
        }
    }
    runs.extend(current);
}

fn validate_locale(locale: &str) -> Result<()> {
    let valid = !locale.is_empty()
        && locale.split(['-', '_']).all(|subtag| {
            (1..=8).contains(&subtag.len()) && subtag.bytes().all(|b| b.is_ascii_alphanumeric())
        });
    if valid {
        Ok(())
    } else {
        Err(TextError::Segmentation(format!("invalid locale '{locale}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(buffer: &TextBuffer, runs: &[Run]) -> Vec<(String, RunKind)> {
        runs.iter().map(|r| (r.text(buffer).to_string(), r.kind)).collect()
    }

    fn assert_covers(buffer: &TextBuffer, runs: &[Run]) {
        let mut expected_start = 0;
        for run in runs {
            assert_eq!(run.start, expected_start, "gap or overlap at {}", run.start);
            assert!(run.end > run.start, "empty run at {}", run.start);
            expected_start = run.end;
        }
        assert_eq!(expected_start, buffer.len());
    }

    #[test]
    fn test_empty_input() {
        let buffer = TextBuffer::new("");
        assert!(Segmenter::new().segment(&buffer).is_empty());
    }

    #[test]
    fn test_hi_emoji() {
        let buffer = TextBuffer::new("Hi 😀");
        let runs = Segmenter::new().segment(&buffer);
        assert_eq!(
            kinds(&buffer, &runs),
            vec![
                ("Hi".to_string(), RunKind::Text),
                (" ".to_string(), RunKind::Text),
                ("😀".to_string(), RunKind::Emoji),
            ]
        );
        assert_covers(&buffer, &runs);
    }

    #[test]
    fn test_runs_cover_text() {
        let samples = [
            "hello world",
            "a😀b",
            "👨‍👩‍👧 family, 🇺🇸 flag",
            "Привет, мир! 🎉",
            "中文字符🚀 mixed",
            "  leading and trailing  ",
            "e\u{301}\u{301} combining",
        ];
        for sample in samples {
            let buffer = TextBuffer::new(sample);
            for classification in [SpanClassification::FirstCodePoint, SpanClassification::PerCodePoint] {
                let runs = Segmenter::new().classification(classification).segment(&buffer);
                assert_covers(&buffer, &runs);
            }
        }
    }

    #[test]
    fn test_zwj_sequence_stays_one_emoji_run() {
        let buffer = TextBuffer::new("👨‍👩‍👧");
        let runs = Segmenter::new().segment(&buffer);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].kind, RunKind::Emoji);
    }

    #[test]
    fn test_per_code_point_keeps_components() {
        let buffer = TextBuffer::new("👍🏽");
        let runs = Segmenter::new()
            .classification(SpanClassification::PerCodePoint)
            .segment(&buffer);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].kind, RunKind::Emoji);
    }

    #[test]
    fn test_per_code_point_splits_mixed_span() {
        let mut runs = Vec::new();
        split_by_kind("😀x", 0, &mut runs);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], Run { start: 0, end: 4, kind: RunKind::Emoji });
        assert_eq!(runs[1], Run { start: 4, end: 5, kind: RunKind::Text });
    }

    #[test]
    fn test_normalization() {
        let buffer = TextBuffer::new("e\u{301}");
        assert_eq!(buffer.as_str(), "\u{e9}");
        assert_eq!(buffer.char_count(), 1);
    }

    #[test]
    fn test_from_utf16() {
        let units: Vec<u16> = "Hi 😀".encode_utf16().collect();
        assert_eq!(TextBuffer::from_utf16(&units).unwrap().as_str(), "Hi 😀");

        let err = TextBuffer::from_utf16(&[0x48, 0xD83D]).unwrap_err();
        assert!(matches!(err, TextError::TextConversion(_)));
    }

    #[test]
    fn test_from_code_points() {
        let buffer = TextBuffer::from_code_points(&[0x48, 0x69, 0x1F600]).unwrap();
        assert_eq!(buffer.as_str(), "Hi😀");

        assert!(TextBuffer::from_code_points(&[0xD800]).is_err());
        assert!(TextBuffer::from_code_points(&[0x110000]).is_err());
    }

    #[test]
    fn test_locales() {
        assert!(Segmenter::with_locale("root").is_ok());
        assert!(Segmenter::with_locale("ru").is_ok());
        assert!(Segmenter::with_locale("zh-Hant-TW").is_ok());
        assert!(Segmenter::with_locale("en_US").is_ok());

        for bad in ["", "en--US", "toolongsubtag", "ru RU", "ü"] {
            let err = Segmenter::with_locale(bad).unwrap_err();
            assert!(matches!(err, TextError::Segmentation(_)), "{bad:?}");
        }
    }
}
