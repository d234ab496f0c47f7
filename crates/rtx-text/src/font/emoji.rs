//! Emoji code point classification
//!
//! Range tables for the Unicode `Emoji` property, minus the ASCII keycap
//! bases (`#`, `*`, `0`-`9`) which only render as emoji inside a keycap
//! sequence and otherwise belong to the text font.

/// Check if character is an emoji
pub fn is_emoji(c: char) -> bool {
    matches!(c as u32,
        0x00A9 | 0x00AE      |  // Copyright, Registered
        0x203C | 0x2049      |  // Double exclamation, Interrobang
        0x2122 | 0x2139      |  // Trade Mark, Information
        0x2194..=0x2199      |  // Arrows
        0x21A9..=0x21AA      |  // Hooked arrows
        0x231A..=0x231B      |  // Watch, Hourglass
        0x2328 | 0x23CF      |  // Keyboard, Eject
        0x23E9..=0x23F3      |  // Media control
        0x23F8..=0x23FA      |  // Misc
        0x24C2               |  // Circled M
        0x25AA..=0x25AB      |  // Squares
        0x25B6 | 0x25C0      |  // Play, Reverse buttons
        0x25FB..=0x25FE      |  // Squares
        0x2600..=0x26FF      |  // Misc symbols
        0x2700..=0x27BF      |  // Dingbats
        0x2934..=0x2935      |  // Arrows
        0x2B05..=0x2B07      |  // Arrows
        0x2B1B..=0x2B1C      |  // Squares
        0x2B50 | 0x2B55      |  // Star, Circle
        0x3030 | 0x303D      |  // Wavy Dash, Part Alternation Mark
        0x3297 | 0x3299      |  // Circled ideographs
        0x1F004 | 0x1F0CF    |  // Mahjong, Playing card
        0x1F170..=0x1F171    |  // Negative squared A, B
        0x1F17E..=0x1F17F    |  // Negative squared O, P
        0x1F18E              |  // Negative squared AB
        0x1F191..=0x1F19A    |  // Squared CL .. VS
        0x1F1E6..=0x1F1FF    |  // Regional indicators (flags)
        0x1F201..=0x1F202    |  // Squared katakana
        0x1F21A | 0x1F22F    |  // Squared ideographs
        0x1F232..=0x1F23A    |  // Squared ideographs
        0x1F250..=0x1F251    |  // Circled ideographs
        0x1F300..=0x1F5FF    |  // Misc Symbols and Pictographs
        0x1F600..=0x1F64F    |  // Emoticons
        0x1F680..=0x1F6FF    |  // Transport and Map
        0x1F7E0..=0x1F7EB    |  // Colored circles and squares
        0x1F7F0              |  // Heavy equals
        0x1F900..=0x1F9FF    |  // Supplemental Symbols
        0x1FA70..=0x1FAFF       // Symbols and Pictographs Extended-A
    )
}

/// Check if character is emoji variation selector
pub fn is_emoji_variation_selector(c: char) -> bool {
    c == '\u{FE0F}' || c == '\u{FE0E}'
}

/// Check if character is skin tone modifier
pub fn is_skin_tone_modifier(c: char) -> bool {
    matches!(c, '\u{1F3FB}'..='\u{1F3FF}')
}

/// Check if character is ZWJ (Zero Width Joiner)
pub fn is_zwj(c: char) -> bool {
    c == '\u{200D}'
}

/// Check if character is a tag character (subdivision flag sequences)
pub fn is_tag(c: char) -> bool {
    matches!(c, '\u{E0020}'..='\u{E007F}')
}

/// Characters that only continue an emoji sequence and never start a run
pub fn is_emoji_component(c: char) -> bool {
    is_emoji_variation_selector(c)
        || is_skin_tone_modifier(c)
        || is_zwj(c)
        || is_tag(c)
        || c == '\u{20E3}' // Combining enclosing keycap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_emoji() {
        assert!(is_emoji('😀'));
        assert!(is_emoji('🚀'));
        assert!(is_emoji('❤'));
        assert!(is_emoji('🇺'));
        assert!(!is_emoji('A'));
        assert!(!is_emoji('中'));
        assert!(!is_emoji(' '));
    }

    #[test]
    fn test_enclosed_supplement_gaps_are_text() {
        for c in ['\u{1F170}', '\u{1F18E}', '\u{1F1E6}', '\u{1F21A}', '\u{1F251}'] {
            assert!(is_emoji(c), "{c:?}");
        }
        // Squared HDR .. UHD and unassigned squared katakana are not emoji
        for c in ['\u{1F172}', '\u{1F19B}', '\u{1F1AD}', '\u{1F203}', '\u{1F20F}'] {
            assert!(!is_emoji(c), "{c:?}");
        }
    }

    #[test]
    fn test_keycap_bases_are_text() {
        for c in ['#', '*', '0', '5', '9'] {
            assert!(!is_emoji(c), "{c:?} should classify as text");
        }
    }

    #[test]
    fn test_components() {
        assert!(is_emoji_component('\u{FE0F}'));
        assert!(is_emoji_component('\u{200D}'));
        assert!(is_emoji_component('\u{1F3FD}'));
        assert!(is_emoji_component('\u{E0067}'));
        assert!(!is_emoji_component('a'));
    }
}
