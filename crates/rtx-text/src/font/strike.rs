//! Embedded bitmap strikes
//!
//! Color emoji fonts usually carry a handful of pre-rendered strikes
//! instead of outlines. ttf-parser picks a strike per glyph lookup but does
//! not enumerate them, so the strike headers are read here directly.

use ttf_parser::{Face, Tag};

const CBLC: Tag = Tag::from_bytes(b"CBLC");
const EBLC: Tag = Tag::from_bytes(b"EBLC");
const SBIX: Tag = Tag::from_bytes(b"sbix");

/// A selected fixed-size strike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    /// Position in the font's strike list
    pub index: usize,
    /// Nominal size in pixels per em
    pub ppem: u16,
}

/// Nominal sizes of every bitmap strike, in table order
///
/// A strike's nominal width is its horizontal ppem, not the pixel width
/// of its bitmaps. Empty for scalable fonts.
pub fn available_strike_sizes(face: &Face<'_>) -> Vec<u16> {
    let raw = face.raw_face();
    raw.table(CBLC)
        .and_then(bitmap_location_sizes)
        .or_else(|| raw.table(SBIX).and_then(sbix_sizes))
        .or_else(|| raw.table(EBLC).and_then(bitmap_location_sizes))
        .unwrap_or_default()
}

/// Index of the strike closest to `requested`
///
/// Ties go to the lowest index.
pub fn closest_strike(sizes: &[u16], requested: u32) -> Option<usize> {
    sizes
        .iter()
        .enumerate()
        .min_by_key(|(_, size)| requested.abs_diff(u32::from(**size)))
        .map(|(index, _)| index)
}

/// CBLC / EBLC: 8 byte header, then 48 byte BitmapSize records.
fn bitmap_location_sizes(data: &[u8]) -> Option<Vec<u16>> {
    const HEADER_LEN: usize = 8;
    const RECORD_LEN: usize = 48;
    // indexSubTableArrayOffset .. colorRef (16) + hori/vert line metrics (24)
    // + start/end glyph (4)
    const PPEM_X: usize = 44;

    let count = read_u32(data, 4)? as usize;
    (0..count)
        .map(|i| data.get(HEADER_LEN + i * RECORD_LEN + PPEM_X).map(|&ppem| u16::from(ppem)))
        .collect()
}

/// sbix: version, flags, strike count, then offsets to `{ppem, ppi, ...}`.
fn sbix_sizes(data: &[u8]) -> Option<Vec<u16>> {
    let count = read_u32(data, 4)? as usize;
    (0..count)
        .map(|i| {
            let offset = read_u32(data, 8 + i * 4)? as usize;
            read_u16(data, offset)
        })
        .collect()
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cblc_with(ppems: &[u8]) -> Vec<u8> {
        let mut data = vec![0, 3, 0, 0];
        data.extend_from_slice(&(ppems.len() as u32).to_be_bytes());
        for &ppem in ppems {
            let mut record = [0u8; 48];
            record[44] = ppem;
            record[45] = ppem;
            record[46] = 32;
            data.extend_from_slice(&record);
        }
        data
    }

    #[test]
    fn test_closest_strike_prefers_nearest() {
        assert_eq!(closest_strike(&[96, 128, 160], 144), Some(1));
        assert_eq!(closest_strike(&[96, 128, 160], 20), Some(0));
        assert_eq!(closest_strike(&[96, 128, 160], 500), Some(2));
        assert_eq!(closest_strike(&[109], 32), Some(0));
    }

    #[test]
    fn test_closest_strike_tie_goes_to_lowest_index() {
        assert_eq!(closest_strike(&[96, 160], 128), Some(0));
        assert_eq!(closest_strike(&[160, 96], 128), Some(0));
    }

    #[test]
    fn test_closest_strike_empty() {
        assert_eq!(closest_strike(&[], 32), None);
    }

    #[test]
    fn test_cblc_sizes() {
        let data = cblc_with(&[109, 136]);
        assert_eq!(bitmap_location_sizes(&data), Some(vec![109, 136]));
    }

    #[test]
    fn test_cblc_size_is_ppem_not_bitmap_width() {
        let mut data = cblc_with(&[109]);
        // hori.widthMax and ppemY disagree with ppemX
        data[8 + 18] = 136;
        data[8 + 45] = 120;
        assert_eq!(bitmap_location_sizes(&data), Some(vec![109]));
    }

    #[test]
    fn test_truncated_cblc() {
        let mut data = cblc_with(&[109]);
        data.truncate(30);
        assert_eq!(bitmap_location_sizes(&data), None);
        assert_eq!(bitmap_location_sizes(&[0, 3]), None);
    }

    #[test]
    fn test_sbix_sizes() {
        let mut data = vec![0, 1, 0, 1];
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(&16u32.to_be_bytes());
        data.extend_from_slice(&20u32.to_be_bytes());
        data.extend_from_slice(&[0, 64, 0, 72]);
        data.extend_from_slice(&[0, 160, 0, 72]);
        assert_eq!(sbix_sizes(&data), Some(vec![64, 160]));
    }
}
