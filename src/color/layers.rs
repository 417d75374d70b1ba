use std::ops::Range;

use crate::color::{read_u16, read_u32};
use crate::error::{FontError, FontResult};
use crate::glyph_id::GlyphId;

/// Palette entry index meaning "paint with the current foreground color".
pub const FOREGROUND_ENTRY: u16 = 0xFFFF;

const HEADER_LEN: usize = 14;
const BASE_RECORD_LEN: usize = 6;
const LAYER_RECORD_LEN: usize = 4;

/// One `COLR` base glyph record: `glyph` is drawn as `count` layers starting at `first`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseGlyph {
    pub glyph: GlyphId,
    pub first: u16,
    pub count: u16,
}

/// Version 0 `COLR` data.
///
/// `glyph_layers[i]` and `glyph_palettes[i]` together describe layer `i`:
/// the sub-glyph outline and the palette entry it is filled with.
/// Layer order is paint order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerTable {
    /// Sorted by glyph id.
    base_glyphs: Vec<BaseGlyph>,
    glyph_layers: Vec<GlyphId>,
    glyph_palettes: Vec<u16>,
}

impl LayerTable {
    /// Builds a table from already decoded records.
    ///
    /// `layers` holds `(sub glyph, palette entry)` pairs. Base records do not
    /// need to be sorted.
    pub fn new(mut base_glyphs: Vec<BaseGlyph>, layers: Vec<(GlyphId, u16)>) -> Self {
        base_glyphs.sort_by_key(|base| base.glyph);
        let (glyph_layers, glyph_palettes) = layers.into_iter().unzip();

        Self {
            base_glyphs,
            glyph_layers,
            glyph_palettes,
        }
    }

    /// Parses the version 0 part of a `COLR` table.
    ///
    /// Version 1 tables are accepted; only their version 0 records are read.
    pub fn parse(data: &[u8]) -> FontResult<Self> {
        let malformed = |reason| FontError::MalformedTable {
            table: "COLR",
            reason,
        };

        if data.len() < HEADER_LEN {
            return Err(malformed("header truncated"));
        }

        let version = read_u16(data, 0).ok_or(malformed("header truncated"))?;
        if version > 1 {
            return Err(malformed("unsupported version"));
        }

        let num_base = read_u16(data, 2).ok_or(malformed("header truncated"))? as usize;
        let base_offset = read_u32(data, 4).ok_or(malformed("header truncated"))? as usize;
        let layer_offset = read_u32(data, 8).ok_or(malformed("header truncated"))? as usize;
        let num_layers = read_u16(data, 12).ok_or(malformed("header truncated"))? as usize;

        let mut base_glyphs = Vec::with_capacity(num_base);
        for i in 0..num_base {
            let record = read_base_glyph(data, base_offset + i * BASE_RECORD_LEN)
                .ok_or(malformed("base glyph records truncated"))?;
            base_glyphs.push(record);
        }

        let mut glyph_layers = Vec::with_capacity(num_layers);
        let mut glyph_palettes = Vec::with_capacity(num_layers);
        for i in 0..num_layers {
            let at = layer_offset + i * LAYER_RECORD_LEN;
            let (Some(glyph), Some(entry)) = (read_u16(data, at), read_u16(data, at + 2)) else {
                return Err(malformed("layer records truncated"));
            };
            glyph_layers.push(GlyphId(glyph));
            glyph_palettes.push(entry);
        }

        // The format requires sorted records, but binary search must not depend on it.
        if !base_glyphs.is_sorted_by_key(|base| base.glyph) {
            log::warn!("COLR base glyph records are not sorted; sorting");
            base_glyphs.sort_by_key(|base| base.glyph);
        }

        Ok(Self {
            base_glyphs,
            glyph_layers,
            glyph_palettes,
        })
    }

    /// The layer index range for `glyph`, or `None` if it is not a color glyph.
    ///
    /// A record that reaches past the layer array is clamped.
    pub fn layers(&self, glyph: GlyphId) -> Option<Range<usize>> {
        let index = self
            .base_glyphs
            .binary_search_by_key(&glyph, |base| base.glyph)
            .ok()?;
        let base = self.base_glyphs[index];

        let start = base.first as usize;
        let end = start + base.count as usize;
        let len = self.glyph_layers.len();
        if end > len {
            log::warn!(
                "COLR record for glyph {} wants layers {start}..{end} but only {len} exist",
                glyph.0
            );
        }

        Some(start.min(len)..end.min(len))
    }

    /// Sub-glyph outline of layer `index`.
    pub fn layer_glyph(&self, index: usize) -> Option<GlyphId> {
        self.glyph_layers.get(index).copied()
    }

    /// Palette entry of layer `index`.
    pub fn layer_palette_entry(&self, index: usize) -> Option<u16> {
        self.glyph_palettes.get(index).copied()
    }

    /// Number of color glyphs.
    pub fn base_glyph_count(&self) -> usize {
        self.base_glyphs.len()
    }

    /// Number of layer records shared by all color glyphs.
    pub fn layer_count(&self) -> usize {
        self.glyph_layers.len()
    }

    /// Whether the table has no color glyphs.
    pub fn is_empty(&self) -> bool {
        self.base_glyphs.is_empty()
    }
}

fn read_base_glyph(data: &[u8], at: usize) -> Option<BaseGlyph> {
    Some(BaseGlyph {
        glyph: GlyphId(read_u16(data, at)?),
        first: read_u16(data, at + 2)?,
        count: read_u16(data, at + 4)?,
    })
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn colr_bytes(bases: &[(u16, u16, u16)], layers: &[(u16, u16)]) -> Vec<u8> {
        let base_offset = HEADER_LEN as u32;
        let layer_offset = base_offset + (bases.len() * BASE_RECORD_LEN) as u32;

        let mut out = Vec::new();
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&(bases.len() as u16).to_be_bytes());
        out.extend_from_slice(&base_offset.to_be_bytes());
        out.extend_from_slice(&layer_offset.to_be_bytes());
        out.extend_from_slice(&(layers.len() as u16).to_be_bytes());
        for &(glyph, first, count) in bases {
            out.extend_from_slice(&glyph.to_be_bytes());
            out.extend_from_slice(&first.to_be_bytes());
            out.extend_from_slice(&count.to_be_bytes());
        }
        for &(glyph, entry) in layers {
            out.extend_from_slice(&glyph.to_be_bytes());
            out.extend_from_slice(&entry.to_be_bytes());
        }
        out
    }

    #[test]
    fn test_parse_v0() {
        let data = colr_bytes(&[(5, 0, 2), (9, 2, 1)], &[(10, 0), (11, 1), (12, 0)]);
        let table = LayerTable::parse(&data).unwrap();

        assert_eq!(table.base_glyph_count(), 2);
        assert_eq!(table.layer_count(), 3);
        assert_eq!(table.layers(GlyphId(5)), Some(0..2));
        assert_eq!(table.layers(GlyphId(9)), Some(2..3));
        assert_eq!(table.layers(GlyphId(6)), None);
        assert_eq!(table.layer_glyph(1), Some(GlyphId(11)));
        assert_eq!(table.layer_palette_entry(1), Some(1));
    }

    #[test]
    fn test_parse_truncated() {
        let mut data = colr_bytes(&[(5, 0, 2)], &[(10, 0), (11, 1)]);
        data.truncate(data.len() - 1);
        assert!(matches!(
            LayerTable::parse(&data),
            Err(FontError::MalformedTable { table: "COLR", .. })
        ));
        assert!(LayerTable::parse(&[0, 0, 0]).is_err());
    }

    #[test]
    fn test_parse_rejects_future_version() {
        let mut data = colr_bytes(&[], &[]);
        data[1] = 2;
        assert!(LayerTable::parse(&data).is_err());
    }

    #[test]
    fn test_unsorted_records_still_found() {
        let data = colr_bytes(&[(9, 1, 1), (5, 0, 1)], &[(10, 0), (11, 0)]);
        let table = LayerTable::parse(&data).unwrap();
        assert_eq!(table.layers(GlyphId(5)), Some(0..1));
        assert_eq!(table.layers(GlyphId(9)), Some(1..2));
    }

    #[test]
    fn test_overlong_record_is_clamped() {
        let table = LayerTable::new(
            vec![BaseGlyph {
                glyph: GlyphId(3),
                first: 1,
                count: 5,
            }],
            vec![(GlyphId(20), 0), (GlyphId(21), 0)],
        );
        assert_eq!(table.layers(GlyphId(3)), Some(1..2));
    }
}
