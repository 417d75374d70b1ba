use crate::color::{Rgba, read_u16, read_u32};
use crate::error::{FontError, FontResult};

const HEADER_LEN: usize = 12;
const COLOR_RECORD_LEN: usize = 4;

/// `CPAL` palettes.
///
/// Every palette has the same number of entries. Palette `p` entry `e` is
/// stored at `colors[palette_starts[p] + e]`; palettes may overlap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaletteTable {
    entries_per_palette: u16,
    palette_starts: Vec<u16>,
    colors: Vec<Rgba>,
}

impl PaletteTable {
    /// Builds a table from decoded palettes. All palettes must be the same length.
    pub fn new(palettes: Vec<Vec<Rgba>>) -> FontResult<Self> {
        let entries = palettes.first().map_or(0, Vec::len);
        if palettes.iter().any(|palette| palette.len() != entries) {
            return Err(FontError::MalformedTable {
                table: "CPAL",
                reason: "palettes differ in length",
            });
        }
        let entries_per_palette = u16::try_from(entries).map_err(|_| FontError::MalformedTable {
            table: "CPAL",
            reason: "too many palette entries",
        })?;

        let mut palette_starts = Vec::with_capacity(palettes.len());
        let mut colors = Vec::with_capacity(entries * palettes.len());
        for palette in palettes {
            let start = u16::try_from(colors.len()).map_err(|_| FontError::MalformedTable {
                table: "CPAL",
                reason: "too many color records",
            })?;
            palette_starts.push(start);
            colors.extend(palette);
        }

        Ok(Self {
            entries_per_palette,
            palette_starts,
            colors,
        })
    }

    /// Parses a `CPAL` table (version 0 or 1; version 1 extras are ignored).
    pub fn parse(data: &[u8]) -> FontResult<Self> {
        let malformed = |reason| FontError::MalformedTable {
            table: "CPAL",
            reason,
        };

        if data.len() < HEADER_LEN {
            return Err(malformed("header truncated"));
        }

        let version = read_u16(data, 0).ok_or(malformed("header truncated"))?;
        if version > 1 {
            return Err(malformed("unsupported version"));
        }

        let entries_per_palette = read_u16(data, 2).ok_or(malformed("header truncated"))?;
        let num_palettes = read_u16(data, 4).ok_or(malformed("header truncated"))? as usize;
        let num_colors = read_u16(data, 6).ok_or(malformed("header truncated"))? as usize;
        let colors_offset = read_u32(data, 8).ok_or(malformed("header truncated"))? as usize;

        let palette_starts = (0..num_palettes)
            .map(|i| read_u16(data, HEADER_LEN + i * 2))
            .collect::<Option<Vec<_>>>()
            .ok_or(malformed("palette indices truncated"))?;

        let records = colors_offset
            .checked_add(num_colors * COLOR_RECORD_LEN)
            .and_then(|end| data.get(colors_offset..end))
            .ok_or(malformed("color records truncated"))?;
        // Records are stored BGRA.
        let colors = records
            .chunks_exact(COLOR_RECORD_LEN)
            .map(|bgra| Rgba::new(bgra[2], bgra[1], bgra[0], bgra[3]))
            .collect::<Vec<_>>();

        let overflows = palette_starts
            .iter()
            .any(|&start| start as usize + entries_per_palette as usize > colors.len());
        if overflows {
            return Err(malformed("palette reaches past color records"));
        }

        Ok(Self {
            entries_per_palette,
            palette_starts,
            colors,
        })
    }

    /// Color of `entry` in `palette`, or `None` if either index is out of range.
    pub fn color(&self, palette: u16, entry: u16) -> Option<Rgba> {
        if entry >= self.entries_per_palette {
            return None;
        }
        let start = *self.palette_starts.get(palette as usize)?;
        self.colors.get(start as usize + entry as usize).copied()
    }

    /// Number of palettes.
    pub fn palette_count(&self) -> usize {
        self.palette_starts.len()
    }

    /// Number of colors in each palette.
    pub fn entries_per_palette(&self) -> u16 {
        self.entries_per_palette
    }

    /// Whether the table has no palettes.
    pub fn is_empty(&self) -> bool {
        self.palette_starts.is_empty()
    }
}
