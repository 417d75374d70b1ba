use crate::color::layers::FOREGROUND_ENTRY;
use crate::color::{LayerTable, PaletteTable, Rgba};
use crate::error::FontResult;
use crate::glyph_id::GlyphId;

/// One colored sub-glyph of a color glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorLayer {
    pub glyph: GlyphId,
    pub color: Rgba,
}

/// How a glyph id is painted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColorGlyph {
    /// No color data; draw the glyph itself with the caller's color.
    Single(GlyphId),
    /// Draw every layer at the same origin, in order. Later layers paint over earlier ones.
    Layers(Vec<ColorLayer>),
}

/// The color tables of one font, parsed once.
///
/// Both tables must be present for any glyph to be treated as a color glyph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorTables {
    pub layers: Option<LayerTable>,
    pub palettes: Option<PaletteTable>,
}

impl ColorTables {
    /// Tables from already parsed parts.
    pub fn new(layers: Option<LayerTable>, palettes: Option<PaletteTable>) -> Self {
        Self { layers, palettes }
    }

    /// Parses raw `COLR` and `CPAL` table data. Either may be absent.
    pub fn parse(colr: Option<&[u8]>, cpal: Option<&[u8]>) -> FontResult<Self> {
        let layers = colr.map(LayerTable::parse).transpose()?;
        let palettes = cpal.map(PaletteTable::parse).transpose()?;
        Ok(Self { layers, palettes })
    }

    /// Whether any glyph can resolve to layers.
    pub fn has_color(&self) -> bool {
        matches!(
            (&self.layers, &self.palettes),
            (Some(layers), Some(palettes)) if !layers.is_empty() && !palettes.is_empty()
        )
    }

    /// Resolves `glyph` into the draws that paint it.
    ///
    /// `palette` selects the `CPAL` palette; an index past the last palette
    /// falls back to palette 0. When `tint` is given every palette color is
    /// pulled toward it with [`Rgba::tinted`]. Layers that ask for the
    /// foreground color get `tint` itself, or opaque black without one.
    pub fn resolve(&self, glyph: GlyphId, palette: u16, tint: Option<Rgba>) -> ColorGlyph {
        let (Some(layers), Some(palettes)) = (&self.layers, &self.palettes) else {
            return ColorGlyph::Single(glyph);
        };
        if palettes.is_empty() {
            return ColorGlyph::Single(glyph);
        }
        let Some(range) = layers.layers(glyph) else {
            return ColorGlyph::Single(glyph);
        };

        let palette = if (palette as usize) < palettes.palette_count() {
            palette
        } else {
            log::warn!(
                "palette {palette} requested but font has {}; using palette 0",
                palettes.palette_count()
            );
            0
        };
        let foreground = tint.unwrap_or(Rgba::BLACK);

        let resolved = range
            .filter_map(|index| {
                let sub_glyph = layers.layer_glyph(index)?;
                let entry = layers.layer_palette_entry(index)?;

                let color = if entry == FOREGROUND_ENTRY {
                    foreground
                } else if let Some(color) = palettes.color(palette, entry) {
                    match tint {
                        Some(tint) => color.tinted(tint),
                        None => color,
                    }
                } else {
                    log::warn!(
                        "glyph {} layer {index} uses palette entry {entry} outside palette {palette}",
                        glyph.0
                    );
                    foreground
                };

                Some(ColorLayer {
                    glyph: sub_glyph,
                    color,
                })
            })
            .collect();

        ColorGlyph::Layers(resolved)
    }
}
