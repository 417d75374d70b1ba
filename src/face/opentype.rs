use std::sync::Arc;

use euclid::default::Vector2D;
use rustybuzz::ttf_parser::{self, Tag};
use rustybuzz::{BufferFlags, Feature, UnicodeBuffer};

use crate::color::ColorTables;
use crate::error::{FontError, FontResult};
use crate::face::FontFace;
use crate::glyph_id::GlyphId;
use crate::shaping::{GlyphPlanEntry, ShapeFlags};

/// An OpenType/TrueType face loaded from memory.
///
/// Owns the font bytes. Shaping builds a short-lived `rustybuzz::Face` over
/// them on every call, so no shaper state is shared between calls.
/// Metrics and per-glyph advances are read once up front.
pub struct OpenTypeFace {
    data: Arc<[u8]>,
    index: u32,

    units_per_em: u16,
    ascender: i16,
    descender: i16,
    line_gap: i16,
    advance_widths: Vec<Option<u16>>,
    advance_heights: Vec<Option<u16>>,

    rasterizer: Arc<fontdue::Font>,
}

impl OpenTypeFace {
    /// Parses face `index` of `data` (0 unless `data` is a font collection).
    pub fn from_bytes(data: impl Into<Arc<[u8]>>, index: u32) -> FontResult<Self> {
        let data = data.into();

        let face = ttf_parser::Face::parse(&data, index).map_err(FontError::Parse)?;
        let glyph_count = face.number_of_glyphs();
        let advance_widths = (0..glyph_count)
            .map(|i| face.glyph_hor_advance(ttf_parser::GlyphId(i)))
            .collect();
        let advance_heights = (0..glyph_count)
            .map(|i| face.glyph_ver_advance(ttf_parser::GlyphId(i)))
            .collect();

        let rasterizer = fontdue::Font::from_bytes(
            &*data,
            fontdue::FontSettings {
                collection_index: index,
                scale: 40.0,
                load_substitutions: false,
            },
        )
        .map_err(FontError::Rasterizer)?;

        Ok(Self {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
            advance_widths,
            advance_heights,
            rasterizer: Arc::new(rasterizer),
            data,
            index,
        })
    }

    /// The raw font bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Index of this face within its font collection.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Number of glyphs in the font.
    pub fn glyph_count(&self) -> usize {
        self.advance_widths.len()
    }

    /// The `fontdue` font used to rasterize glyph outlines.
    pub fn rasterizer(&self) -> Arc<fontdue::Font> {
        Arc::clone(&self.rasterizer)
    }
}

impl FontFace for OpenTypeFace {
    fn shape(&self, text: &str, flags: ShapeFlags) -> Vec<GlyphPlanEntry> {
        // Validated in `from_bytes`; a failure here means the bytes changed underneath us.
        let face = match ttf_parser::Face::parse(&self.data, self.index) {
            Ok(face) => rustybuzz::Face::from_face(face),
            Err(e) => {
                log::error!("Failed to reparse face {} for shaping: {}", self.index, e);
                return Vec::new();
            }
        };

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        if flags.preserve_ignorables {
            buffer.set_flags(BufferFlags::PRESERVE_DEFAULT_IGNORABLES);
        }

        let output = rustybuzz::shape(&face, &shaping_features(flags), buffer);

        output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, pos)| {
                let glyph = GlyphId(u16::try_from(info.glyph_id).unwrap_or(0));
                if flags.positioning {
                    GlyphPlanEntry::new(
                        glyph,
                        pos.x_advance as f32,
                        Vector2D::new(pos.x_offset as f32, pos.y_offset as f32),
                    )
                } else {
                    GlyphPlanEntry::new(glyph, 0.0, Vector2D::zero())
                }
            })
            .collect()
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn ascender(&self) -> i16 {
        self.ascender
    }

    fn descender(&self) -> i16 {
        self.descender
    }

    fn line_gap(&self) -> i16 {
        self.line_gap
    }

    fn advance_width(&self, glyph: GlyphId) -> Option<u16> {
        self.advance_widths.get(glyph.0 as usize).copied().flatten()
    }

    fn advance_height(&self, glyph: GlyphId) -> Option<u16> {
        self.advance_heights.get(glyph.0 as usize).copied().flatten()
    }

    fn scale_factor(&self, px: f32) -> f32 {
        self.rasterizer.scale_factor(px)
    }

    fn color_tables(&self) -> FontResult<ColorTables> {
        let raw = ttf_parser::RawFace::parse(&self.data, self.index).map_err(FontError::Parse)?;
        ColorTables::parse(
            raw.table(Tag::from_bytes(b"COLR")),
            raw.table(Tag::from_bytes(b"CPAL")),
        )
    }
}

/// OpenType features to request for `flags`.
///
/// Features are listed explicitly both ways so the font's defaults cannot
/// override a disabled stage.
fn shaping_features(flags: ShapeFlags) -> Vec<Feature> {
    let toggle = |tag: &[u8; 4], on: bool| Feature::new(Tag::from_bytes(tag), u32::from(on), ..);

    vec![
        toggle(b"liga", flags.ligatures),
        toggle(b"clig", flags.ligatures),
        toggle(b"calt", flags.substitution),
        toggle(b"locl", flags.substitution),
        toggle(b"kern", flags.positioning),
        toggle(b"mark", flags.positioning),
        toggle(b"mkmk", flags.positioning),
        toggle(b"ccmp", flags.composition),
    ]
}
