/// [`FontFace`] backed by `rustybuzz`, `ttf-parser` and `fontdue`.
pub mod opentype;

pub use opentype::OpenTypeFace;

use crate::color::ColorTables;
use crate::error::FontResult;
use crate::glyph_id::GlyphId;
use crate::shaping::{GlyphPlanEntry, ShapeFlags};

/// A parsed font as seen by [`Typeface`](crate::Typeface).
///
/// `shape` must be a pure function of its arguments: implementations may not
/// keep per-call state on `self`, so a face can be shared between threads.
pub trait FontFace: Send + Sync {
    /// Shapes `text` into glyphs in emission order.
    ///
    /// Advances and offsets are in font units and are zero when
    /// `flags.positioning` is off. Characters the font cannot map come out as
    /// [`GlyphId::MISSING`].
    fn shape(&self, text: &str, flags: ShapeFlags) -> Vec<GlyphPlanEntry>;

    fn units_per_em(&self) -> u16;

    /// Distance from the baseline to the top of the em box, in font units.
    fn ascender(&self) -> i16;

    /// Distance from the baseline to the bottom of the em box; usually negative.
    fn descender(&self) -> i16;

    fn line_gap(&self) -> i16;

    fn advance_width(&self, glyph: GlyphId) -> Option<u16>;

    fn advance_height(&self, glyph: GlyphId) -> Option<u16>;

    /// Factor that turns font units into pixels at `px` pixels per em.
    fn scale_factor(&self, px: f32) -> f32 {
        px / f32::from(self.units_per_em().max(1))
    }

    /// Reads the `COLR` and `CPAL` tables.
    fn color_tables(&self) -> FontResult<ColorTables>;
}
