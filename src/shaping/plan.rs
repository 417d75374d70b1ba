use euclid::default::Vector2D;

use crate::glyph_id::GlyphId;

/// One shaped glyph.
///
/// `advance` and `offset` are in font units; multiply by a
/// [`Typeface::scale`](crate::Typeface::scale) to get pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphPlanEntry {
    pub glyph: GlyphId,
    pub advance: f32,
    pub offset: Vector2D<f32>,
}

impl GlyphPlanEntry {
    /// An entry for `glyph`; `advance` and `offset` are in font units.
    pub fn new(glyph: GlyphId, advance: f32, offset: Vector2D<f32>) -> Self {
        Self {
            glyph,
            advance,
            offset,
        }
    }
}

/// The shaped glyphs of one string, in render order.
///
/// A plan never changes after it has been built. The shaping cache hands out
/// shared references to the same plan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapedGlyphPlan {
    entries: Vec<GlyphPlanEntry>,
}

impl ShapedGlyphPlan {
    /// A plan from glyphs in render order.
    pub fn new(entries: Vec<GlyphPlanEntry>) -> Self {
        Self { entries }
    }

    /// The glyphs in render order.
    pub fn entries(&self) -> &[GlyphPlanEntry] {
        &self.entries
    }

    /// The glyph id of every entry, in order.
    pub fn glyph_ids(&self) -> impl Iterator<Item = GlyphId> + '_ {
        self.entries.iter().map(|entry| entry.glyph)
    }

    /// Sum of all advances in font units.
    pub fn total_advance(&self) -> f32 {
        self.entries.iter().map(|entry| entry.advance).sum()
    }

    /// Number of glyphs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan has no glyphs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<GlyphPlanEntry> for ShapedGlyphPlan {
    fn from_iter<I: IntoIterator<Item = GlyphPlanEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
