/// Steps per pixel when quantizing glyph sizes for raster caches.
pub const SUB_PIXEL_QUANTIZE: f32 = 256f32;

/// Index into a single font's glyph table.
///
/// Glyph ids are only meaningful relative to the font that produced them.
/// `0` is reserved by every font for the missing glyph (`.notdef`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlyphId(pub u16);

impl GlyphId {
    /// `.notdef`, drawn for characters the font does not map.
    pub const MISSING: GlyphId = GlyphId(0);

    /// Whether this is [`Self::MISSING`].
    pub fn is_missing(self) -> bool {
        self == Self::MISSING
    }

    /// The raw glyph index.
    pub fn index(self) -> u16 {
        self.0
    }
}

impl From<u16> for GlyphId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// A glyph rasterized at a specific size.
///
/// The same glyph drawn at sizes that differ by less than `1 / SUB_PIXEL_QUANTIZE`
/// pixel shares one key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RasterKey {
    glyph: GlyphId,
    size: u32, // size * SUB_PIXEL_QUANTIZE as u32
}

impl RasterKey {
    /// Key for `glyph` at `size` pixels per em.
    pub fn new(glyph: GlyphId, size: f32) -> Self {
        Self {
            glyph,
            size: (size * SUB_PIXEL_QUANTIZE).round() as u32,
        }
    }

    /// The glyph this key rasterizes.
    pub fn glyph(&self) -> GlyphId {
        self.glyph
    }

    /// The quantized size in pixels per em.
    pub fn size(&self) -> f32 {
        self.size as f32 / SUB_PIXEL_QUANTIZE
    }
}
