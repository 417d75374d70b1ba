use std::sync::Arc;

use euclid::default::Point2D;

use crate::color::{ColorGlyph, ColorTables, Rgba};
use crate::error::FontResult;
use crate::face::{FontFace, OpenTypeFace};
use crate::glyph_id::GlyphId;
use crate::renderer::GlyphSurface;
use crate::shaping::{EvictionPolicy, ShapeFlags, ShapedGlyphPlan, ShapingCache};

/// U+200D, the character that asks adjacent emoji to fuse into one glyph.
pub const ZERO_WIDTH_JOINER: &str = "\u{200D}";

/// Pixels per point at the 96 dpi reference resolution.
pub const POINTS_TO_PIXELS: f32 = 96.0 / 72.0;

/// Settings fixed for the lifetime of a [`Typeface`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypefaceConfig {
    /// `CPAL` palette used for color glyphs. Fonts with light/dark variants
    /// put them in separate palettes. Out-of-range indices use palette 0.
    pub palette_index: u16,
    /// Bound for the shaping cache.
    pub eviction: EvictionPolicy,
    /// Substitution stages used for cached plans and coverage checks.
    ///
    /// Cached plans are always shaped with positioning, so `positioning`
    /// here is ignored; coverage checks never position.
    pub shape_flags: ShapeFlags,
}

/// One font ready for shaping and color rendering.
///
/// Owns the face, its color tables and a shaping cache whose plans refer to
/// this face's glyph ids. Every method takes `&self`, and a `Typeface` can be
/// shared between threads.
pub struct Typeface<F: FontFace = OpenTypeFace> {
    face: F,
    config: TypefaceConfig,
    colors: ColorTables,
    cache: ShapingCache,
    /// What a lone zero-width joiner shapes to. Seeing it in shaped output
    /// means an emoji sequence did not fuse. This relies on the font mapping
    /// U+200D to the same glyph in every context, which most fonts do but none
    /// are required to.
    zwj_glyph: GlyphId,
}

impl Typeface<OpenTypeFace> {
    /// Loads face `index` of `data`.
    pub fn from_bytes(
        data: impl Into<Arc<[u8]>>,
        index: u32,
        config: TypefaceConfig,
    ) -> FontResult<Self> {
        Ok(Self::new(OpenTypeFace::from_bytes(data, index)?, config))
    }
}

impl<F: FontFace> Typeface<F> {
    /// Wraps `face`.
    ///
    /// Malformed color tables are logged and the face renders monochrome.
    pub fn new(face: F, config: TypefaceConfig) -> Self {
        let colors = face.color_tables().unwrap_or_else(|e| {
            log::warn!("Ignoring color tables: {}", e);
            ColorTables::default()
        });

        let zwj_glyph = face
            .shape(ZERO_WIDTH_JOINER, config.shape_flags.for_coverage())
            .first()
            .map_or(GlyphId::MISSING, |entry| entry.glyph);
        log::debug!("zero-width joiner shapes to glyph {}", zwj_glyph.0);

        Self {
            face,
            config,
            colors,
            cache: ShapingCache::new(config.eviction),
            zwj_glyph,
        }
    }

    /// The wrapped face.
    pub fn face(&self) -> &F {
        &self.face
    }

    /// The config this typeface was built with.
    pub fn config(&self) -> &TypefaceConfig {
        &self.config
    }

    /// The parsed `COLR`/`CPAL` tables; empty for monochrome fonts.
    pub fn color_tables(&self) -> &ColorTables {
        &self.colors
    }

    /// What a lone U+200D shaped to when this typeface was built.
    pub fn zwj_glyph(&self) -> GlyphId {
        self.zwj_glyph
    }
}

/// metrics
impl<F: FontFace> Typeface<F> {
    /// Baseline position below the top of the line, in font units.
    pub fn baseline(&self) -> f32 {
        f32::from(self.face.ascender())
    }

    /// Line height in font units.
    pub fn height(&self) -> f32 {
        f32::from(self.face.ascender()) - f32::from(self.face.descender())
            + f32::from(self.face.line_gap())
    }

    /// Horizontal advance of `glyph` in font units.
    pub fn advance_width(&self, glyph: GlyphId) -> Option<u16> {
        self.face.advance_width(glyph)
    }

    /// Vertical advance of `glyph` in font units, if the font has vertical metrics.
    pub fn advance_height(&self, glyph: GlyphId) -> Option<u16> {
        self.face.advance_height(glyph)
    }

    /// Factor that turns font units into pixels at `point_size`.
    ///
    /// Linear in `point_size`.
    pub fn scale(&self, point_size: f32) -> f32 {
        self.face.scale_factor(point_size * POINTS_TO_PIXELS)
    }

    /// Line height in pixels at `point_size`.
    pub fn line_height(&self, point_size: f32) -> f32 {
        self.height() * self.scale(point_size)
    }
}

/// shaping
impl<F: FontFace> Typeface<F> {
    /// The shaped glyphs of `text`, shaped on first request and cached after.
    pub fn plan(&self, text: &str) -> Arc<ShapedGlyphPlan> {
        let flags = self.config.shape_flags.with_positioning();
        self.cache.plan(text, |text| self.face.shape(text, flags))
    }

    /// The glyph ids of [`Self::plan`].
    pub fn glyph_ids(&self, text: &str) -> Vec<GlyphId> {
        self.plan(text).glyph_ids().collect()
    }

    /// Width of `text` in pixels at `point_size`.
    pub fn measure(&self, text: &str, point_size: f32) -> f32 {
        self.plan(text).total_advance() * self.scale(point_size)
    }

    /// Whether this font draws every glyph of `text`, with every emoji
    /// sequence fused into a ligature.
    ///
    /// Fails on the first missing glyph or the first bare zero-width joiner.
    /// Shapes without positioning and bypasses the cache. An empty string
    /// passes. The joiner test is only as reliable as the font's U+200D
    /// mapping; see [`Self::zwj_glyph`].
    pub fn can_render(&self, text: &str) -> bool {
        let flags = self.config.shape_flags.for_coverage();
        self.face
            .shape(text, flags)
            .iter()
            .all(|entry| !entry.glyph.is_missing() && entry.glyph != self.zwj_glyph)
    }

    /// The shaping cache behind [`Self::plan`].
    pub fn cache(&self) -> &ShapingCache {
        &self.cache
    }

    /// Drops every cached plan.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// rendering
impl<F: FontFace> Typeface<F> {
    /// How `glyph` is painted, with palette colors as the font defines them.
    pub fn resolve(&self, glyph: GlyphId) -> ColorGlyph {
        self.colors.resolve(glyph, self.config.palette_index, None)
    }

    /// How `glyph` is painted, with palette colors tinted toward `tint`.
    pub fn resolve_tinted(&self, glyph: GlyphId, tint: Rgba) -> ColorGlyph {
        self.colors.resolve(glyph, self.config.palette_index, Some(tint))
    }

    /// Draws one glyph at `origin` with an em size of `size` pixels.
    ///
    /// Monochrome glyphs are drawn once in `fallback`. Color glyphs are drawn
    /// as one call per layer, all at `origin`, in paint order, with palette
    /// colors tinted toward `fallback`.
    pub fn render_glyph(
        &self,
        surface: &mut impl GlyphSurface,
        glyph: GlyphId,
        origin: Point2D<f32>,
        size: f32,
        fallback: Rgba,
    ) {
        match self.resolve_tinted(glyph, fallback) {
            ColorGlyph::Single(glyph) => {
                log::trace!("draw glyph {} monochrome", glyph.0);
                surface.draw_glyph(glyph, origin, size, fallback);
            }
            ColorGlyph::Layers(layers) => {
                log::trace!("draw glyph {} as {} layers", glyph.0, layers.len());
                for layer in layers {
                    surface.draw_glyph(layer.glyph, origin, size, layer.color);
                }
            }
        }
    }

    /// Shapes `text` and draws it as one line starting at the baseline
    /// position `origin`. Returns the advance in pixels.
    pub fn render_text(
        &self,
        surface: &mut impl GlyphSurface,
        text: &str,
        origin: Point2D<f32>,
        point_size: f32,
        fallback: Rgba,
    ) -> f32 {
        let plan = self.plan(text);
        let scale = self.scale(point_size);
        let size = point_size * POINTS_TO_PIXELS;

        let mut pen = 0.0;
        for entry in plan.entries() {
            // Shaper offsets point up, the surface's y axis points down.
            let at = Point2D::new(
                origin.x + pen + entry.offset.x * scale,
                origin.y - entry.offset.y * scale,
            );
            self.render_glyph(surface, entry.glyph, at, size, fallback);
            pen += entry.advance * scale;
        }

        pen
    }
}
