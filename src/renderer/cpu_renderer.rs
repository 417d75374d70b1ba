use std::collections::HashMap;
use std::sync::Arc;

use euclid::default::Point2D;

use crate::color::Rgba;
use crate::glyph_id::{GlyphId, RasterKey};
use crate::renderer::GlyphSurface;

struct Coverage {
    metrics: fontdue::Metrics,
    data: Vec<u8>,
}

/// RGBA8 bitmap that rasterizes glyphs with `fontdue`.
///
/// Pixels are straight alpha, row-major, origin at the top-left. Glyph
/// coverage is cached per glyph and size for the lifetime of the surface.
pub struct CpuSurface {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Rgba>,

    font: Arc<fontdue::Font>,
    coverage: HashMap<RasterKey, Arc<Coverage>, fxhash::FxBuildHasher>,
}

impl CpuSurface {
    /// Creates a transparent surface that draws outlines from `font`.
    ///
    /// `font` must be the same font the glyph ids come from; see
    /// [`OpenTypeFace::rasterizer`](crate::face::OpenTypeFace::rasterizer).
    pub fn new(width: usize, height: usize, font: Arc<fontdue::Font>) -> Self {
        let len = width.saturating_mul(height);
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; len],
            font,
            coverage: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }

    /// The pixel at `x`, `y`, or `None` outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Resets every pixel to transparent. Cached coverage is kept.
    pub fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
    }

    /// Drops cached glyph coverage.
    pub fn clear_cache(&mut self) {
        self.coverage.clear();
    }

    fn coverage(&mut self, glyph: GlyphId, size: f32) -> Arc<Coverage> {
        let key = RasterKey::new(glyph, size);
        let font = &self.font;
        let entry = self.coverage.entry(key).or_insert_with(|| {
            let (metrics, data) = font.rasterize_indexed(key.glyph().index(), key.size());
            Arc::new(Coverage { metrics, data })
        });
        Arc::clone(entry)
    }
}

impl GlyphSurface for CpuSurface {
    fn draw_glyph(&mut self, glyph: GlyphId, origin: Point2D<f32>, size: f32, color: Rgba) {
        if self.width == 0 || self.height == 0 || color.a == 0 {
            return;
        }

        // fontdue indexes its glyph table directly.
        let glyph_count = self.font.glyph_count();
        let glyph = if glyph.index() < glyph_count {
            glyph
        } else {
            log::warn!(
                "glyph {} is out of range for a font with {} glyphs; drawing .notdef",
                glyph.0,
                glyph_count
            );
            GlyphId::MISSING
        };
        if glyph.index() >= glyph_count {
            return;
        }

        let cached = self.coverage(glyph, size);
        let metrics = cached.metrics;
        if metrics.width == 0 || metrics.height == 0 {
            return;
        }

        // fontdue measures the bitmap from the baseline, y up.
        let left = origin.x + metrics.xmin as f32;
        let top = origin.y - (metrics.ymin + metrics.height as i32) as f32;

        for row in 0..metrics.height {
            let iy = (top + row as f32).floor() as isize;
            if iy < 0 || iy as usize >= self.height {
                continue;
            }

            for col in 0..metrics.width {
                let src_alpha = cached.data[row * metrics.width + col];
                if src_alpha == 0 {
                    continue;
                }

                let ix = (left + col as f32).floor() as isize;
                if ix < 0 || ix as usize >= self.width {
                    continue;
                }

                let idx = iy as usize * self.width + ix as usize;
                self.pixels[idx] = blend_over(self.pixels[idx], color, src_alpha);
            }
        }
    }
}

/// Source-over composite of `src` scaled by `coverage` onto `dst`, straight alpha.
fn blend_over(dst: Rgba, src: Rgba, coverage: u8) -> Rgba {
    let sa = f32::from(src.a) * f32::from(coverage) / (255.0 * 255.0);
    let da = f32::from(dst.a) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba::TRANSPARENT;
    }

    let channel = |s: u8, d: u8| {
        let c = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };

    Rgba {
        r: channel(src.r, dst.r),
        g: channel(src.g, dst.g),
        b: channel(src.b, dst.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}
