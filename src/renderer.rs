/// Rasterizes glyphs into an RGBA bitmap on the CPU.
pub mod cpu_renderer;
/// Records draw calls instead of drawing.
pub mod debug_renderer;

pub use cpu_renderer::CpuSurface;
pub use debug_renderer::{DrawCommand, RecordingSurface};

use euclid::default::Point2D;

use crate::color::Rgba;
use crate::glyph_id::GlyphId;

/// A 2D sink that can fill one glyph outline with a solid color.
///
/// `origin` is the pen position on the baseline, with the y axis pointing
/// down. `size` is the em size in pixels.
///
/// Closures with the same signature implement this trait, so a renderer can
/// be plugged in without a wrapper type.
pub trait GlyphSurface {
    fn draw_glyph(&mut self, glyph: GlyphId, origin: Point2D<f32>, size: f32, color: Rgba);
}

impl<F> GlyphSurface for F
where
    F: FnMut(GlyphId, Point2D<f32>, f32, Rgba),
{
    fn draw_glyph(&mut self, glyph: GlyphId, origin: Point2D<f32>, size: f32, color: Rgba) {
        self(glyph, origin, size, color)
    }
}
