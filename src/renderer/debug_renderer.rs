use euclid::default::Point2D;

use crate::color::Rgba;
use crate::glyph_id::GlyphId;
use crate::renderer::GlyphSurface;

/// A single recorded [`GlyphSurface::draw_glyph`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub glyph: GlyphId,
    pub origin: Point2D<f32>,
    pub size: f32,
    pub color: Rgba,
}

/// Surface that keeps every draw call, in order, instead of drawing.
///
/// Useful for inspecting what a typeface would paint without a rasterizer.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// An empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands in the order they were drawn.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns the recorded commands and starts over.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Forgets every recorded command.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl GlyphSurface for RecordingSurface {
    fn draw_glyph(&mut self, glyph: GlyphId, origin: Point2D<f32>, size: f32, color: Rgba) {
        self.commands.push(DrawCommand {
            glyph,
            origin,
            size,
            color,
        });
    }
}
