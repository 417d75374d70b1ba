//! # Nishiki
//!
//! Shaping and color-glyph compositing for emoji text.
//!
//! ## Overview
//!
//! A [`Typeface`] wraps one font. It shapes strings into glyph plans
//! (through `rustybuzz`) and memoizes them per string, expands color glyphs
//! into their `COLR`/`CPAL` layers, and draws the result onto any
//! [`GlyphSurface`]. [`Typeface::can_render`] tells a caller whether the font
//! covers a string, emoji sequences included, so it can try another font.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nishiki::{Rgba, Typeface, TypefaceConfig, renderer::CpuSurface};
//! use nishiki::euclid::default::Point2D;
//!
//! let bytes = std::fs::read("NotoColorEmoji-COLRv0.ttf").unwrap();
//! let typeface = Typeface::from_bytes(bytes, 0, TypefaceConfig::default()).unwrap();
//!
//! let text = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";
//! if typeface.can_render(text) {
//!     let mut surface = CpuSurface::new(256, 64, typeface.face().rasterizer());
//!     typeface.render_text(&mut surface, text, Point2D::new(0.0, 48.0), 36.0, Rgba::BLACK);
//! }
//! ```
//!
//! ## Features
//!
//! *   **Shaping Cache**: Each distinct string is shaped once; eviction is opt-in.
//! *   **Color Glyphs**: `COLR` v0 layers painted with a selectable `CPAL` palette.
//! *   **Coverage Check**: Detects missing glyphs and emoji sequences that did not fuse.
//! *   **Thread Safety**: Shaping is stateless per call and the cache is internally locked.

pub mod color;
pub mod error;
pub mod face;
pub mod font_storage;
pub mod glyph_id;
pub mod renderer;
pub mod shaping;
pub mod typeface;

#[cfg(test)]
mod test_fonts;

// common re-exports
pub use color::{ColorGlyph, ColorLayer, ColorTables, Rgba};
pub use error::{FontError, FontResult};
pub use face::{FontFace, OpenTypeFace};
pub use font_storage::FontStorage;
pub use glyph_id::GlyphId;
pub use renderer::GlyphSurface;
pub use shaping::{EvictionPolicy, GlyphPlanEntry, ShapeFlags, ShapedGlyphPlan, ShapingCache};
pub use typeface::{Typeface, TypefaceConfig};

// re-export dependencies
pub use euclid;
pub use fontdb;
pub use fontdue;
pub use rustybuzz;
