/// Memoizes shaped glyph plans per string.
pub mod cache;
/// Per-call shaping switches.
pub mod flags;
/// Shaped glyph sequences.
pub mod plan;

pub use cache::{EvictionPolicy, ShapingCache};
pub use flags::ShapeFlags;
pub use plan::{GlyphPlanEntry, ShapedGlyphPlan};
