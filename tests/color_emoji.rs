#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use nishiki::color::layers::BaseGlyph;
use nishiki::color::{LayerTable, PaletteTable};
use nishiki::euclid::default::{Point2D, Vector2D};
use nishiki::renderer::RecordingSurface;
use nishiki::{
    ColorGlyph, ColorLayer, ColorTables, FontFace, FontResult, GlyphId, GlyphPlanEntry, Rgba,
    ShapeFlags, Typeface, TypefaceConfig,
};

const FLAG_US: &str = "\u{1F1FA}\u{1F1F8}";

/// Maps 'a'..='z' to glyphs 1..=26, fuses the US flag into glyph 5 and leaves
/// everything else missing.
struct AlphabetFace {
    shape_calls: AtomicUsize,
}

impl FontFace for AlphabetFace {
    fn shape(&self, text: &str, flags: ShapeFlags) -> Vec<GlyphPlanEntry> {
        self.shape_calls.fetch_add(1, Ordering::SeqCst);
        let advance = if flags.positioning { 600.0 } else { 0.0 };

        if flags.ligatures && text == FLAG_US {
            return vec![GlyphPlanEntry::new(GlyphId(5), advance, Vector2D::zero())];
        }

        text.chars()
            .map(|c| {
                let glyph = if c.is_ascii_lowercase() {
                    c as u16 - 'a' as u16 + 1
                } else {
                    0
                };
                GlyphPlanEntry::new(GlyphId(glyph), advance, Vector2D::zero())
            })
            .collect()
    }

    fn units_per_em(&self) -> u16 {
        2048
    }

    fn ascender(&self) -> i16 {
        1900
    }

    fn descender(&self) -> i16 {
        -500
    }

    fn line_gap(&self) -> i16 {
        0
    }

    fn advance_width(&self, _glyph: GlyphId) -> Option<u16> {
        Some(600)
    }

    fn advance_height(&self, _glyph: GlyphId) -> Option<u16> {
        None
    }

    fn color_tables(&self) -> FontResult<ColorTables> {
        let layers = LayerTable::new(
            vec![BaseGlyph {
                glyph: GlyphId(5),
                first: 0,
                count: 2,
            }],
            vec![(GlyphId(10), 0), (GlyphId(11), 1)],
        );
        let palettes = PaletteTable::new(vec![vec![
            Rgba::new(255, 0, 0, 255),
            Rgba::new(0, 0, 255, 255),
        ]])?;
        Ok(ColorTables::new(Some(layers), Some(palettes)))
    }
}

fn typeface() -> Typeface<AlphabetFace> {
    Typeface::new(
        AlphabetFace {
            shape_calls: AtomicUsize::new(0),
        },
        TypefaceConfig::default(),
    )
}

#[test]
fn test_flag_resolves_to_palette_layers() {
    let tf = typeface();

    assert!(tf.can_render(FLAG_US));
    let ids = tf.glyph_ids(FLAG_US);
    assert_eq!(ids, vec![GlyphId(5)]);

    assert_eq!(
        tf.resolve(ids[0]),
        ColorGlyph::Layers(vec![
            ColorLayer {
                glyph: GlyphId(10),
                color: Rgba::new(255, 0, 0, 255),
            },
            ColorLayer {
                glyph: GlyphId(11),
                color: Rgba::new(0, 0, 255, 255),
            },
        ])
    );
}

#[test]
fn test_single_regional_indicator_is_not_renderable() {
    let tf = typeface();
    assert!(!tf.can_render("\u{1F1FA}"));
    assert!(!tf.can_render("A"));
    assert!(tf.can_render("hello"));
}

#[test]
fn test_render_mixed_line() {
    let tf = typeface();
    let mut surface = RecordingSurface::new();
    let text = format!("hi{FLAG_US}");

    // The flag only fuses when shaped alone, so this line has a missing glyph
    // per regional indicator.
    let advance = tf.render_text(
        &mut surface,
        &text,
        Point2D::new(0.0, 0.0),
        12.0,
        Rgba::BLACK,
    );
    assert_eq!(surface.commands().len(), 4);
    assert!(advance > 0.0);

    surface.clear();
    tf.render_text(&mut surface, FLAG_US, Point2D::new(0.0, 0.0), 12.0, Rgba::WHITE);
    let colors = surface
        .commands()
        .iter()
        .map(|c| c.color)
        .collect::<Vec<_>>();
    assert_eq!(colors, vec![Rgba::WHITE, Rgba::WHITE]);
}

#[test]
fn test_shared_typeface_shapes_once_per_string() {
    let tf = Arc::new(typeface());
    let baseline = tf.face().shape_calls.load(Ordering::SeqCst);

    let handles = (0..4)
        .map(|_| {
            let tf = Arc::clone(&tf);
            std::thread::spawn(move || {
                for word in ["alpha", "beta", "gamma", "alpha"] {
                    tf.plan(word);
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(tf.face().shape_calls.load(Ordering::SeqCst) - baseline, 3);
    assert_eq!(tf.cache().len(), 3);
}

#[test]
fn test_closure_surface() {
    let tf = typeface();
    let mut drawn = Vec::new();
    let mut surface = |glyph: GlyphId, _origin: Point2D<f32>, _size: f32, color: Rgba| {
        drawn.push((glyph, color));
    };

    tf.render_glyph(&mut surface, GlyphId(1), Point2D::zero(), 10.0, Rgba::BLACK);
    assert_eq!(drawn, vec![(GlyphId(1), Rgba::BLACK)]);
}
