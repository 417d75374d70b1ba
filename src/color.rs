/// `COLR` layer records: which sub-glyphs make up a color glyph.
pub mod layers;
/// `CPAL` palettes: the colors those layers are painted with.
pub mod palette;
/// Turns a glyph id into the ordered draws needed to paint it.
pub mod resolver;

pub use layers::LayerTable;
pub use palette::PaletteTable;
pub use resolver::{ColorGlyph, ColorLayer, ColorTables};

/// Straight (non-premultiplied) 8-bit RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// A color from straight-alpha channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pulls each color channel toward white by the matching channel of `tint`.
    ///
    /// `out = orig + (255 - orig) * tint / 255` for R, G and B. Alpha is kept
    /// from `self`. A black tint leaves the color unchanged, a white tint
    /// saturates it.
    pub fn tinted(self, tint: Rgba) -> Rgba {
        fn channel(orig: u8, tint: u8) -> u8 {
            let orig = u32::from(orig);
            let lifted = (255 - orig) * u32::from(tint) / 255;
            (orig + lifted).min(255) as u8
        }

        Rgba {
            r: channel(self.r, tint.r),
            g: channel(self.g, tint.g),
            b: channel(self.b, tint.b),
            a: self.a,
        }
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(color: Rgba) -> Self {
        [color.r, color.g, color.b, color.a]
    }
}

/// Big-endian reads shared by the table parsers.
pub(crate) fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
