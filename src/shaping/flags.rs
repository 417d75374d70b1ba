/// Which shaping stages run for one shaping call.
///
/// Flags are passed with every call instead of being set on a shared shaper,
/// so one face can shape with different flags from several threads at once.
/// Math italic correction has no switch; it never applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShapeFlags {
    /// Standard, contextual and discretionary ligatures.
    pub ligatures: bool,
    /// Contextual alternates and localized forms.
    pub substitution: bool,
    /// Kerning and mark positioning. When off, advances and offsets are zero.
    pub positioning: bool,
    /// Glyph composition and decomposition (`ccmp`).
    pub composition: bool,
    /// Keep default-ignorable characters such as U+200D as their own glyphs.
    ///
    /// When off, the shaper hides any that survive shaping behind the space
    /// glyph, which is what drawing wants and what coverage checks must avoid.
    pub preserve_ignorables: bool,
}

impl Default for ShapeFlags {
    fn default() -> Self {
        Self {
            ligatures: true,
            substitution: true,
            positioning: true,
            composition: true,
            preserve_ignorables: false,
        }
    }
}

impl ShapeFlags {
    /// The same flags with positioning turned on.
    pub fn with_positioning(self) -> Self {
        Self {
            positioning: true,
            ..self
        }
    }

    /// The same substitution stages, set up for checking coverage: no
    /// positioning, and unfused joiners kept visible.
    pub fn for_coverage(self) -> Self {
        Self {
            positioning: false,
            preserve_ignorables: true,
            ..self
        }
    }
}
