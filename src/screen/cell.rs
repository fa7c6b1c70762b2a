//! The `Glyph` cell type.

use bitflags::bitflags;

bitflags! {
    /// Per-cell attribute bitset.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GlyphAttrs: u8 {
        const REVERSE        = 0b0000_0001;
        const UNDERLINE      = 0b0000_0010;
        const BOLD           = 0b0000_0100;
        const GFX_LINE_DRAW  = 0b0000_1000;
        const ITALIC         = 0b0001_0000;
        const BLINK          = 0b0010_0000;
        /// Marks the final cell of a line that continues visually onto the
        /// next physical row.
        const WRAP_INDICATOR = 0b0100_0000;
    }
}

/// A foreground or background color: either the terminal's default pair,
/// or one of the 256 palette indices (spec's Non-goals exclude true color).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Indexed(u8),
}

impl Color {
    #[must_use]
    pub fn is_default(self) -> bool { matches!(self, Color::Default) }
}

/// One displayable cell: a codepoint, its attributes, and its fg/bg colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub attrs: GlyphAttrs,
    pub fg: Color,
    pub bg: Color,
}

impl Glyph {
    #[must_use]
    pub fn blank() -> Self {
        Self { ch: ' ', attrs: GlyphAttrs::empty(), fg: Color::Default, bg: Color::Default }
    }

    #[must_use]
    pub fn blank_with_attrs(attrs: GlyphAttrs, fg: Color, bg: Color) -> Self {
        // The wrap-indicator is structural, not part of "current attributes";
        // a blank written under some SGR state never carries it.
        Self { ch: ' ', attrs: attrs & !GlyphAttrs::WRAP_INDICATOR, fg, bg }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool { self.ch == ' ' }

    #[must_use]
    pub fn has_wrap_indicator(&self) -> bool { self.attrs.contains(GlyphAttrs::WRAP_INDICATOR) }
}

impl Default for Glyph {
    fn default() -> Self { Self::blank() }
}
