//! The renderer contract: a trait for the *what to paint* side of the
//! pipeline. The actual cell-painting device is out of scope here — only
//! the dirty-driven frame description and the pure attribute-resolution
//! logic (selection XOR, reverse-video) live in this module.

use crate::{error::EngineError, screen::{Screen, cell::Color}, selection::Selection};

/// Cursor state a renderer needs: position, whether it's suppressed
/// (`HIDE_CURSOR` mode, or select-mode's cleared-visibility window), and
/// the current blink phase.
#[derive(Debug, Clone, Copy)]
pub struct CursorState {
    pub x: u16,
    pub y: u16,
    pub visible: bool,
    pub blink_on: bool,
}

/// One tab's entry in the status bar.
#[derive(Debug, Clone)]
pub struct TabLabel {
    pub index: usize,
    pub title: String,
    pub focused: bool,
}

/// Everything a renderer needs to paint one frame: the focused terminal's
/// grid (via `screen`), a dirty-row bitmap, the cursor, and the selection
/// state. Tab labels are `None` when only one tab exists, since no
/// status-bar row is reserved in that case.
#[derive(Debug)]
pub struct RenderFrame<'a> {
    pub screen: &'a Screen,
    pub dirty: &'a [bool],
    pub cursor: CursorState,
    pub selection: &'a Selection,
    pub tabs: Option<&'a [TabLabel]>,
    /// DECSCNM: the whole screen's default fg/bg pair is inverted. Core
    /// only surfaces the flag; a cell still carrying `Color::Default` is
    /// symbolic until the backend resolves it to concrete colors, so the
    /// inversion of that pair happens there, not here.
    pub reverse_video: bool,
}

/// The paint contract itself: implemented by the binary driver against a
/// concrete display backend, which owns the window system entirely.
pub trait Renderer {
    /// Paints one frame.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError::Render`] if the underlying paint surface
    /// fails (e.g. a terminal I/O error).
    fn paint(&mut self, frame: &RenderFrame<'_>) -> Result<(), EngineError>;
}

/// Resolves the `(fg, bg)` pair a renderer should paint for the cell at
/// `(x, y)`, before any global reverse-video inversion: selection is
/// applied by XORing the `reverse` attribute.
#[must_use]
pub fn resolve_colors(screen: &Screen, selection: &Selection, x: u16, y: u16) -> (Color, Color) {
    let glyph = screen.cell(x, y);
    let selected = selection.contains(screen, x, y);
    let mut reversed = glyph.attrs.contains(crate::screen::cell::GlyphAttrs::REVERSE);
    if selected {
        reversed = !reversed;
    }

    let (mut fg, mut bg) = (glyph.fg, glyph.bg);
    if reversed {
        std::mem::swap(&mut fg, &mut bg);
    }
    (fg, bg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::cell::GlyphAttrs;
    use crate::selection::{GridCoord, SelectionKind, SnapMode};

    fn put_colored(screen: &mut Screen, ch: char, fg: Color, bg: Color, attrs: GlyphAttrs) {
        screen.set_cursor_attrs(attrs, fg, bg);
        screen.put_char(ch);
    }

    #[test]
    fn plain_cell_keeps_its_own_colors() {
        let mut screen = Screen::new(3, 1, 10, 8);
        put_colored(&mut screen, 'x', Color::Indexed(1), Color::Indexed(2), GlyphAttrs::empty());
        let selection = Selection::new();
        assert_eq!(resolve_colors(&screen, &selection, 0, 0), (Color::Indexed(1), Color::Indexed(2)));
    }

    #[test]
    fn selected_cell_swaps_fg_and_bg() {
        let mut screen = Screen::new(3, 1, 10, 8);
        put_colored(&mut screen, 'x', Color::Indexed(1), Color::Indexed(2), GlyphAttrs::empty());
        let mut selection = Selection::new();
        selection.begin(&screen, GridCoord::new(0, 0), SnapMode::None, SelectionKind::Linear);
        assert_eq!(resolve_colors(&screen, &selection, 0, 0), (Color::Indexed(2), Color::Indexed(1)));
    }

    #[test]
    fn reverse_attribute_and_selection_cancel_out() {
        let mut screen = Screen::new(3, 1, 10, 8);
        put_colored(&mut screen, 'x', Color::Indexed(1), Color::Indexed(2), GlyphAttrs::REVERSE);
        let mut selection = Selection::new();
        selection.begin(&screen, GridCoord::new(0, 0), SnapMode::None, SelectionKind::Linear);
        assert_eq!(resolve_colors(&screen, &selection, 0, 0), (Color::Indexed(1), Color::Indexed(2)));
    }
}
