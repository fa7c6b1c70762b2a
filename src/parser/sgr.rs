//! SGR (Select Graphic Rendition) semantics.

use crate::screen::{Screen, cell::{Color, GlyphAttrs}};

/// Applies one full `CSI m` parameter list to the screen's current
/// attribute/color state.
pub fn apply(screen: &mut Screen, params: &[u16]) {
    if params.is_empty() {
        reset(screen);
        return;
    }

    let mut i = 0;
    while i < params.len() {
        let code = params[i];
        match code {
            0 => reset(screen),
            1 => set_attr(screen, GlyphAttrs::BOLD, true),
            3 => set_attr(screen, GlyphAttrs::ITALIC, true),
            4 => set_attr(screen, GlyphAttrs::UNDERLINE, true),
            5 | 6 => set_attr(screen, GlyphAttrs::BLINK, true),
            7 => set_attr(screen, GlyphAttrs::REVERSE, true),
            21 | 22 => set_attr(screen, GlyphAttrs::BOLD, false),
            23 => set_attr(screen, GlyphAttrs::ITALIC, false),
            24 => set_attr(screen, GlyphAttrs::UNDERLINE, false),
            25 | 26 => set_attr(screen, GlyphAttrs::BLINK, false),
            27 => set_attr(screen, GlyphAttrs::REVERSE, false),
            30..=37 => set_fg(screen, Color::Indexed((code - 30) as u8)),
            38 => {
                if params.get(i + 1) == Some(&5) {
                    if let Some(&n) = params.get(i + 2) {
                        set_fg(screen, Color::Indexed(n as u8));
                    }
                    i += 2;
                }
            }
            39 => set_fg(screen, Color::Default),
            40..=47 => set_bg(screen, Color::Indexed((code - 40) as u8)),
            48 => {
                if params.get(i + 1) == Some(&5) {
                    if let Some(&n) = params.get(i + 2) {
                        set_bg(screen, Color::Indexed(n as u8));
                    }
                    i += 2;
                }
            }
            49 => set_bg(screen, Color::Default),
            90..=97 => set_fg(screen, Color::Indexed((code - 90 + 8) as u8)),
            100..=107 => set_bg(screen, Color::Indexed((code - 100 + 8) as u8)),
            _ => tracing::debug!(code, "unhandled SGR parameter"),
        }
        i += 1;
    }
}

fn reset(screen: &mut Screen) {
    screen.set_cursor_attrs(GlyphAttrs::empty(), Color::Default, Color::Default);
}

fn set_attr(screen: &mut Screen, attr: GlyphAttrs, on: bool) {
    let mut cursor = screen.cursor();
    if on {
        cursor.attrs.insert(attr);
    } else {
        cursor.attrs.remove(attr);
    }
    apply_cursor(screen, cursor);
}

fn set_fg(screen: &mut Screen, color: Color) {
    let mut cursor = screen.cursor();
    cursor.fg = color;
    apply_cursor(screen, cursor);
}

fn set_bg(screen: &mut Screen, color: Color) {
    let mut cursor = screen.cursor();
    cursor.bg = color;
    apply_cursor(screen, cursor);
}

/// `Screen` exposes its cursor by value (copy) for reading; SGR needs to
/// write it back. A tiny setter kept private to this module since nothing
/// else mutates cursor attributes directly outside screen buffer ops.
fn apply_cursor(screen: &mut Screen, cursor: crate::screen::cursor::Cursor) {
    screen.set_cursor_attrs(cursor.attrs, cursor.fg, cursor.bg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_and_reset() {
        let mut screen = Screen::new(4, 2, 10, 8);
        apply(&mut screen, &[1]);
        assert!(screen.cursor().attrs.contains(GlyphAttrs::BOLD));
        apply(&mut screen, &[0]);
        assert!(screen.cursor().attrs.is_empty());
    }

    #[test]
    fn extended_fg_palette() {
        let mut screen = Screen::new(4, 2, 10, 8);
        apply(&mut screen, &[38, 5, 200]);
        assert_eq!(screen.cursor().fg, Color::Indexed(200));
    }

    #[test]
    fn bright_fg() {
        let mut screen = Screen::new(4, 2, 10, 8);
        apply(&mut screen, &[91]);
        assert_eq!(screen.cursor().fg, Color::Indexed(9));
    }
}
