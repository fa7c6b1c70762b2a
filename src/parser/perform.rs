//! The `vte::Perform` implementation: the bridge between `vte::Parser`'s
//! GROUND/ESC_START/ESC_CSI/ESC_STR state machine and the screen buffer's
//! own operations.

use super::{EngineEvent, charset, csi, osc};
use crate::screen::{Screen, cell::GlyphAttrs};

pub struct Performer<'a> {
    pub screen: &'a mut Screen,
    pub events: &'a mut Vec<EngineEvent>,
}

impl vte::Perform for Performer<'_> {
    fn print(&mut self, ch: char) {
        if self.screen.graphics_charset() {
            self.screen.put_char_with_attrs(charset::translate(ch), GlyphAttrs::GFX_LINE_DRAW);
        } else {
            self.screen.put_char(ch);
        }
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            0x07 => self.events.push(EngineEvent::Bell),
            0x08 => {
                let (x, y) = (self.screen.cursor().x, self.screen.cursor().y);
                self.screen.move_to(x.saturating_sub(1), y);
            }
            0x09 => self.screen.tab_forward(1),
            0x0A | 0x0B | 0x0C => {
                let crlf = self.screen.modes().contains(crate::screen::modes::ModeSet::CRLF);
                self.screen.newline(crlf);
            }
            0x0D => {
                let y = self.screen.cursor().y;
                self.screen.move_to(0, y);
            }
            _ => tracing::debug!(byte, "unhandled C0 control"),
        }
    }

    fn hook(&mut self, _params: &vte::Params, _intermediates: &[u8], _ignore: bool, _action: char) {
        // No mandatory DCS behavior; the string payload is accumulated by
        // vte and discarded at `unhook`.
    }

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        osc::dispatch(params, self.events);
    }

    fn csi_dispatch(
        &mut self,
        params: &vte::Params,
        intermediates: &[u8],
        _ignore: bool,
        action: char,
    ) {
        csi::dispatch(self.screen, action, params, intermediates, self.events);
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        if intermediates.contains(&b'(') || intermediates.contains(&b')') {
            match byte {
                b'0' => self.screen.set_graphics_charset(true),
                b'B' => self.screen.set_graphics_charset(false),
                _ => tracing::debug!(byte, "unhandled charset designator"),
            }
            return;
        }

        match byte {
            b'7' => self.screen.save_cursor(),
            b'8' => self.screen.restore_cursor(),
            b'=' => self.screen.modes_mut().insert(crate::screen::modes::ModeSet::APP_KEYPAD),
            b'>' => self.screen.modes_mut().remove(crate::screen::modes::ModeSet::APP_KEYPAD),
            b'D' => {
                // IND: like a newline but never resets the column.
                self.screen.newline(false);
            }
            b'E' => self.screen.newline(true),
            b'H' => self.screen.set_tab_stop_at_cursor(),
            b'M' => {
                // RI (reverse index): move up, scrolling down if at the
                // scroll region's top margin.
                let (top, _) = self.screen.scroll_region();
                let y = self.screen.cursor().y;
                if y == top {
                    self.screen.scroll_down(top, 1);
                } else {
                    let x = self.screen.cursor().x;
                    self.screen.move_to(x, y.saturating_sub(1));
                }
            }
            b'c' => self.screen.reset(),
            b'Z' => self.events.push(EngineEvent::Reply(super::DEVICE_ATTRIBUTES_REPLY.to_vec())),
            _ => tracing::debug!(byte, "unhandled ESC final byte"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::EscapeParser;

    #[test]
    fn feeds_printable_text_through_to_screen() {
        let mut screen = Screen::new(10, 3, 100, 8);
        let mut parser = EscapeParser::new();
        let mut events = Vec::new();
        parser.feed(b"hello", &mut screen, &mut events);
        assert_eq!(screen.cell(0, 0).ch, 'h');
        assert_eq!(screen.cell(4, 0).ch, 'o');
    }

    #[test]
    fn csi_sequence_moves_cursor() {
        let mut screen = Screen::new(10, 3, 100, 8);
        let mut parser = EscapeParser::new();
        let mut events = Vec::new();
        parser.feed(b"\x1b[5;3H", &mut screen, &mut events);
        assert_eq!((screen.cursor().x, screen.cursor().y), (2, 4));
    }

    #[test]
    fn bell_control_code_emits_event() {
        let mut screen = Screen::new(10, 3, 100, 8);
        let mut parser = EscapeParser::new();
        let mut events = Vec::new();
        parser.feed(b"\x07", &mut screen, &mut events);
        assert!(events.contains(&EngineEvent::Bell));
    }

    #[test]
    fn device_attributes_reply_is_queued() {
        let mut screen = Screen::new(10, 3, 100, 8);
        let mut parser = EscapeParser::new();
        let mut events = Vec::new();
        parser.feed(b"\x1b[c", &mut screen, &mut events);
        assert!(events.contains(&EngineEvent::Reply(super::super::DEVICE_ATTRIBUTES_REPLY.to_vec())));
    }

    #[test]
    fn graphics_charset_translates_print() {
        let mut screen = Screen::new(10, 3, 100, 8);
        let mut parser = EscapeParser::new();
        let mut events = Vec::new();
        parser.feed(b"\x1b(0q\x1b(B", &mut screen, &mut events);
        assert_eq!(screen.cell(0, 0).ch, '\u{2500}');
    }

    #[test]
    fn graphics_charset_tags_cells_with_gfx_attr() {
        let mut screen = Screen::new(10, 3, 100, 8);
        let mut parser = EscapeParser::new();
        let mut events = Vec::new();
        parser.feed(b"\x1b(0q\x1b(Bx", &mut screen, &mut events);
        assert!(screen.cell(0, 0).attrs.contains(GlyphAttrs::GFX_LINE_DRAW));
        assert!(!screen.cell(1, 0).attrs.contains(GlyphAttrs::GFX_LINE_DRAW));
    }
}
