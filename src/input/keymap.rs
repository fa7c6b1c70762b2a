//! The keymap table: matches
//! `(keysym, modifier_mask, app-keypad?, app-cursor?, CRLF?)` and emits a
//! byte sequence to the focused terminal. The bulk of key bindings are
//! injected/external configuration; what's fixed here is the handful of
//! keys whose VT encoding is mode-sensitive (cursor keys under DECCKM,
//! Enter under LNM) and therefore can't be pushed out to a static external
//! table without duplicating mode state.

use crossterm::event::{KeyCode, KeyModifiers};

use crate::screen::modes::ModeSet;

/// Looks up the escape sequence for a non-printable key, given the
/// focused terminal's current modes. Returns `None` for keys the default
/// text-forwarding step should handle instead.
#[must_use]
pub fn lookup(code: KeyCode, modifiers: KeyModifiers, modes: ModeSet) -> Option<Vec<u8>> {
    let app_cursor = modes.contains(ModeSet::APP_CURSOR);
    let crlf = modes.contains(ModeSet::CRLF);

    match code {
        KeyCode::Up => Some(cursor_key(b'A', app_cursor)),
        KeyCode::Down => Some(cursor_key(b'B', app_cursor)),
        KeyCode::Right => Some(cursor_key(b'C', app_cursor)),
        KeyCode::Left => Some(cursor_key(b'D', app_cursor)),
        KeyCode::Home => Some(cursor_key(b'H', app_cursor)),
        KeyCode::End => Some(cursor_key(b'F', app_cursor)),
        KeyCode::PageUp => Some(b"\x1b[5~".to_vec()),
        KeyCode::PageDown => Some(b"\x1b[6~".to_vec()),
        KeyCode::Insert => Some(b"\x1b[2~".to_vec()),
        KeyCode::Delete => Some(b"\x1b[3~".to_vec()),
        KeyCode::F(n) => Some(function_key(n)),
        KeyCode::Enter => Some(if crlf { b"\r\n".to_vec() } else { b"\r".to_vec() }),
        KeyCode::Backspace => Some(vec![0x7F]),
        KeyCode::Tab => Some(vec![0x09]),
        KeyCode::BackTab => Some(b"\x1b[Z".to_vec()),
        KeyCode::Char(ch) if modifiers.contains(KeyModifiers::CONTROL) => ctrl_char(ch),
        _ => None,
    }
}

fn cursor_key(final_byte: u8, app_cursor: bool) -> Vec<u8> {
    let introducer: u8 = if app_cursor { b'O' } else { b'[' };
    vec![0x1B, introducer, final_byte]
}

fn function_key(n: u8) -> Vec<u8> {
    match n {
        1 => b"\x1bOP".to_vec(),
        2 => b"\x1bOQ".to_vec(),
        3 => b"\x1bOR".to_vec(),
        4 => b"\x1bOS".to_vec(),
        5 => b"\x1b[15~".to_vec(),
        6 => b"\x1b[17~".to_vec(),
        7 => b"\x1b[18~".to_vec(),
        8 => b"\x1b[19~".to_vec(),
        9 => b"\x1b[20~".to_vec(),
        10 => b"\x1b[21~".to_vec(),
        11 => b"\x1b[23~".to_vec(),
        12 => b"\x1b[24~".to_vec(),
        _ => vec![0x1B],
    }
}

/// Maps a Ctrl-modified letter to its C0 control code (`Ctrl-A` = 0x01,
/// ..., `Ctrl-Z` = 0x1A).
fn ctrl_char(ch: char) -> Option<Vec<u8>> {
    let lower = ch.to_ascii_lowercase();
    if lower.is_ascii_lowercase() {
        Some(vec![lower as u8 - b'a' + 1])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_key_switches_on_app_cursor_mode() {
        assert_eq!(lookup(KeyCode::Up, KeyModifiers::NONE, ModeSet::empty()), Some(b"\x1b[A".to_vec()));
        assert_eq!(
            lookup(KeyCode::Up, KeyModifiers::NONE, ModeSet::APP_CURSOR),
            Some(b"\x1bOA".to_vec())
        );
    }

    #[test]
    fn enter_respects_crlf_mode() {
        assert_eq!(lookup(KeyCode::Enter, KeyModifiers::NONE, ModeSet::empty()), Some(b"\r".to_vec()));
        assert_eq!(lookup(KeyCode::Enter, KeyModifiers::NONE, ModeSet::CRLF), Some(b"\r\n".to_vec()));
    }

    #[test]
    fn ctrl_letter_maps_to_control_code() {
        assert_eq!(
            lookup(KeyCode::Char('c'), KeyModifiers::CONTROL, ModeSet::empty()),
            Some(vec![0x03])
        );
    }

    #[test]
    fn plain_char_falls_through_to_default_step() {
        assert_eq!(lookup(KeyCode::Char('x'), KeyModifiers::NONE, ModeSet::empty()), None);
    }
}
