//! Mouse reporting wire format: encodes a mouse event into the byte
//! sequence sent to the client program when a mouse-tracking mode is
//! active, following the crate's existing byte-sequence-builder style
//! (`parser::sgr`/`parser::csi`).

use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};

/// Button code before the xterm offset bias, or `None` for a release.
fn button_code(kind: MouseEventKind) -> Option<u8> {
    match kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => Some(0),
        MouseEventKind::Down(MouseButton::Middle) | MouseEventKind::Drag(MouseButton::Middle) => Some(1),
        MouseEventKind::Down(MouseButton::Right) | MouseEventKind::Drag(MouseButton::Right) => Some(2),
        MouseEventKind::Up(_) => Some(3),
        MouseEventKind::ScrollUp => Some(64),
        MouseEventKind::ScrollDown => Some(65),
        MouseEventKind::Moved => None,
        _ => None,
    }
}

fn modifier_bits(modifiers: KeyModifiers) -> u8 {
    let mut bits = 0;
    if modifiers.contains(KeyModifiers::SHIFT) {
        bits += 4;
    }
    if modifiers.contains(KeyModifiers::ALT) {
        bits += 8;
    }
    if modifiers.contains(KeyModifiers::CONTROL) {
        bits += 16;
    }
    bits
}

fn motion_bit(kind: MouseEventKind) -> u8 {
    if matches!(kind, MouseEventKind::Drag(_) | MouseEventKind::Moved) { 32 } else { 0 }
}

/// Classic X10 encoding: `ESC [ M` button col row, each biased by 32.
/// Refuses to emit (returns `None`) once col or row reach 223, since a
/// single biased byte can't represent them.
#[must_use]
pub fn encode_x10(kind: MouseEventKind, modifiers: KeyModifiers, col: u16, row: u16) -> Option<Vec<u8>> {
    if col >= 223 || row >= 223 {
        return None;
    }
    let button = button_code(kind)? | modifier_bits(modifiers) | motion_bit(kind);
    Some(vec![0x1B, b'[', b'M', 32 + button, 32 + col as u8 + 1, 32 + row as u8 + 1])
}

/// SGR encoding: `ESC [ < button ; col+1 ; row+1 (M|m)`, unbounded in
/// column/row range unlike X10.
#[must_use]
pub fn encode_sgr(kind: MouseEventKind, modifiers: KeyModifiers, col: u16, row: u16) -> Option<Vec<u8>> {
    let button = button_code(kind)? | modifier_bits(modifiers) | motion_bit(kind);
    let final_byte = if matches!(kind, MouseEventKind::Up(_)) { 'm' } else { 'M' };
    Some(format!("\x1b[<{button};{};{}{final_byte}", col + 1, row + 1).into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x10_left_button_press_at_origin() {
        let bytes = encode_x10(MouseEventKind::Down(MouseButton::Left), KeyModifiers::NONE, 0, 0).unwrap();
        assert_eq!(bytes, vec![0x1B, b'[', b'M', 32, 33, 33]);
    }

    #[test]
    fn x10_refuses_past_223_columns() {
        assert!(encode_x10(MouseEventKind::Down(MouseButton::Left), KeyModifiers::NONE, 223, 0).is_none());
    }

    #[test]
    fn sgr_release_uses_lowercase_final_byte() {
        let bytes = encode_sgr(MouseEventKind::Up(MouseButton::Left), KeyModifiers::NONE, 9, 4).unwrap();
        assert_eq!(bytes, b"\x1b[<3;10;5m".to_vec());
    }

    #[test]
    fn sgr_applies_ctrl_modifier_bit() {
        let bytes = encode_sgr(MouseEventKind::Down(MouseButton::Left), KeyModifiers::CONTROL, 0, 0).unwrap();
        assert_eq!(bytes, b"\x1b[<16;1;1M".to_vec());
    }

    #[test]
    fn sgr_drag_sets_motion_bit() {
        let bytes = encode_sgr(MouseEventKind::Drag(MouseButton::Left), KeyModifiers::NONE, 0, 0).unwrap();
        assert_eq!(bytes, b"\x1b[<32;1;1M".to_vec());
    }
}
