//! DEC Special Graphics (line-drawing) charset translation.

/// Translates `ch` through the fixed line-drawing table when the graphics
/// charset is active. Bytes outside `0x41..=0x7E` pass through unchanged.
#[must_use]
pub fn translate(ch: char) -> char {
    let Ok(byte) = u8::try_from(ch as u32) else { return ch };
    if !(0x41..=0x7E).contains(&byte) {
        return ch;
    }
    match byte {
        b'`' => '\u{25c6}', // diamond
        b'a' => '\u{2592}', // checkerboard
        b'b' => '\u{2409}', // HT
        b'c' => '\u{240c}', // FF
        b'd' => '\u{240d}', // CR
        b'e' => '\u{240a}', // LF
        b'f' => '\u{00b0}', // degree
        b'g' => '\u{00b1}', // plus/minus
        b'h' => '\u{2424}', // NL
        b'i' => '\u{240b}', // VT
        b'j' => '\u{2518}', // bottom-right corner
        b'k' => '\u{2510}', // top-right corner
        b'l' => '\u{250c}', // top-left corner
        b'm' => '\u{2514}', // bottom-left corner
        b'n' => '\u{253c}', // crossing lines
        b'o' => '\u{23ba}', // scan line 1
        b'p' => '\u{23bb}', // scan line 3
        b'q' => '\u{2500}', // horizontal line
        b'r' => '\u{23bc}', // scan line 7
        b's' => '\u{23bd}', // scan line 9
        b't' => '\u{251c}', // left tee
        b'u' => '\u{2524}', // right tee
        b'v' => '\u{2534}', // bottom tee
        b'w' => '\u{252c}', // top tee
        b'x' => '\u{2502}', // vertical line
        b'y' => '\u{2264}', // less-or-equal
        b'z' => '\u{2265}', // greater-or-equal
        b'{' => '\u{03c0}', // pi
        b'|' => '\u{2260}', // not-equal
        b'}' => '\u{00a3}', // pound sterling
        b'~' => '\u{00b7}', // bullet
        _ => ch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_box_drawing_bytes() {
        assert_eq!(translate('q'), '\u{2500}');
        assert_eq!(translate('x'), '\u{2502}');
    }

    #[test]
    fn passes_through_unmapped_bytes() {
        assert_eq!(translate('A'), 'A');
        assert_eq!(translate('5'), '5');
    }
}
