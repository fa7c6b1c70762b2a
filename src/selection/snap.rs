//! Word and line snap expansion.

use super::GridCoord;
use crate::screen::Screen;

/// Characters that delimit a "word" for word-snap purposes. Kept minimal
/// and ASCII-centric; a renderer-level config could widen this, but the
/// core needs a sane built-in default to be testable on its own.
const WORD_DELIMITERS: &[char] = &[' ', '\t', '"', '\'', '`', '(', ')', '[', ']', '{', '}'];

fn is_delimiter(ch: char) -> bool { WORD_DELIMITERS.contains(&ch) }

/// Expands both ends outward from `anchor` while the adjacent cell's
/// codepoint is not a word delimiter. At a right edge whose row carries
/// the wrap-indicator, expansion continues onto the next row, and
/// symmetrically at a left edge against the previous row's indicator.
pub fn expand_word(screen: &Screen, anchor: GridCoord) -> (GridCoord, GridCoord) {
    let col = screen.col();
    let row = screen.row();

    let anchor_ch = screen.visible_line(anchor.y).get(anchor.x).map_or(' ', |g| g.ch);
    if is_delimiter(anchor_ch) {
        return (anchor, anchor);
    }

    let mut begin = anchor;
    loop {
        if begin.x == 0 {
            if begin.y == 0 {
                break;
            }
            let prev_y = begin.y - 1;
            let prev_line = screen.visible_line(prev_y);
            if !prev_line.get(col - 1).is_some_and(|g| g.has_wrap_indicator()) {
                break;
            }
            let prev_ch = prev_line.get(col - 1).map_or(' ', |g| g.ch);
            if is_delimiter(prev_ch) {
                break;
            }
            begin = GridCoord::new(col - 1, prev_y);
            continue;
        }
        let candidate = GridCoord::new(begin.x - 1, begin.y);
        let ch = screen.visible_line(candidate.y).get(candidate.x).map_or(' ', |g| g.ch);
        if is_delimiter(ch) {
            break;
        }
        begin = candidate;
    }

    let mut end = anchor;
    loop {
        let line = screen.visible_line(end.y);
        if end.x + 1 >= col {
            if !line.get(col - 1).is_some_and(|g| g.has_wrap_indicator()) || end.y + 1 >= row {
                break;
            }
            let next_ch = screen.visible_line(end.y + 1).get(0).map_or(' ', |g| g.ch);
            if is_delimiter(next_ch) {
                break;
            }
            end = GridCoord::new(0, end.y + 1);
            continue;
        }
        let candidate_ch = line.get(end.x + 1).map_or(' ', |g| g.ch);
        if is_delimiter(candidate_ch) {
            break;
        }
        end = GridCoord::new(end.x + 1, end.y);
    }

    (begin, end)
}

/// Expands to the whole logical line containing `anchor`, following
/// wrap-indicator chains across physical row boundaries in both
/// directions.
pub fn expand_line(screen: &Screen, anchor: GridCoord) -> (GridCoord, GridCoord) {
    let col = screen.col();
    let row = screen.row();

    let mut begin_y = anchor.y;
    while begin_y > 0 && screen.visible_line(begin_y - 1).get(col - 1).is_some_and(|g| g.has_wrap_indicator()) {
        begin_y -= 1;
    }

    let mut end_y = anchor.y;
    while end_y + 1 < row && screen.visible_line(end_y).get(col - 1).is_some_and(|g| g.has_wrap_indicator()) {
        end_y += 1;
    }

    (GridCoord::new(0, begin_y), GridCoord::new(col - 1, end_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_snap_expands_within_a_single_row() {
        let mut screen = Screen::new(10, 1, 10, 8);
        for ch in "foo bar".chars() {
            screen.put_char(ch);
        }
        let (b, e) = expand_word(&screen, GridCoord::new(5, 0));
        assert_eq!((b.x, e.x), (4, 6));
    }

    #[test]
    fn word_snap_crosses_wrap_boundary() {
        let mut screen = Screen::new(4, 2, 10, 8);
        for ch in "abcdef".chars() {
            screen.put_char(ch);
        }
        let (b, e) = expand_word(&screen, GridCoord::new(0, 1));
        assert_eq!(b, GridCoord::new(0, 0));
        assert_eq!(e, GridCoord::new(1, 1));
    }

    #[test]
    fn line_snap_crosses_wrap_boundary() {
        let mut screen = Screen::new(4, 2, 10, 8);
        for ch in "abcdef".chars() {
            screen.put_char(ch);
        }
        let (b, e) = expand_line(&screen, GridCoord::new(0, 1));
        assert_eq!(b, GridCoord::new(0, 0));
        assert_eq!(e, GridCoord::new(3, 1));
    }

    #[test]
    fn word_snap_on_delimiter_selects_only_itself() {
        let mut screen = Screen::new(10, 1, 10, 8);
        for ch in "a b".chars() {
            screen.put_char(ch);
        }
        let (b, e) = expand_word(&screen, GridCoord::new(1, 0));
        assert_eq!((b, e), (GridCoord::new(1, 0), GridCoord::new(1, 0)));
    }
}
