//! CSI dispatch table: the mandatory-behaviors table and the private-mode
//! table that follows it.

use super::{EngineEvent, DEVICE_ATTRIBUTES_REPLY, flat_params, param_or, sgr};
use crate::screen::{Screen, modes::ModeSet};

pub fn dispatch(
    screen: &mut Screen,
    action: char,
    raw_params: &vte::Params,
    intermediates: &[u8],
    events: &mut Vec<EngineEvent>,
) {
    let params = flat_params(raw_params);
    let private = intermediates.contains(&b'?');
    let n = |i: usize| param_or(&params, i, 1);

    match action {
        '@' => {
            let (x, y) = (screen.cursor().x, screen.cursor().y);
            screen.insert_blanks(x, y, n(0));
        }
        'A' => move_relative(screen, 0, -i32::from(n(0))),
        'B' => move_relative(screen, 0, i32::from(n(0))),
        'C' => move_relative(screen, i32::from(n(0)), 0),
        'D' => move_relative(screen, -i32::from(n(0)), 0),
        'E' => {
            move_relative(screen, 0, i32::from(n(0)));
            let y = screen.cursor().y;
            screen.move_to(0, y);
        }
        'F' => {
            move_relative(screen, 0, -i32::from(n(0)));
            let y = screen.cursor().y;
            screen.move_to(0, y);
        }
        'G' | '`' => {
            let y = screen.cursor().y;
            screen.move_to(n(0) - 1, y);
        }
        'H' | 'f' => cursor_position(screen, &params),
        'I' => screen.tab_forward(n(0)),
        'Z' => screen.tab_backward(n(0)),
        'J' => erase_display(screen, param_or(&params, 0, 0)),
        'K' => erase_line(screen, param_or(&params, 0, 0)),
        'L' => {
            screen.insert_lines(n(0));
        }
        'M' => {
            screen.delete_lines(n(0));
        }
        'P' => {
            let (x, y) = (screen.cursor().x, screen.cursor().y);
            screen.delete_chars(x, y, n(0));
        }
        'S' => {
            let (top, _) = screen.scroll_region();
            screen.scroll_up(top, n(0));
        }
        'T' => {
            let (top, _) = screen.scroll_region();
            screen.scroll_down(top, n(0));
        }
        'X' => {
            let (x, y) = (screen.cursor().x, screen.cursor().y);
            screen.erase_chars(x, y, n(0));
        }
        'c' if !private => events.push(EngineEvent::Reply(DEVICE_ATTRIBUTES_REPLY.to_vec())),
        'd' => {
            let target = row_with_origin(screen, param_or(&params, 0, 1));
            let x = screen.cursor().x;
            screen.move_to(x, target);
        }
        'g' => match param_or(&params, 0, 0) {
            3 => screen.clear_all_tab_stops(),
            _ => screen.clear_tab_stop_at_cursor(),
        },
        'h' => set_modes(screen, &params, private, true),
        'l' => set_modes(screen, &params, private, false),
        'm' => sgr::apply(screen, &params),
        'r' => {
            let (top, bot) = if params.is_empty() {
                (0, screen.row() - 1)
            } else {
                (param_or(&params, 0, 1) - 1, param_or(&params, 1, screen.row()) - 1)
            };
            screen.set_scroll_region(top, bot);
            screen.move_to(0, 0);
        }
        's' => screen.save_cursor(),
        'u' => screen.restore_cursor(),
        _ => tracing::debug!(action, "unhandled CSI final byte"),
    }
}

fn move_relative(screen: &mut Screen, dx: i32, dy: i32) {
    let cursor = screen.cursor();
    let x = (i32::from(cursor.x) + dx).max(0) as u16;
    let y = (i32::from(cursor.y) + dy).max(0) as u16;
    screen.move_to(x, y);
}

fn row_with_origin(screen: &Screen, row_param: u16) -> u16 {
    let (top, _) = screen.scroll_region();
    if screen.cursor().origin { top + row_param - 1 } else { row_param - 1 }
}

fn cursor_position(screen: &mut Screen, params: &[u16]) {
    let row_param = param_or(params, 0, 1);
    let col_param = param_or(params, 1, 1);
    let y = row_with_origin(screen, row_param);
    screen.move_to(col_param - 1, y);
}

fn erase_display(screen: &mut Screen, mode: u16) {
    let (x, y) = (screen.cursor().x, screen.cursor().y);
    let (col, row) = (screen.col(), screen.row());
    match mode {
        0 => {
            screen.clear_region(x, y, col - 1, y);
            if y + 1 < row {
                screen.clear_region(0, y + 1, col - 1, row - 1);
            }
        }
        1 => {
            if y > 0 {
                screen.clear_region(0, 0, col - 1, y - 1);
            }
            screen.clear_region(0, y, x, y);
        }
        2 | 3 => screen.clear_region(0, 0, col - 1, row - 1),
        _ => {}
    }
}

fn erase_line(screen: &mut Screen, mode: u16) {
    let (x, y) = (screen.cursor().x, screen.cursor().y);
    let col = screen.col();
    match mode {
        0 => screen.clear_region(x, y, col - 1, y),
        1 => screen.clear_region(0, y, x, y),
        2 => screen.clear_region(0, y, col - 1, y),
        _ => {}
    }
}

fn set_modes(screen: &mut Screen, params: &[u16], private: bool, set: bool) {
    for &code in params {
        if private {
            set_private_mode(screen, code, set);
        } else {
            // No ANSI (non-private) modes are handled beyond what private
            // mode 7 already covers as DECAWM; ignore.
            tracing::debug!(code, set, "unhandled ANSI mode");
        }
    }
}

fn set_private_mode(screen: &mut Screen, code: u16, set: bool) {
    let modes = screen.modes_mut();
    match code {
        1 => modes.set(ModeSet::APP_CURSOR, set),
        5 => modes.set(ModeSet::REVERSE_VIDEO, set),
        6 => {
            screen.set_cursor_origin(set);
            screen.move_to(0, 0);
        }
        7 => modes.set(ModeSet::WRAP, set),
        25 => modes.set(ModeSet::HIDE_CURSOR, !set),
        47 => toggle_alt_screen(screen, set, false, false),
        1047 => toggle_alt_screen(screen, set, false, true),
        1048 => {
            if set {
                screen.save_cursor();
            } else {
                screen.restore_cursor();
            }
        }
        1049 => toggle_alt_screen(screen, set, true, true),
        1000 => screen.modes_mut().set(ModeSet::MOUSE_BTN_REPORT, set),
        1002 => screen.modes_mut().set(ModeSet::MOUSE_MOTION_REPORT, set),
        1006 => screen.modes_mut().set(ModeSet::MOUSE_SGR, set),
        1034 => screen.modes_mut().set(ModeSet::EIGHT_BIT_INPUT, set),
        _ => tracing::debug!(code, set, "unhandled private mode"),
    }
}

fn toggle_alt_screen(screen: &mut Screen, set: bool, save_restore_cursor: bool, clear_on_enter: bool) {
    if set {
        if !screen.alt_screen_enabled() || screen.is_alt_screen() {
            return;
        }
        if save_restore_cursor {
            screen.save_cursor();
        }
        screen.swap_screen();
        if clear_on_enter {
            let (col, row) = (screen.col(), screen.row());
            screen.clear_region(0, 0, col - 1, row - 1);
        }
    } else {
        if !screen.is_alt_screen() {
            return;
        }
        screen.swap_screen();
        if save_restore_cursor {
            screen.restore_cursor();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::screen::modes::ModeSet;

    fn dispatch_str(screen: &mut Screen, seq: &str) {
        let mut parser = crate::parser::EscapeParser::new();
        let mut events = Vec::new();
        parser.feed(seq.as_bytes(), screen, &mut events);
    }

    #[test_case("\x1b[B", (0, 1); "cursor down")]
    #[test_case("\x1b[2B", (0, 2); "cursor down by 2")]
    #[test_case("\x1b[C", (1, 0); "cursor forward")]
    #[test_case("\x1b[3C", (3, 0); "cursor forward by 3")]
    fn cursor_movement_final_bytes(seq: &str, expected: (u16, u16)) {
        let mut screen = Screen::new(10, 5, 100, 8);
        dispatch_str(&mut screen, seq);
        assert_eq!((screen.cursor().x, screen.cursor().y), expected);
    }

    #[test]
    fn cup_moves_to_one_based_row_and_col() {
        let mut screen = Screen::new(10, 10, 100, 8);
        dispatch_str(&mut screen, "\x1b[5;3H");
        assert_eq!((screen.cursor().x, screen.cursor().y), (2, 4));
    }

    #[test]
    fn ich_shifts_cells_right_and_truncates() {
        let mut screen = Screen::new(5, 1, 100, 8);
        dispatch_str(&mut screen, "abcde");
        screen.move_to(1, 0);
        dispatch_str(&mut screen, "\x1b[2@");
        assert_eq!(screen.cell(1, 0).ch, ' ');
        assert_eq!(screen.cell(2, 0).ch, ' ');
        assert_eq!(screen.cell(3, 0).ch, 'b');
        assert_eq!(screen.cell(4, 0).ch, 'c');
    }

    #[test]
    fn dch_shifts_cells_left_and_fills_blank_at_right_edge() {
        let mut screen = Screen::new(5, 1, 100, 8);
        dispatch_str(&mut screen, "abcde");
        screen.move_to(1, 0);
        dispatch_str(&mut screen, "\x1b[2P");
        assert_eq!(screen.cell(1, 0).ch, 'd');
        assert_eq!(screen.cell(2, 0).ch, 'e');
        assert_eq!(screen.cell(3, 0).ch, ' ');
        assert_eq!(screen.cell(4, 0).ch, ' ');
    }

    #[test_case(0, vec![' ', ' ', ' ']; "erase below cursor")]
    #[test_case(2, vec![' ', ' ', ' ']; "erase entire line")]
    fn el_erases_expected_span(mode: u16, expected: Vec<char>) {
        let mut screen = Screen::new(3, 1, 100, 8);
        dispatch_str(&mut screen, "abc");
        screen.move_to(0, 0);
        dispatch_str(&mut screen, &format!("\x1b[{mode}K"));
        let got: Vec<char> = (0..3).map(|x| screen.cell(x, 0).ch).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn decstbm_sets_region_and_homes_cursor() {
        let mut screen = Screen::new(10, 10, 100, 8);
        screen.move_to(5, 5);
        dispatch_str(&mut screen, "\x1b[3;7r");
        assert_eq!(screen.scroll_region(), (2, 6));
        assert_eq!((screen.cursor().x, screen.cursor().y), (0, 0));
    }

    #[test]
    fn private_mode_25_hides_and_shows_cursor() {
        let mut screen = Screen::new(10, 10, 100, 8);
        dispatch_str(&mut screen, "\x1b[?25l");
        assert!(screen.modes().contains(ModeSet::HIDE_CURSOR));
        dispatch_str(&mut screen, "\x1b[?25h");
        assert!(!screen.modes().contains(ModeSet::HIDE_CURSOR));
    }

    #[test]
    fn private_mode_1049_enters_and_leaves_alt_screen() {
        let mut screen = Screen::new(10, 10, 100, 8);
        dispatch_str(&mut screen, "abc");
        let cursor_before = screen.cursor();
        dispatch_str(&mut screen, "\x1b[?1049h");
        assert!(screen.is_alt_screen());
        dispatch_str(&mut screen, "\x1b[?1049l");
        assert!(!screen.is_alt_screen());
        assert_eq!(screen.cursor(), cursor_before);
    }

    #[test]
    fn alt_screen_disabled_ignores_1049() {
        let mut screen = Screen::new(10, 10, 100, 8);
        screen.set_alt_screen_enabled(false);
        dispatch_str(&mut screen, "\x1b[?1049h");
        assert!(!screen.is_alt_screen());
    }

    #[test]
    fn da_reply_is_vt102() {
        let mut screen = Screen::new(10, 10, 100, 8);
        let mut parser = crate::parser::EscapeParser::new();
        let mut events = Vec::new();
        parser.feed(b"\x1b[c", &mut screen, &mut events);
        assert_eq!(events, vec![EngineEvent::Reply(DEVICE_ATTRIBUTES_REPLY.to_vec())]);
    }
}
