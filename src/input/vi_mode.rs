//! Select-mode: vi-style scrollback navigation, dispatched through the
//! same ordered-match shape the input router uses for everything else.

use crossterm::event::{KeyCode, KeyModifiers};

use crate::screen::{Screen, modes::ModeSet};
use crate::selection::{GridCoord, Selection, SelectionKind, SnapMode};

pub enum ViOutcome {
    Continue,
    Copy(String),
    Exit,
}

#[derive(Debug)]
pub struct ViModeState {
    visual: bool,
    saved_x: u16,
    saved_y: u16,
    saved_hide_cursor: bool,
    saved_ybase: i32,
}

impl ViModeState {
    /// Enters select-mode: saves the live cursor's position, visibility,
    /// and view offset, clears the hide-cursor flag, and parks the cursor
    /// at the bottom-left.
    pub fn enter(screen: &mut Screen) -> Self {
        let cursor = screen.cursor();
        let saved_hide_cursor = screen.modes().contains(ModeSet::HIDE_CURSOR);
        let saved_ybase = screen.ybase();
        screen.modes_mut().remove(ModeSet::HIDE_CURSOR);
        screen.set_cursor_position(0, screen.row() - 1);
        Self { visual: false, saved_x: cursor.x, saved_y: cursor.y, saved_hide_cursor, saved_ybase }
    }

    fn restore(&self, screen: &mut Screen) {
        screen.scroll_view(self.saved_ybase - screen.ybase());
        if self.saved_hide_cursor {
            screen.modes_mut().insert(ModeSet::HIDE_CURSOR);
        } else {
            screen.modes_mut().remove(ModeSet::HIDE_CURSOR);
        }
        screen.set_cursor_position(self.saved_x, self.saved_y);
    }

    /// Dispatches one select-mode keypress.
    pub fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        screen: &mut Screen,
        selection: &mut Selection,
    ) -> ViOutcome {
        let KeyCode::Char(ch) = code else {
            return ViOutcome::Continue;
        };
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let row = screen.row();

        match (ch, ctrl) {
            ('q', false) => {
                self.restore(screen);
                return ViOutcome::Exit;
            }
            ('h', false) => self.move_by(screen, -1, 0),
            ('l', false) => self.move_by(screen, 1, 0),
            ('j', false) => self.move_down(screen),
            ('k', false) => self.move_up(screen),
            ('0', false) => screen.set_cursor_position(0, screen.cursor().y),
            ('^', false) => screen.set_cursor_position(0, screen.cursor().y),
            ('$', false) => {
                let y = screen.cursor().y;
                let end = screen.visible_line(y).last_non_blank().unwrap_or(0);
                screen.set_cursor_position(end, y);
            }
            ('w', false) => self.word_forward(screen),
            ('e', false) => self.word_end(screen),
            ('b', false) => self.word_back(screen),
            ('{', false) => screen.scroll_view(-i32::from((row / 5).max(1))),
            ('}', false) => screen.scroll_view(i32::from((row / 5).max(1))),
            ('u', true) => screen.scroll_view(-i32::from((row / 2).max(1))),
            ('d', true) => screen.scroll_view(i32::from((row / 2).max(1))),
            ('b', true) => screen.scroll_view(-i32::from(row)),
            ('f', true) => screen.scroll_view(i32::from(row)),
            ('v', false) => self.enter_visual(screen, selection),
            ('y', false) if self.visual => {
                let text = selection.serialize(screen);
                selection.clear();
                self.restore(screen);
                return ViOutcome::Copy(text);
            }
            _ => {}
        }

        if self.visual {
            let cursor = screen.cursor();
            selection.update(screen, GridCoord::new(cursor.x, cursor.y));
        }
        ViOutcome::Continue
    }

    fn enter_visual(&mut self, screen: &Screen, selection: &mut Selection) {
        self.visual = true;
        let cursor = screen.cursor();
        let anchor = GridCoord::new(cursor.x, cursor.y);
        selection.begin(screen, anchor, SnapMode::None, SelectionKind::Linear);
    }

    fn move_by(&self, screen: &mut Screen, dx: i32, dy: i32) {
        let cursor = screen.cursor();
        let x = (i32::from(cursor.x) + dx).clamp(0, i32::from(screen.col()) - 1) as u16;
        let y = (i32::from(cursor.y) + dy).clamp(0, i32::from(screen.row()) - 1) as u16;
        screen.set_cursor_position(x, y);
    }

    fn move_down(&self, screen: &mut Screen) {
        let cursor = screen.cursor();
        if cursor.y + 1 < screen.row() {
            screen.set_cursor_position(cursor.x, cursor.y + 1);
        } else {
            screen.scroll_view(1);
        }
    }

    fn move_up(&self, screen: &mut Screen) {
        let cursor = screen.cursor();
        if cursor.y > 0 {
            screen.set_cursor_position(cursor.x, cursor.y - 1);
        } else {
            screen.scroll_view(-1);
        }
    }

    fn word_forward(&self, screen: &mut Screen) {
        let cursor = screen.cursor();
        let line = screen.visible_line(cursor.y);
        let chars: Vec<char> = line.cells().iter().map(|g| g.ch).collect();
        let mut x = cursor.x as usize;
        let on_word = chars.get(x).is_some_and(|c| !c.is_whitespace());
        if on_word {
            while x < chars.len() && !chars[x].is_whitespace() {
                x += 1;
            }
        }
        while x < chars.len() && chars[x].is_whitespace() {
            x += 1;
        }
        let x = x.min(chars.len().saturating_sub(1));
        screen.set_cursor_position(x as u16, cursor.y);
    }

    fn word_end(&self, screen: &mut Screen) {
        let cursor = screen.cursor();
        let line = screen.visible_line(cursor.y);
        let chars: Vec<char> = line.cells().iter().map(|g| g.ch).collect();
        if chars.is_empty() {
            return;
        }
        let mut x = (cursor.x as usize + 1).min(chars.len().saturating_sub(1));
        while x < chars.len() && chars[x].is_whitespace() {
            x += 1;
        }
        while x + 1 < chars.len() && !chars[x + 1].is_whitespace() {
            x += 1;
        }
        let x = x.min(chars.len().saturating_sub(1));
        screen.set_cursor_position(x as u16, cursor.y);
    }

    fn word_back(&self, screen: &mut Screen) {
        let cursor = screen.cursor();
        let line = screen.visible_line(cursor.y);
        let chars: Vec<char> = line.cells().iter().map(|g| g.ch).collect();
        if chars.is_empty() || cursor.x == 0 {
            return;
        }
        let mut x = cursor.x as usize - 1;
        while x > 0 && chars[x].is_whitespace() {
            x -= 1;
        }
        while x > 0 && !chars[x - 1].is_whitespace() {
            x -= 1;
        }
        screen.set_cursor_position(x as u16, cursor.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::Screen;

    fn feed(screen: &mut Screen, text: &str) {
        for ch in text.chars() {
            screen.put_char(ch);
        }
    }

    #[test]
    fn enter_parks_cursor_bottom_left_and_clears_hide_flag() {
        let mut screen = Screen::new(10, 4, 10, 8);
        screen.modes_mut().insert(ModeSet::HIDE_CURSOR);
        let vi = ViModeState::enter(&mut screen);
        assert_eq!((screen.cursor().x, screen.cursor().y), (0, 3));
        assert!(!screen.modes().contains(ModeSet::HIDE_CURSOR));
        drop(vi);
    }

    #[test]
    fn quit_restores_saved_cursor_and_hide_flag() {
        let mut screen = Screen::new(10, 4, 10, 8);
        screen.move_to(3, 1);
        screen.modes_mut().insert(ModeSet::HIDE_CURSOR);
        let mut vi = ViModeState::enter(&mut screen);
        let mut selection = Selection::new();
        let outcome = vi.handle_key(KeyCode::Char('q'), KeyModifiers::NONE, &mut screen, &mut selection);
        assert!(matches!(outcome, ViOutcome::Exit));
        assert_eq!((screen.cursor().x, screen.cursor().y), (3, 1));
        assert!(screen.modes().contains(ModeSet::HIDE_CURSOR));
    }

    #[test]
    fn word_forward_skips_to_next_word_start() {
        let mut screen = Screen::new(10, 1, 10, 8);
        feed(&mut screen, "ab  cd");
        let mut vi = ViModeState::enter(&mut screen);
        let mut selection = Selection::new();
        screen.set_cursor_position(0, 0);
        let _ = vi.handle_key(KeyCode::Char('w'), KeyModifiers::NONE, &mut screen, &mut selection);
        assert_eq!(screen.cursor().x, 4);
    }

    #[test]
    fn visual_mode_tracks_cursor_into_selection() {
        let mut screen = Screen::new(10, 1, 10, 8);
        feed(&mut screen, "hello");
        let mut vi = ViModeState::enter(&mut screen);
        let mut selection = Selection::new();
        screen.set_cursor_position(0, 0);
        let _ = vi.handle_key(KeyCode::Char('v'), KeyModifiers::NONE, &mut screen, &mut selection);
        let _ = vi.handle_key(KeyCode::Char('l'), KeyModifiers::NONE, &mut screen, &mut selection);
        let _ = vi.handle_key(KeyCode::Char('l'), KeyModifiers::NONE, &mut screen, &mut selection);
        assert!(selection.contains(&screen, 2, 0));
    }
}
