//! The two-buffer screen model: scroll regions, tab stops, modes, and the
//! scrollback view-shift.

pub mod cell;
pub mod cursor;
pub mod grid;
pub mod modes;
pub mod scrollback;

use cell::{Color, Glyph, GlyphAttrs};
use cursor::{Cursor, SavedCursor};
use grid::{Grid, Line};
use modes::ModeSet;
use scrollback::Scrollback;

/// An inclusive grid-space rectangle touched by a bulk mutation, used by
/// the process-wide selection to decide whether it needs to be cleared:
/// any mutation that overwrites a selected cell clears it.
pub type TouchedRect = (u16, u16, u16, u16);

#[derive(Debug, Clone)]
pub struct Screen {
    primary: Grid,
    alternate: Grid,
    using_alt: bool,
    scrollback: Scrollback,
    /// Snapshot of the live grid taken when the view first leaves the live
    /// edge.
    last_line: Option<Grid>,
    cursor: Cursor,
    saved_cursor: Option<SavedCursor>,
    scroll_top: u16,
    scroll_bot: u16,
    tabstops: Vec<bool>,
    modes: ModeSet,
    /// View base: the scrollback view's offset from the live edge. Always
    /// `<= 0`.
    ybase: i32,
    col: u16,
    row: u16,
    tab_stop_width: u16,
    force_all_dirty: bool,
    touched: Vec<TouchedRect>,
    /// GFX line-drawing charset active (`ESC ( 0` / `ESC ( B`).
    graphics_charset: bool,
    /// `-a`: when `false`, the `?47`/`?1047`/`?1049` private modes are
    /// accepted but never actually swap screens.
    alt_screen_enabled: bool,
}

impl Screen {
    #[must_use]
    pub fn new(col: u16, row: u16, scrollback_capacity: usize, tab_stop_width: u16) -> Self {
        let mut screen = Self {
            primary: Grid::new(col, row),
            alternate: Grid::new(col, row),
            using_alt: false,
            scrollback: Scrollback::new(scrollback_capacity),
            last_line: None,
            cursor: Cursor::default(),
            saved_cursor: None,
            scroll_top: 0,
            scroll_bot: row.saturating_sub(1),
            tabstops: Vec::new(),
            modes: ModeSet::default(),
            ybase: 0,
            col,
            row,
            tab_stop_width,
            force_all_dirty: false,
            touched: Vec::new(),
            graphics_charset: false,
            alt_screen_enabled: true,
        };
        screen.rebuild_tabstops();
        screen
    }

    // --- accessors -------------------------------------------------------

    #[must_use]
    pub fn col(&self) -> u16 { self.col }

    #[must_use]
    pub fn row(&self) -> u16 { self.row }

    #[must_use]
    pub fn cursor(&self) -> Cursor { self.cursor }

    #[must_use]
    pub fn modes(&self) -> ModeSet { self.modes }

    pub fn modes_mut(&mut self) -> &mut ModeSet { &mut self.modes }

    #[must_use]
    pub fn scroll_region(&self) -> (u16, u16) { (self.scroll_top, self.scroll_bot) }

    #[must_use]
    pub fn ybase(&self) -> i32 { self.ybase }

    #[must_use]
    pub fn scrollback_len(&self) -> usize { self.scrollback.len() }

    #[must_use]
    pub fn tabstops(&self) -> &[bool] { &self.tabstops }

    #[must_use]
    fn current_grid(&self) -> &Grid { if self.using_alt { &self.alternate } else { &self.primary } }

    fn current_grid_mut(&mut self) -> &mut Grid {
        if self.using_alt { &mut self.alternate } else { &mut self.primary }
    }

    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> &Glyph { self.current_grid().cell(x, y) }

    /// Drains the list of rectangles touched since the last drain, for the
    /// process-wide selection to invalidate against.
    pub fn drain_touched(&mut self) -> Vec<TouchedRect> { std::mem::take(&mut self.touched) }

    /// Per-row dirty bitmap for whatever is currently visible (live grid,
    /// or the scrollback/snapshot composite while `ybase != 0`).
    #[must_use]
    pub fn dirty(&self) -> Vec<bool> {
        if self.force_all_dirty {
            vec![true; self.row as usize]
        } else {
            self.current_grid().dirty().to_vec()
        }
    }

    pub fn clear_dirty(&mut self) {
        self.force_all_dirty = false;
        self.primary.clear_dirty();
        self.alternate.clear_dirty();
    }

    /// Composes the row the renderer should show at visible index `y`,
    /// mapping through the scrollback/snapshot when `ybase != 0`.
    #[must_use]
    pub fn visible_line(&self, y: u16) -> Line {
        if self.ybase == 0 {
            return self.current_grid().line(y).clone();
        }
        let signed_index = i32::from(y) + self.ybase;
        if signed_index < 0 {
            let sb_index = (-(signed_index + 1)) as usize;
            self.scrollback
                .get_resized(sb_index, self.col)
                .unwrap_or_else(|| Line::blank(self.col))
        } else {
            self.last_line
                .as_ref()
                .map_or_else(|| Line::blank(self.col), |g| g.line(signed_index as u16).clone())
        }
    }

    fn default_fill(&self) -> Glyph {
        Glyph::blank_with_attrs(self.cursor.attrs, self.cursor.fg, self.cursor.bg)
    }

    // --- screen buffer operations ------------------------------------------

    pub fn put_char(&mut self, ch: char) { self.put_char_with_attrs(ch, GlyphAttrs::empty()); }

    /// Like [`Screen::put_char`], but ORs `extra` into the written cell's
    /// attributes without touching the cursor's own SGR state (used by the
    /// line-drawing charset to tag substituted glyphs).
    pub fn put_char_with_attrs(&mut self, ch: char, extra: GlyphAttrs) {
        let col = self.col;
        if self.cursor.wrap_next {
            self.set_wrap_indicator();
            self.newline(true);
            self.cursor.wrap_next = false;
        }
        if self.modes.contains(ModeSet::INSERT) && self.cursor.x + 1 < col {
            self.insert_blanks(self.cursor.x, self.cursor.y, 1);
        }
        let glyph = Glyph { ch, attrs: self.cursor.attrs | extra, fg: self.cursor.fg, bg: self.cursor.bg };
        let (x, y) = (self.cursor.x, self.cursor.y);
        self.current_grid_mut().set_cell(x, y, glyph);
        self.touched.push((x, y, x, y));

        if self.cursor.x + 1 < col {
            self.cursor.x += 1;
        } else if self.modes.contains(ModeSet::WRAP) {
            self.cursor.wrap_next = true;
        }
    }

    fn set_wrap_indicator(&mut self) {
        let (x, y) = (self.col - 1, self.cursor.y);
        if let Some(cell) = self.current_grid_mut().line_mut(y).get_mut(x) {
            cell.attrs.insert(GlyphAttrs::WRAP_INDICATOR);
        }
    }

    /// Inserts `n` blanks at `(x, y)`, shifting cells right and truncating
    /// at the right edge. Shared by `put_char`'s insert-mode path and CSI
    /// `@` (ICH).
    pub fn insert_blanks(&mut self, x: u16, y: u16, n: u16) {
        let col = self.col;
        let fill = self.default_fill();
        let line = self.current_grid_mut().line_mut(y);
        let n = n.min(col - x);
        for i in (x..col).rev() {
            let src = i.checked_sub(n);
            let value = src.and_then(|s| line.get(s).copied()).unwrap_or(fill);
            *line.get_mut(i).expect("i in bounds") = value;
        }
        self.touched.push((x, y, col - 1, y));
    }

    /// Deletes `n` chars at `(x, y)`, shifting the remainder left and
    /// filling the vacated right edge with blanks. CSI `P` (DCH).
    pub fn delete_chars(&mut self, x: u16, y: u16, n: u16) {
        let col = self.col;
        let fill = self.default_fill();
        let n = n.min(col - x);
        let line = self.current_grid_mut().line_mut(y);
        for i in x..col {
            let src = i + n;
            let value = if src < col { line.get(src).copied().unwrap_or(fill) } else { fill };
            *line.get_mut(i).expect("i in bounds") = value;
        }
        self.touched.push((x, y, col - 1, y));
    }

    /// Erases `n` chars in place starting at `(x, y)` without shifting.
    /// CSI `X` (ECH).
    pub fn erase_chars(&mut self, x: u16, y: u16, n: u16) {
        let col = self.col;
        let fill = self.default_fill();
        let end = (x + n).min(col);
        for i in x..end {
            self.current_grid_mut().set_cell(i, y, fill);
        }
        self.touched.push((x, y, end.saturating_sub(1).max(x), y));
    }

    pub fn newline(&mut self, first_col: bool) {
        if self.cursor.y == self.scroll_bot {
            self.scroll_up(self.scroll_top, 1);
        } else if self.cursor.y + 1 < self.row {
            self.cursor.y += 1;
        }
        if first_col {
            self.cursor.x = 0;
        }
        self.cursor.wrap_next = false;
    }

    /// Returns the scroll delta to forward to the process-wide selection
    /// (`selection_scroll`): `(orig, delta)` where a positive delta means
    /// content moved up by that many rows.
    pub fn scroll_up(&mut self, orig: u16, n: u16) -> (u16, u16, i32) {
        let bot = self.scroll_bot;
        let n = n.min(bot.saturating_sub(orig) + 1);
        if n == 0 {
            return (orig, bot, 0);
        }
        if orig == self.scroll_top && self.ybase == 0 && !self.using_alt {
            for i in 0..n {
                let evicted = self.current_grid().line(orig + i).clone();
                self.scrollback.push_evicted(evicted);
            }
        }
        self.rotate_up(orig, bot, n);
        self.touched.push((0, orig, self.col - 1, bot));
        (orig, bot, i32::from(n))
    }

    pub fn scroll_down(&mut self, orig: u16, n: u16) -> (u16, u16, i32) {
        let bot = self.scroll_bot;
        let n = n.min(bot.saturating_sub(orig) + 1);
        if n == 0 {
            return (orig, bot, 0);
        }
        self.rotate_down(orig, bot, n);
        self.touched.push((0, orig, self.col - 1, bot));
        (orig, bot, -i32::from(n))
    }

    /// CSI `L` (IL): insert `n` blank lines at the cursor row, never
    /// touching scrollback (only a natural bottom-margin scroll does that).
    pub fn insert_lines(&mut self, n: u16) -> (u16, u16, i32) {
        let orig = self.cursor.y;
        if orig < self.scroll_top || orig > self.scroll_bot {
            return (orig, orig, 0);
        }
        let bot = self.scroll_bot;
        let n = n.min(bot.saturating_sub(orig) + 1);
        if n == 0 {
            return (orig, bot, 0);
        }
        self.rotate_down(orig, bot, n);
        self.touched.push((0, orig, self.col - 1, bot));
        (orig, bot, -i32::from(n))
    }

    /// CSI `M` (DL): delete `n` lines at the cursor row.
    pub fn delete_lines(&mut self, n: u16) -> (u16, u16, i32) {
        let orig = self.cursor.y;
        if orig < self.scroll_top || orig > self.scroll_bot {
            return (orig, orig, 0);
        }
        let bot = self.scroll_bot;
        let n = n.min(bot.saturating_sub(orig) + 1);
        if n == 0 {
            return (orig, bot, 0);
        }
        self.rotate_up(orig, bot, n);
        self.touched.push((0, orig, self.col - 1, bot));
        (orig, bot, i32::from(n))
    }

    fn rotate_up(&mut self, orig: u16, bot: u16, n: u16) {
        let col = self.col;
        let keep = (bot - orig + 1 - n) as usize;
        let grid = self.current_grid_mut();
        for i in 0..keep {
            let moved = grid.line(orig + n + i as u16).clone();
            grid.set_line(orig + i as u16, moved);
        }
        for i in 0..n {
            grid.set_line(bot - n + 1 + i, Line::blank(col));
        }
    }

    fn rotate_down(&mut self, orig: u16, bot: u16, n: u16) {
        let col = self.col;
        let keep = (bot - orig + 1 - n) as usize;
        let grid = self.current_grid_mut();
        for i in (0..keep).rev() {
            let moved = grid.line(orig + i as u16).clone();
            grid.set_line(orig + n + i as u16, moved);
        }
        for i in 0..n {
            grid.set_line(orig + i, Line::blank(col));
        }
    }

    /// CSI `H`/`f` is expected to resolve origin-mode offsetting itself
    /// before calling this; `move_to` only clamps.
    pub fn move_to(&mut self, x: u16, y: u16) {
        let (miny, maxy) =
            if self.cursor.origin { (self.scroll_top, self.scroll_bot) } else { (0, self.row - 1) };
        self.cursor.x = x.min(self.col.saturating_sub(1));
        self.cursor.y = y.clamp(miny, maxy);
        self.cursor.wrap_next = false;
    }

    pub fn clear_region(&mut self, x1: u16, y1: u16, x2: u16, y2: u16) {
        let fill = self.default_fill();
        for y in y1..=y2 {
            let (from, to) = if y1 == y2 {
                (x1, x2)
            } else if y == y1 {
                (x1, self.col - 1)
            } else if y == y2 {
                (0, x2)
            } else {
                (0, self.col - 1)
            };
            for x in from..=to {
                self.current_grid_mut().set_cell(x, y, fill);
            }
        }
        self.touched.push((0, y1, self.col - 1, y2));
    }

    pub fn swap_screen(&mut self) {
        self.using_alt = !self.using_alt;
        self.modes.toggle(ModeSet::ALT_SCREEN_ACTIVE);
        self.force_all_dirty = true;
        self.touched.push((0, 0, self.col - 1, self.row - 1));
    }

    #[must_use]
    pub fn is_alt_screen(&self) -> bool { self.using_alt }

    #[must_use]
    pub fn alt_screen_enabled(&self) -> bool { self.alt_screen_enabled }

    /// Wires the CLI's disable-alt-screen flag through. Takes effect on
    /// the next `?47`/`?1047`/`?1049` request; does not retroactively swap
    /// back a screen already on the alternate buffer.
    pub fn set_alt_screen_enabled(&mut self, enabled: bool) { self.alt_screen_enabled = enabled; }

    pub fn set_scroll_region(&mut self, top: u16, bot: u16) {
        self.scroll_top = top.min(self.row - 1);
        self.scroll_bot = bot.clamp(self.scroll_top, self.row - 1);
    }

    /// Sets the cursor's current-attribute state, used by SGR.
    pub fn set_cursor_attrs(&mut self, attrs: GlyphAttrs, fg: Color, bg: Color) {
        self.cursor.attrs = attrs;
        self.cursor.fg = fg;
        self.cursor.bg = bg;
    }

    /// DECOM: cursor addressing becomes relative to the scroll region.
    pub fn set_cursor_origin(&mut self, origin: bool) { self.cursor.origin = origin; }

    /// Places the cursor at `(x, y)` clamped to the full grid, ignoring the
    /// scroll region and origin mode. Used by select-mode navigation, which
    /// walks the whole visible screen rather than parser-driven addressing.
    pub fn set_cursor_position(&mut self, x: u16, y: u16) {
        self.cursor.x = x.min(self.col.saturating_sub(1));
        self.cursor.y = y.min(self.row.saturating_sub(1));
        self.cursor.wrap_next = false;
    }

    pub fn save_cursor(&mut self) { self.saved_cursor = Some(self.cursor.into()); }

    pub fn restore_cursor(&mut self) {
        if let Some(saved) = self.saved_cursor {
            saved.restore_onto(&mut self.cursor);
        }
    }

    pub fn set_tab_stop_at_cursor(&mut self) {
        if let Some(slot) = self.tabstops.get_mut(self.cursor.x as usize) {
            *slot = true;
        }
    }

    pub fn clear_tab_stop_at_cursor(&mut self) {
        if let Some(slot) = self.tabstops.get_mut(self.cursor.x as usize) {
            *slot = false;
        }
    }

    pub fn clear_all_tab_stops(&mut self) { self.tabstops.iter_mut().for_each(|t| *t = false); }

    #[must_use]
    pub fn graphics_charset(&self) -> bool { self.graphics_charset }

    pub fn set_graphics_charset(&mut self, active: bool) { self.graphics_charset = active; }

    /// CSI `I`/`Z` (CHT/CBT): move forward/back `n` tab stops.
    pub fn tab_forward(&mut self, n: u16) {
        let mut x = self.cursor.x;
        for _ in 0..n {
            match self.tabstops.iter().enumerate().skip(x as usize + 1).find(|(_, &set)| set) {
                Some((i, _)) => x = i as u16,
                None => {
                    x = self.col - 1;
                    break;
                }
            }
        }
        self.cursor.x = x;
        self.cursor.wrap_next = false;
    }

    pub fn tab_backward(&mut self, n: u16) {
        let mut x = self.cursor.x;
        for _ in 0..n {
            match self.tabstops[..x as usize].iter().enumerate().rev().find(|(_, &set)| set) {
                Some((i, _)) => x = i as u16,
                None => {
                    x = 0;
                    break;
                }
            }
        }
        self.cursor.x = x;
        self.cursor.wrap_next = false;
    }

    fn rebuild_tabstops(&mut self) {
        let width = self.tab_stop_width.max(1);
        self.tabstops = (0..self.col).map(|x| x != 0 && x % width == 0).collect();
    }

    /// Full DECSTR reset.
    pub fn reset(&mut self) {
        self.cursor = Cursor::default();
        self.saved_cursor = None;
        self.modes = ModeSet::default();
        self.scroll_top = 0;
        self.scroll_bot = self.row - 1;
        self.rebuild_tabstops();
        self.force_all_dirty = true;
        self.graphics_charset = false;
    }

    pub fn resize(&mut self, new_col: u16, new_row: u16, tab_stop_width: u16) {
        let fill = self.default_fill();
        self.tab_stop_width = tab_stop_width;

        if new_row < self.row && self.cursor.y >= new_row {
            let slide = (self.cursor.y - new_row + 1) as usize;
            let evict_primary = !self.using_alt;
            let live_evicted = if self.using_alt {
                let evicted = self.alternate.slide_up(slide);
                self.primary.slide_up(slide);
                evicted
            } else {
                let evicted = self.primary.slide_up(slide);
                self.alternate.slide_up(slide);
                evicted
            };
            if evict_primary {
                for line in live_evicted {
                    self.scrollback.push_evicted(line);
                }
            }
            if let Some(last) = &mut self.last_line {
                last.slide_up(slide);
            }
            self.cursor.y -= slide as u16;
        }

        self.primary.resize(new_col, new_row, fill);
        self.alternate.resize(new_col, new_row, fill);
        if let Some(last) = &mut self.last_line {
            last.resize(new_col, new_row, fill);
        }

        self.col = new_col;
        self.row = new_row;
        self.scroll_top = 0;
        self.scroll_bot = new_row.saturating_sub(1);
        self.cursor.x = self.cursor.x.min(new_col.saturating_sub(1));
        self.cursor.y = self.cursor.y.min(new_row.saturating_sub(1));
        self.rebuild_tabstops();
        self.force_all_dirty = true;
        self.touched.push((0, 0, new_col.saturating_sub(1), new_row.saturating_sub(1)));
    }

    // --- scrollback view-shift -----------------------------------------

    /// `scroll_view(n)`. Positive `n` moves the view toward the live edge,
    /// negative moves it back into history.
    pub fn scroll_view(&mut self, n: i32) {
        let sb_len = self.scrollback.len() as i32;
        let new_ybase = (self.ybase + n).clamp(-sb_len, 0);

        if self.ybase == 0 && new_ybase < 0 {
            self.last_line = Some(self.current_grid().clone());
        } else if new_ybase == 0 && self.ybase < 0 {
            if let Some(snapshot) = self.last_line.take() {
                *self.current_grid_mut() = snapshot;
            }
        }

        self.ybase = new_ybase;
        self.force_all_dirty = true;
    }

    /// Called by `Terminal::feed` before handing bytes to the parser: any
    /// byte arrival snaps the view back to the live edge first.
    pub fn snap_to_live_edge_if_needed(&mut self) {
        if self.ybase != 0 {
            self.scroll_view(-self.ybase);
        }
    }
}

impl Color {
    #[must_use]
    pub fn is_default(self) -> bool { matches!(self, Color::Default) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn feed_ascii(screen: &mut Screen, s: &str) {
        for ch in s.chars() {
            match ch {
                '\n' => screen.newline(true),
                c => screen.put_char(c),
            }
        }
    }

    #[test]
    fn wrap_and_unwrap() {
        let mut screen = Screen::new(4, 2, 100, 8);
        feed_ascii(&mut screen, "abcdef");
        assert_eq!(screen.cell(0, 0).ch, 'a');
        assert_eq!(screen.cell(3, 0).ch, 'd');
        assert!(screen.cell(3, 0).has_wrap_indicator());
        assert_eq!(screen.cell(0, 1).ch, 'e');
        assert_eq!(screen.cell(1, 1).ch, 'f');
        assert_eq!(screen.cell(2, 1).ch, ' ');
        assert_eq!((screen.cursor().x, screen.cursor().y), (2, 1));
    }

    #[test]
    fn scroll_eviction() {
        let mut screen = Screen::new(3, 2, 100, 8);
        screen.move_to(0, 1);
        feed_ascii(&mut screen, "AAA\nBBB\nCCC");
        assert_eq!(screen.scrollback_len(), 1);
        let evicted = screen.scrollback.get(0).unwrap();
        assert_eq!(evicted.get(0).unwrap().ch, 'A');
        assert_eq!(screen.cell(0, 0).ch, 'B');
        assert_eq!(screen.cell(0, 1).ch, 'C');
        assert_eq!((screen.cursor().x, screen.cursor().y), (0, 1));
    }

    #[test]
    fn csi_clear_fills_spaces_under_default_attrs() {
        let mut screen = Screen::new(5, 3, 100, 8);
        for y in 0..3 {
            for x in 0..5 {
                screen.current_grid_mut().set_cell(x, y, Glyph { ch: 'X', ..Glyph::blank() });
            }
        }
        let cursor_before = screen.cursor();
        screen.clear_region(0, 0, 4, 2);
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(screen.cell(x, y).ch, ' ');
            }
        }
        assert_eq!(screen.cursor(), cursor_before);
    }

    #[test]
    fn alt_screen_toggle_preserves_primary_and_scrollback() {
        let mut screen = Screen::new(3, 2, 100, 8);
        screen.clear_region(0, 0, 2, 1);
        for y in 0..2 {
            for x in 0..3 {
                screen.current_grid_mut().set_cell(x, y, Glyph { ch: 'P', ..Glyph::blank() });
            }
        }
        let cursor_before = screen.cursor();
        screen.swap_screen();
        for y in 0..2 {
            for x in 0..3 {
                screen.current_grid_mut().set_cell(x, y, Glyph { ch: 'A', ..Glyph::blank() });
            }
        }
        screen.swap_screen();
        assert_eq!(screen.cell(0, 0).ch, 'P');
        assert_eq!(screen.cursor(), cursor_before);
        assert_eq!(screen.scrollback_len(), 0);
    }

    #[test]
    fn scroll_view_then_byte_arrival_snaps_back() {
        let mut screen = Screen::new(3, 2, 100, 8);
        screen.move_to(0, 1);
        feed_ascii(&mut screen, "AAA\nBBB\nCCC");
        screen.scroll_view(-1);
        assert_eq!(screen.ybase(), -1);
        assert_eq!(screen.visible_line(0).get(0).unwrap().ch, 'A');
        assert_eq!(screen.visible_line(1).get(0).unwrap().ch, 'B');

        screen.snap_to_live_edge_if_needed();
        assert_eq!(screen.ybase(), 0);
        screen.put_char('Z');
        assert_eq!(screen.cell(1, 0).ch, 'Z');
    }
}
