//! The selection model: mouse and select-mode highlighting over the grid,
//! kept in small, single-purpose modules.

pub mod click;
pub mod snap;

use strum::EnumIs;

use crate::screen::Screen;

/// A single grid-space coordinate (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GridCoord {
    pub y: u16,
    pub x: u16,
}

impl GridCoord {
    #[must_use]
    pub fn new(x: u16, y: u16) -> Self { Self { x, y } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum SnapMode {
    None,
    Word,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum SelectionKind {
    Linear,
    Rectangular,
}

#[derive(Debug, Clone, PartialEq)]
struct Active {
    begin: GridCoord,
    end: GridCoord,
    snap: SnapMode,
    kind: SelectionKind,
    /// True if this selection was made on the alternate screen.
    alt: bool,
}

/// The process-wide selection: one active selection shared across all
/// tabs. Either inactive, or holds one active selection.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    active: Option<Active>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn is_active(&self) -> bool { self.active.is_some() }

    /// Starts a new selection at `anchor`, applying `snap` immediately
    /// (word/line snaps expand around the click point right away; a plain
    /// click starts as a single cell).
    pub fn begin(&mut self, screen: &Screen, anchor: GridCoord, snap: SnapMode, kind: SelectionKind) {
        let (begin, end) = match snap {
            SnapMode::None => (anchor, anchor),
            SnapMode::Word => snap::expand_word(screen, anchor),
            SnapMode::Line => snap::expand_line(screen, anchor),
        };
        self.active = Some(Active { begin, end, snap, kind, alt: screen.is_alt_screen() });
    }

    /// Updates the moving endpoint of an active selection (mouse drag),
    /// re-applying the snap mode around the new point.
    pub fn update(&mut self, screen: &Screen, point: GridCoord) {
        let Some(active) = &mut self.active else { return };
        let (_, end) = match active.snap {
            SnapMode::None => (point, point),
            SnapMode::Word => snap::expand_word(screen, point),
            SnapMode::Line => snap::expand_line(screen, point),
        };
        active.end = end;
    }

    pub fn clear(&mut self) { self.active = None; }

    /// Normalized `(begin, end)` in reading order (`begin <= end`),
    /// recomputed fresh on every mouse motion.
    #[must_use]
    pub fn normalized(&self) -> Option<(GridCoord, GridCoord)> {
        let active = self.active.as_ref()?;
        Some(if active.begin <= active.end { (active.begin, active.end) } else { (active.end, active.begin) })
    }

    #[must_use]
    pub fn kind(&self) -> Option<SelectionKind> { self.active.as_ref().map(|a| a.kind) }

    /// Whether `(x, y)` is covered by the active, non-suppressed selection.
    #[must_use]
    pub fn contains(&self, screen: &Screen, x: u16, y: u16) -> bool {
        if self.is_suppressed(screen) {
            return false;
        }
        let Some((b, e)) = self.normalized() else { return false };
        match self.active.as_ref().map(|a| a.kind) {
            Some(SelectionKind::Rectangular) => {
                y >= b.y && y <= e.y && x >= b.x.min(e.x) && x <= b.x.max(e.x)
            }
            _ => {
                let point = GridCoord::new(x, y);
                point >= b && point <= e
            }
        }
    }

    /// The selection is visually suppressed if it was made on a different
    /// buffer than the one currently showing.
    #[must_use]
    pub fn is_suppressed(&self, screen: &Screen) -> bool {
        self.active.as_ref().is_none_or(|a| a.alt != screen.is_alt_screen())
    }

    /// Serializes the selected cells row-major into plain text: trailing
    /// spaces beyond the last non-space cell of a row are dropped, and
    /// rows are joined with `\n` unless the row's last cell carries the
    /// wrap-indicator (the logical line continues without a break).
    #[must_use]
    pub fn serialize(&self, screen: &Screen) -> String {
        let Some((b, e)) = self.normalized() else { return String::new() };
        let rectangular = self.kind() == Some(SelectionKind::Rectangular);
        let mut out = String::new();

        for y in b.y..=e.y {
            let line = screen.visible_line(y);
            let (from, to) = if rectangular {
                (b.x.min(e.x), b.x.max(e.x))
            } else if b.y == e.y {
                (b.x, e.x)
            } else if y == b.y {
                (b.x, line.len().saturating_sub(1))
            } else if y == e.y {
                (0, e.x)
            } else {
                (0, line.len().saturating_sub(1))
            };

            let last_non_blank = line
                .cells()
                .get(from as usize..=((to as usize).min(line.len() as usize - 1)))
                .and_then(|slice| slice.iter().rposition(|g| !g.is_blank()))
                .map(|i| from + i as u16);

            let row_end = last_non_blank.map_or(from, |i| i).min(to);
            if last_non_blank.is_some() {
                for x in from..=row_end {
                    out.push(line.get(x).map_or(' ', |g| g.ch));
                }
            }

            let is_last_row = y == e.y;
            let wraps = line.get(line.len().saturating_sub(1)).is_some_and(|g| g.has_wrap_indicator());
            if !is_last_row && !(wraps && !rectangular) {
                out.push('\n');
            }
        }
        out
    }

    /// Shifts selection rows by `delta` when they intersect `[orig, bot]`;
    /// drops the selection if an endpoint falls outside the scroll region
    /// afterward.
    pub fn scroll(&mut self, orig: u16, bot: u16, delta: i32) {
        let Some(active) = &mut self.active else { return };
        if delta == 0 {
            return;
        }
        let shift = |coord: &mut GridCoord| {
            if coord.y >= orig && coord.y <= bot {
                let shifted = i32::from(coord.y) - delta;
                coord.y = shifted.clamp(0, u16::MAX as i32) as u16;
            }
        };
        shift(&mut active.begin);
        shift(&mut active.end);
        if active.begin.y < orig || active.begin.y > bot || active.end.y < orig || active.end.y > bot {
            self.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::cell::Glyph;

    fn fill_row(screen: &mut Screen, y: u16, text: &str) {
        for (x, ch) in text.chars().enumerate() {
            screen.put_char(ch);
            let _ = x;
        }
        let _ = y;
    }

    #[test]
    fn serialization_of_full_row_trims_only_at_line_end() {
        let mut screen = Screen::new(5, 1, 10, 8);
        fill_row(&mut screen, 0, "hello");
        let mut sel = Selection::new();
        sel.begin(&screen, GridCoord::new(0, 0), SnapMode::None, SelectionKind::Linear);
        sel.update(&screen, GridCoord::new(4, 0));
        assert_eq!(sel.serialize(&screen), "hello");
    }

    #[test]
    fn word_snap_across_wrap_serializes_without_newline() {
        let mut screen = Screen::new(4, 2, 10, 8);
        for ch in "abcdef".chars() {
            screen.put_char(ch);
        }
        let mut sel = Selection::new();
        sel.begin(&screen, GridCoord::new(2, 1), SnapMode::Word, SelectionKind::Linear);
        assert_eq!(sel.serialize(&screen), "abcdef");
    }

    #[test]
    fn alt_screen_swap_suppresses_selection() {
        let mut screen = Screen::new(5, 2, 10, 8);
        let mut sel = Selection::new();
        sel.begin(&screen, GridCoord::new(0, 0), SnapMode::None, SelectionKind::Linear);
        assert!(!sel.is_suppressed(&screen));
        screen.swap_screen();
        assert!(sel.is_suppressed(&screen));
    }

    #[test]
    fn scroll_drops_selection_once_pushed_out_of_region() {
        let mut screen = Screen::new(5, 1, 10, 8);
        let _ = &mut screen;
        let mut sel = Selection::new();
        let fake = Screen::new(5, 3, 10, 8);
        sel.begin(&fake, GridCoord::new(0, 0), SnapMode::None, SelectionKind::Linear);
        sel.scroll(0, 2, 1);
        assert!(!sel.is_active());
    }

    #[test]
    fn trailing_spaces_dropped_before_content_kept() {
        let mut screen = Screen::new(5, 1, 10, 8);
        for ch in "hi".chars() {
            screen.put_char(ch);
        }
        let mut sel = Selection::new();
        sel.begin(&screen, GridCoord::new(0, 0), SnapMode::None, SelectionKind::Linear);
        sel.update(&screen, GridCoord::new(4, 0));
        assert_eq!(sel.serialize(&screen), "hi");
    }
}
