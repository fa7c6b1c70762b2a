//! The `Line`/`Grid` cell buffer.

use super::cell::Glyph;

/// A fixed-width ordered sequence of cells. The unit of allocation for the
/// scrollback.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    cells: Vec<Glyph>,
}

impl Line {
    #[must_use]
    pub fn blank(col: u16) -> Self { Self { cells: vec![Glyph::blank(); col as usize] } }

    #[must_use]
    pub fn len(&self) -> u16 { self.cells.len() as u16 }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    #[must_use]
    pub fn cells(&self) -> &[Glyph] { &self.cells }

    pub fn cells_mut(&mut self) -> &mut [Glyph] { &mut self.cells }

    #[must_use]
    pub fn get(&self, col: u16) -> Option<&Glyph> { self.cells.get(col as usize) }

    pub fn get_mut(&mut self, col: u16) -> Option<&mut Glyph> { self.cells.get_mut(col as usize) }

    /// Re-pads (with blanks) or truncates this line in place to `new_col`
    /// columns. Used when a scrollback line is read back under a grid width
    /// different from the one it was evicted with, and during resize.
    pub fn resize_to(&mut self, new_col: u16, fill: Glyph) {
        let new_col = new_col as usize;
        match new_col.cmp(&self.cells.len()) {
            std::cmp::Ordering::Greater => self.cells.resize(new_col, fill),
            std::cmp::Ordering::Less => {
                self.cells.truncate(new_col);
                // A wrap-indicator that lived on a truncated-away cell is
                // gone; don't leave one dangling on the new last cell.
                if let Some(last) = self.cells.last_mut() {
                    last.attrs.remove(super::cell::GlyphAttrs::WRAP_INDICATOR);
                }
            }
            std::cmp::Ordering::Equal => {}
        }
    }

    /// Index of the last cell whose `ch` is not a space, if any.
    #[must_use]
    pub fn last_non_blank(&self) -> Option<u16> {
        self.cells.iter().rposition(|g| !g.is_blank()).map(|i| i as u16)
    }
}

/// A rectangular `row x col` grid of cells, plus a per-row dirty flag.
#[derive(Debug, Clone)]
pub struct Grid {
    lines: Vec<Line>,
    dirty: Vec<bool>,
    col: u16,
    row: u16,
}

impl Grid {
    #[must_use]
    pub fn new(col: u16, row: u16) -> Self {
        Self {
            lines: (0..row).map(|_| Line::blank(col)).collect(),
            dirty: vec![false; row as usize],
            col,
            row,
        }
    }

    #[must_use]
    pub fn col(&self) -> u16 { self.col }

    #[must_use]
    pub fn row(&self) -> u16 { self.row }

    #[must_use]
    pub fn line(&self, y: u16) -> &Line { &self.lines[y as usize] }

    pub fn line_mut(&mut self, y: u16) -> &mut Line {
        self.dirty[y as usize] = true;
        &mut self.lines[y as usize]
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] { &self.lines }

    pub fn mark_dirty(&mut self, y: u16) { self.dirty[y as usize] = true; }

    pub fn mark_all_dirty(&mut self) { self.dirty.iter_mut().for_each(|d| *d = true); }

    #[must_use]
    pub fn dirty(&self) -> &[bool] { &self.dirty }

    pub fn clear_dirty(&mut self) { self.dirty.iter_mut().for_each(|d| *d = false); }

    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> &Glyph { self.lines[y as usize].get(x).expect("x in bounds") }

    pub fn set_cell(&mut self, x: u16, y: u16, glyph: Glyph) {
        *self.lines[y as usize].get_mut(x).expect("x in bounds") = glyph;
        self.dirty[y as usize] = true;
    }

    /// Replaces the line at `y`, used by scroll rotation and scrollback
    /// eviction.
    pub fn set_line(&mut self, y: u16, line: Line) {
        self.lines[y as usize] = line;
        self.dirty[y as usize] = true;
    }

    /// Resizes the grid in place to `(new_col, new_row)`. Newly exposed
    /// regions are filled with `fill`. When shrinking height, the caller is
    /// responsible for sliding rows/evicting to scrollback first; this only
    /// adjusts row *count* by truncating/padding from the bottom.
    pub fn resize(&mut self, new_col: u16, new_row: u16, fill: Glyph) {
        for line in &mut self.lines {
            line.resize_to(new_col, fill);
        }
        match (new_row as usize).cmp(&self.lines.len()) {
            std::cmp::Ordering::Greater => {
                self.lines.resize_with(new_row as usize, || Line::blank(new_col));
                self.dirty.resize(new_row as usize, true);
            }
            std::cmp::Ordering::Less => {
                self.lines.truncate(new_row as usize);
                self.dirty.truncate(new_row as usize);
            }
            std::cmp::Ordering::Equal => {}
        }
        self.col = new_col;
        self.row = new_row;
        self.mark_all_dirty();
    }

    /// Removes the top `n` lines (returning them), refilling the bottom
    /// with blanks so the row count is unchanged. Used by `resize` when
    /// shrinking height out from under the cursor.
    pub fn slide_up(&mut self, n: usize) -> Vec<Line> {
        let n = n.min(self.lines.len());
        let evicted: Vec<Line> = self.lines.drain(0..n).collect();
        for _ in 0..n {
            self.lines.push(Line::blank(self.col));
        }
        self.mark_all_dirty();
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_blank_and_clean() {
        let g = Grid::new(4, 2);
        assert_eq!(g.col(), 4);
        assert_eq!(g.row(), 2);
        assert!(g.dirty().iter().all(|d| !d));
        assert!(g.line(0).cells().iter().all(Glyph::is_blank));
    }

    #[test]
    fn set_cell_marks_row_dirty_only() {
        let mut g = Grid::new(3, 2);
        g.set_cell(1, 0, Glyph { ch: 'x', ..Glyph::blank() });
        assert!(g.dirty()[0]);
        assert!(!g.dirty()[1]);
    }

    #[test]
    fn line_resize_truncate_drops_trailing_wrap_indicator() {
        let mut line = Line::blank(4);
        line.get_mut(3).unwrap().attrs.insert(super::super::cell::GlyphAttrs::WRAP_INDICATOR);
        line.resize_to(2, Glyph::blank());
        assert_eq!(line.len(), 2);
        assert!(!line.get(1).unwrap().has_wrap_indicator());
    }
}
