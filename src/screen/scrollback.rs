//! The bounded scrollback ring.
//!
//! A `VecDeque`-backed ring, most-recent-first: simpler, bounded, and
//! cache-friendlier than a doubly-linked list of lines.

use std::collections::VecDeque;

use super::{cell::Glyph, grid::Line};

#[derive(Debug, Clone)]
pub struct Scrollback {
    capacity: usize,
    /// Index 0 is the most recently evicted line.
    lines: VecDeque<Line>,
}

impl Scrollback {
    #[must_use]
    pub fn new(capacity: usize) -> Self { Self { capacity, lines: VecDeque::with_capacity(capacity.min(1024)) } }

    #[must_use]
    pub fn len(&self) -> usize { self.lines.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }

    #[must_use]
    pub fn capacity(&self) -> usize { self.capacity }

    /// Evicts `line` into the ring. Once mutated into the ring, a line is
    /// never mutated again — only read, possibly re-padded/truncated to a
    /// new width on access.
    pub fn push_evicted(&mut self, line: Line) {
        self.lines.push_front(line);
        if self.lines.len() > self.capacity {
            self.lines.pop_back();
        }
    }

    /// Line `-(i+1)` in the view-shift mapping: index 0 is the most
    /// recently evicted.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Line> { self.lines.get(index) }

    /// Same as `get` but re-pads/truncates a clone to `col` columns,
    /// without mutating the stored line.
    #[must_use]
    pub fn get_resized(&self, index: usize, col: u16) -> Option<Line> {
        let mut line = self.lines.get(index)?.clone();
        if line.len() != col {
            line.resize_to(col, Glyph::blank());
        }
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_evicts_oldest() {
        let mut sb = Scrollback::new(2);
        sb.push_evicted(Line::blank(3));
        let mut second = Line::blank(3);
        second.get_mut(0).unwrap().ch = 'A';
        sb.push_evicted(second);
        let mut third = Line::blank(3);
        third.get_mut(0).unwrap().ch = 'B';
        sb.push_evicted(third);

        assert_eq!(sb.len(), 2);
        // Most recent first.
        assert_eq!(sb.get(0).unwrap().get(0).unwrap().ch, 'B');
        assert_eq!(sb.get(1).unwrap().get(0).unwrap().ch, 'A');
    }

    #[test]
    fn resized_read_does_not_mutate_stored_line() {
        let mut sb = Scrollback::new(10);
        sb.push_evicted(Line::blank(5));
        let resized = sb.get_resized(0, 3).unwrap();
        assert_eq!(resized.len(), 3);
        assert_eq!(sb.get(0).unwrap().len(), 5);
    }
}
