//! The tab manager: an ordered list of terminals, an active index, and the
//! one process-wide [`Selection`] shared across every tab.

use crate::{config::EngineConfig, error::EngineError, selection::Selection, terminal::Terminal};

/// Rows reserved for the status bar once more than one tab exists.
pub const STATUS_BAR_HEIGHT: u16 = 1;

pub struct TabManager {
    config: EngineConfig,
    terminals: Vec<Terminal>,
    focused: usize,
    selection: Selection,
    col: u16,
    row: u16,
}

impl std::fmt::Debug for TabManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabManager")
            .field("tab_count", &self.terminals.len())
            .field("focused", &self.focused)
            .field("col", &self.col)
            .field("row", &self.row)
            .finish_non_exhaustive()
    }
}

impl TabManager {
    /// Builds a tab manager with one initial tab running `command` (empty
    /// = shell), sized to `(col, row)`.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the first tab fails to spawn.
    pub fn new(config: EngineConfig, command: &[String], col: u16, row: u16) -> Result<Self, EngineError> {
        let mut manager =
            Self { config, terminals: Vec::new(), focused: 0, selection: Selection::new(), col, row };
        manager.new_tab(command)?;
        Ok(manager)
    }

    /// Height available to each terminal's grid: the full geometry, minus
    /// one row for the status bar once more than one tab exists.
    #[must_use]
    pub fn terminal_row_height(&self) -> u16 {
        if self.terminals.len() > 1 { self.row.saturating_sub(STATUS_BAR_HEIGHT) } else { self.row }
    }

    /// Appends a fresh terminal sized to the current geometry.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the terminal's PTY cannot be spawned.
    pub fn new_tab(&mut self, command: &[String]) -> Result<usize, EngineError> {
        // Adding a second tab changes the geometry rule (status bar
        // appears), so existing terminals must shrink by one row first.
        let will_reserve_status_bar = self.terminals.len() == 1;
        if will_reserve_status_bar {
            for terminal in &mut self.terminals {
                terminal.resize(self.col, self.row - STATUS_BAR_HEIGHT)?;
            }
        }
        let row = if will_reserve_status_bar || !self.terminals.is_empty() {
            self.row - STATUS_BAR_HEIGHT
        } else {
            self.row
        };
        let terminal = Terminal::spawn(&self.config, command, self.col, row)?;
        self.terminals.push(terminal);
        self.focused = self.terminals.len() - 1;
        Ok(self.focused)
    }

    /// Destroys the tab at `index`, closing its PTY. If it was focused,
    /// focus falls back to the previous neighbor. Returns `true` if any
    /// tabs remain (the caller exits the process when this is `false`).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoSuchTab`] if `index` is out of range.
    pub fn close_tab(&mut self, index: usize) -> Result<bool, EngineError> {
        if index >= self.terminals.len() {
            return Err(EngineError::NoSuchTab(index));
        }
        let mut terminal = self.terminals.remove(index);
        terminal.kill();

        if self.terminals.is_empty() {
            return Ok(false);
        }

        if index <= self.focused {
            self.focused = self.focused.saturating_sub(1).min(self.terminals.len() - 1);
        }

        if self.terminals.len() == 1 {
            let row = self.row;
            if let Some(only) = self.terminals.first_mut() {
                let _ = only.resize(self.col, row);
            }
        }
        Ok(true)
    }

    /// Closes the currently focused tab.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the tab cannot be resolved (never
    /// expected to happen given `focused` is kept in range).
    pub fn close_focused(&mut self) -> Result<bool, EngineError> { self.close_tab(self.focused) }

    #[must_use]
    pub fn focused_index(&self) -> usize { self.focused }

    #[must_use]
    pub fn focused(&self) -> &Terminal { &self.terminals[self.focused] }

    pub fn focused_mut(&mut self) -> &mut Terminal { &mut self.terminals[self.focused] }

    #[must_use]
    pub fn terminals(&self) -> &[Terminal] { &self.terminals }

    pub fn terminals_mut(&mut self) -> &mut [Terminal] { &mut self.terminals }

    #[must_use]
    pub fn selection(&self) -> &Selection { &self.selection }

    pub fn selection_mut(&mut self) -> &mut Selection { &mut self.selection }

    /// Splits the borrow so a mouse/select-mode handler can read the
    /// focused terminal's screen while mutating the process-wide selection
    /// in the same call, without the two method calls aliasing through
    /// `self`.
    pub fn focused_screen_and_selection_mut(&mut self) -> (&crate::screen::Screen, &mut Selection) {
        (self.terminals[self.focused].screen(), &mut self.selection)
    }

    /// As [`Self::focused_screen_and_selection_mut`], but with a mutable
    /// screen borrow — used by select-mode, which moves the cursor around
    /// the grid while tracking a synthesized selection.
    pub fn focused_screen_mut_and_selection_mut(&mut self) -> (&mut crate::screen::Screen, &mut Selection) {
        (self.terminals[self.focused].screen_mut(), &mut self.selection)
    }

    pub fn focus(&mut self, index: usize) -> Result<(), EngineError> {
        if index >= self.terminals.len() {
            return Err(EngineError::NoSuchTab(index));
        }
        self.focused = index;
        Ok(())
    }

    pub fn focus_prev(&mut self) {
        if self.terminals.is_empty() {
            return;
        }
        self.focused = if self.focused == 0 { self.terminals.len() - 1 } else { self.focused - 1 };
    }

    pub fn focus_next(&mut self) {
        if self.terminals.is_empty() {
            return;
        }
        self.focused = (self.focused + 1) % self.terminals.len();
    }

    /// Polls every terminal (not just the focused one) so unfocused tabs
    /// keep receiving PTY output. Returns the indices of terminals whose
    /// children exited, so the caller can remove them.
    pub fn poll_all(&mut self) -> Vec<usize> {
        let mut exited = Vec::new();
        for (i, terminal) in self.terminals_mut().iter_mut().enumerate() {
            if terminal.poll().is_none() {
                exited.push(i);
            }
        }
        exited
    }

    /// Resizes every tab's terminal to the current geometry (status bar
    /// accounted for).
    pub fn resize_all(&mut self, col: u16, row: u16) {
        self.col = col;
        self.row = row;
        let terminal_row = self.terminal_row_height();
        for terminal in &mut self.terminals {
            let _ = terminal.resize(col, terminal_row);
        }
    }
}
