//! A terminal instance: one child process, one escape parser, and one
//! screen buffer, composed onto a single PTY handle behind a
//! `feed`/`write`/`resize`/`reset` contract.

use std::{collections::HashMap, io::Write};

use crate::{
    config::EngineConfig,
    error::EngineError,
    parser::{EngineEvent, EscapeParser},
    pty::{PtyHandle, PtyOutputEvent},
    screen::Screen,
};

/// Side effects a terminal produced while processing a `feed` call that the
/// owning tab manager / event loop needs to act on.
#[derive(Debug, Default)]
pub struct FeedOutcome {
    pub bell: bool,
    pub title_changed: bool,
}

pub struct Terminal {
    screen: Screen,
    parser: EscapeParser,
    pty: PtyHandle,
    title: Option<String>,
    /// `OSC 4`/`104` palette overrides, handed to the renderer contract,
    /// which owns repaint policy entirely.
    palette_overrides: HashMap<u8, String>,
    tab_stop_width: u16,
    /// `-o file`: every raw byte read from the PTY is also copied here
    /// before parsing.
    output_tee: Option<std::fs::File>,
}

impl std::fmt::Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("title", &self.title)
            .field("col", &self.screen.col())
            .field("row", &self.screen.row())
            .finish_non_exhaustive()
    }
}

impl Terminal {
    /// Spawns `command` (empty = the resolved shell) under a fresh PTY
    /// sized to the engine's current geometry.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the PTY cannot be allocated or the
    /// child cannot be spawned.
    pub fn spawn(config: &EngineConfig, command: &[String], col: u16, row: u16) -> Result<Self, EngineError> {
        let pty = PtyHandle::spawn(command, col, row, config.window_id.as_deref())?;
        let mut screen = Screen::new(col, row, config.scrollback_capacity, config.tab_stop_width);
        screen.set_alt_screen_enabled(config.alt_screen_enabled);
        Ok(Self {
            screen,
            parser: EscapeParser::new(),
            pty,
            title: None,
            palette_overrides: HashMap::new(),
            tab_stop_width: config.tab_stop_width,
            output_tee: None,
        })
    }

    /// Installs the `-o file` tee target; every subsequent `feed` call
    /// copies its raw bytes to `file` before parsing.
    pub fn set_output_tee(&mut self, file: std::fs::File) { self.output_tee = Some(file); }

    /// `-t title`: seeds the initial title before any `OSC 0`/`2` arrives
    /// from the child. A later title-setting sequence overwrites it like
    /// any other title change.
    pub fn set_initial_title(&mut self, title: String) { self.title = Some(title); }

    #[must_use]
    pub fn screen(&self) -> &Screen { &self.screen }

    #[must_use]
    pub fn title(&self) -> Option<&str> { self.title.as_deref() }

    #[must_use]
    pub fn palette_overrides(&self) -> &HashMap<u8, String> { &self.palette_overrides }

    /// Drains one chunk of output from the PTY reader thread, if any, and
    /// feeds it to the parser. Non-blocking; called by the event loop's
    /// polling tick.
    ///
    /// Returns `Ok(None)` if the child has exited and should be removed.
    pub fn poll(&mut self) -> Option<FeedOutcome> {
        match self.pty.output_rx.try_recv() {
            Ok(PtyOutputEvent::Output(bytes)) => Some(self.feed(&bytes)),
            Ok(PtyOutputEvent::Exited) | Err(tokio::sync::mpsc::error::TryRecvError::Disconnected) => None,
            Err(tokio::sync::mpsc::error::TryRecvError::Empty) => Some(FeedOutcome::default()),
        }
    }

    /// Feeds raw PTY bytes through the escape parser. Any byte arrival
    /// first snaps the scrollback view back to the live edge — including
    /// while the view is off-edge, bytes keep landing on the hidden live
    /// grid underneath.
    ///
    /// `vte::Parser` retains UTF-8 decode state across `advance` calls
    /// internally, so any trailing incomplete UTF-8 prefix carries over to
    /// the next call without separate buffering here.
    pub fn feed(&mut self, bytes: &[u8]) -> FeedOutcome {
        if let Some(tee) = &mut self.output_tee {
            let _ = tee.write_all(bytes);
        }
        self.screen.snap_to_live_edge_if_needed();
        let mut events = Vec::new();
        self.parser.feed(bytes, &mut self.screen, &mut events);

        let mut outcome = FeedOutcome::default();
        for event in events {
            match event {
                EngineEvent::Reply(bytes) => {
                    // Best-effort: a write failure here is not fatal to
                    // processing further parser output.
                    let _ = self.write(0, &bytes);
                }
                EngineEvent::SetTitle(title) => {
                    self.title = Some(title);
                    outcome.title_changed = true;
                }
                EngineEvent::Bell => outcome.bell = true,
                EngineEvent::SetPaletteColor { index, spec } => {
                    self.palette_overrides.insert(index, spec);
                }
                EngineEvent::ResetPaletteColor(index) => {
                    self.palette_overrides.remove(&index);
                }
                EngineEvent::ResetAllPaletteColors => self.palette_overrides.clear(),
            }
        }
        outcome
    }

    /// Sends bytes to the PTY (input router responses, key translation).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PtyWrite`] on an unrecoverable write failure;
    /// the caller should treat this as fatal to this terminal only.
    pub fn write(&mut self, tab: usize, bytes: &[u8]) -> Result<(), EngineError> {
        self.pty.write(tab, bytes)
    }

    /// Resizes the grid and informs the PTY via window-size ioctl.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PtyResize`] if the ioctl fails.
    pub fn resize(&mut self, col: u16, row: u16) -> Result<(), EngineError> {
        self.screen.resize(col, row, self.tab_stop_width);
        self.pty.resize(col, row)
    }

    /// Full DECSTR reset.
    pub fn reset(&mut self) { self.screen.reset(); }

    pub fn kill(&mut self) { self.pty.kill(); }

    /// Screen operations exposed for the input router's vi-mode and
    /// selection machinery, which need to mutate scroll position and read
    /// cells directly.
    pub fn screen_mut(&mut self) -> &mut Screen { &mut self.screen }
}
