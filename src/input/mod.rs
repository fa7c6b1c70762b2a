//! The input router: an ordered-match dispatch over five precedence
//! steps — select-mode, prefix key, external global shortcuts, the keymap
//! table, and default keysym forwarding.

pub mod keymap;
pub mod mouse;
pub mod vi_mode;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::{
    config::EngineConfig,
    error::EngineError,
    screen::modes::ModeSet,
    selection::{GridCoord, SelectionKind, click::ClickTracker},
    tabs::TabManager,
};
use vi_mode::{ViModeState, ViOutcome};

/// What the caller (event loop / binary) should do after routing one
/// keyboard event.
#[derive(Debug)]
pub enum RouterAction {
    /// The event was consumed; nothing further to do.
    Handled,
    /// The engine should exit (last tab closed, or an explicit quit).
    Exit,
    /// Select-mode produced text to place on the system clipboard; writing
    /// it there is outside the core's PTY/grid contract, so the caller
    /// performs the actual clipboard write.
    Copy(String),
    /// The prefix command `p` was pressed; the caller resolves clipboard
    /// contents and calls [`InputRouter::paste`].
    RequestPaste,
}

pub struct InputRouter {
    prefix_key: (KeyCode, KeyModifiers),
    prefix_active: bool,
    vi_mode: Option<ViModeState>,
    click_tracker: ClickTracker,
}

impl std::fmt::Debug for InputRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputRouter")
            .field("prefix_active", &self.prefix_active)
            .field("in_select_mode", &self.vi_mode.is_some())
            .finish_non_exhaustive()
    }
}

impl InputRouter {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            prefix_key: (KeyCode::Char('a'), KeyModifiers::CONTROL),
            prefix_active: false,
            vi_mode: None,
            click_tracker: ClickTracker::new(config.double_click_timeout, config.triple_click_timeout),
        }
    }

    /// Routes one keyboard event through the five-step ordered match.
    ///
    /// # Errors
    ///
    /// Propagates a [`EngineError`] if writing the translated bytes to the
    /// focused terminal's PTY fails.
    pub fn handle_key(&mut self, key: KeyEvent, tabs: &mut TabManager) -> Result<RouterAction, EngineError> {
        // Step 1: select-mode handler.
        if let Some(vi) = &mut self.vi_mode {
            let (screen, selection) = tabs.focused_screen_mut_and_selection_mut();
            match vi.handle_key(key.code, key.modifiers, screen, selection) {
                ViOutcome::Continue => return Ok(RouterAction::Handled),
                ViOutcome::Exit => {
                    self.vi_mode = None;
                    return Ok(RouterAction::Handled);
                }
                ViOutcome::Copy(text) => {
                    self.vi_mode = None;
                    return Ok(RouterAction::Copy(text));
                }
            }
        }

        // Step 2: prefix key.
        if self.prefix_active {
            self.prefix_active = false;
            return self.handle_prefix_command(key, tabs);
        }
        if (key.code, key.modifiers) == self.prefix_key {
            self.prefix_active = true;
            return Ok(RouterAction::Handled);
        }

        // Step 3 (global shortcuts table) is configured externally; the
        // core has no shortcuts of its own to dispatch here.

        // Step 4: keymap table.
        let modes = tabs.focused().screen().modes();
        if let Some(bytes) = keymap::lookup(key.code, key.modifiers, modes) {
            let index = tabs.focused_index();
            tabs.focused_mut().write(index, &bytes)?;
            return Ok(RouterAction::Handled);
        }

        // Step 5: default keysym-to-text.
        self.send_default(key, tabs)?;
        Ok(RouterAction::Handled)
    }

    fn handle_prefix_command(&mut self, key: KeyEvent, tabs: &mut TabManager) -> Result<RouterAction, EngineError> {
        let KeyCode::Char(ch) = key.code else {
            return Ok(RouterAction::Handled);
        };
        match ch {
            '[' => {
                self.vi_mode = Some(ViModeState::enter(tabs.focused_mut().screen_mut()));
            }
            'p' => return Ok(RouterAction::RequestPaste),
            'c' => {
                tabs.new_tab(&[])?;
            }
            'k' => {
                if !tabs.close_focused()? {
                    return Ok(RouterAction::Exit);
                }
            }
            '1'..='9' => {
                let index = ch as usize - '1' as usize;
                let _ = tabs.focus(index);
            }
            'n' => tabs.focus_next(),
            'N' => tabs.focus_prev(),
            _ => {}
        }
        Ok(RouterAction::Handled)
    }

    /// Encodes `text` into the focused terminal (`p` in a prefix command
    /// resolves to this once the caller supplies clipboard contents).
    ///
    /// # Errors
    ///
    /// Propagates a [`EngineError`] on PTY write failure.
    pub fn paste(&mut self, text: &str, tabs: &mut TabManager) -> Result<(), EngineError> {
        let translated = text.replace('\n', "\r");
        let index = tabs.focused_index();
        tabs.focused_mut().write(index, translated.as_bytes())
    }

    /// Default text forwarding: the keysym's own text, ESC-prefixed under
    /// Alt (or high-bit-set under 8-bit-meta mode), echoed back into the
    /// parser when ECHO mode is set.
    fn send_default(&mut self, key: KeyEvent, tabs: &mut TabManager) -> Result<(), EngineError> {
        let KeyCode::Char(ch) = key.code else { return Ok(()) };
        let encoded = crate::utf8::encode(ch);

        let eight_bit_meta = tabs.focused().screen().modes().contains(ModeSet::EIGHT_BIT_INPUT);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        let mut bytes = Vec::with_capacity(encoded.len() + 1);
        if alt && eight_bit_meta {
            for &byte in &encoded {
                bytes.push(byte | 0x80);
            }
        } else {
            if alt {
                bytes.push(0x1B);
            }
            bytes.extend_from_slice(&encoded);
        }

        let index = tabs.focused_index();
        tabs.focused_mut().write(index, &bytes)?;

        if tabs.focused().screen().modes().contains(ModeSet::ECHO) {
            let _ = tabs.focused_mut().feed(&bytes);
        }
        Ok(())
    }

    /// Routes a mouse event into the focused PTY when a mouse-tracking
    /// mode claims it, otherwise into click-timing and the process-wide
    /// selection.
    ///
    /// # Errors
    ///
    /// Propagates a [`EngineError`] on PTY write failure while reporting.
    pub fn handle_mouse(&mut self, event: MouseEvent, tabs: &mut TabManager) -> Result<(), EngineError> {
        let (x, y) = (event.column, event.row);
        let modes = tabs.focused().screen().modes();
        let reporting = modes.contains(ModeSet::MOUSE_BTN_REPORT) || modes.contains(ModeSet::MOUSE_MOTION_REPORT);
        let is_motion = matches!(event.kind, MouseEventKind::Drag(_) | MouseEventKind::Moved);
        let motion_allowed = modes.contains(ModeSet::MOUSE_MOTION_REPORT);

        if reporting && (!is_motion || motion_allowed) {
            let encoded = if modes.contains(ModeSet::MOUSE_SGR) {
                mouse::encode_sgr(event.kind, event.modifiers, x, y)
            } else {
                mouse::encode_x10(event.kind, event.modifiers, x, y)
            };
            if let Some(bytes) = encoded {
                let index = tabs.focused_index();
                tabs.focused_mut().write(index, &bytes)?;
            }
            return Ok(());
        }

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let snap = self.click_tracker.register(Instant::now(), x, y);
                let kind = if event.modifiers.contains(KeyModifiers::ALT) {
                    SelectionKind::Rectangular
                } else {
                    SelectionKind::Linear
                };
                let (screen, selection) = tabs.focused_screen_and_selection_mut();
                selection.begin(screen, GridCoord::new(x, y), snap, kind);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (screen, selection) = tabs.focused_screen_and_selection_mut();
                selection.update(screen, GridCoord::new(x, y));
            }
            _ => {}
        }
        Ok(())
    }
}
