//! The cooperative event loop: a single `tokio::select!` over an
//! output-poll interval, a blink interval, a redraw interval, and the
//! window's input-event stream, driving every tab each tick.

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;

use crate::{
    config::{EngineConfig, IDLE_FRAMES_BEFORE_RELAX},
    error::EngineError,
    input::{InputRouter, RouterAction},
    renderer::{CursorState, RenderFrame, Renderer, TabLabel},
    screen::modes::ModeSet,
    tabs::TabManager,
};

/// The display backend's access to the system clipboard, read on the
/// prefix command `p`. Reading the clipboard is OS-specific and outside
/// the engine's PTY/grid contract, so the binary supplies the real
/// implementation.
pub trait ClipboardSource {
    /// Returns the clipboard's current text contents, or `None` if it is
    /// empty or unreadable.
    fn read_text(&mut self) -> Option<String>;
}

/// Runs `tabs` to completion against `renderer`, routing keyboard/mouse
/// events through `router` until the last tab closes or a fatal error
/// occurs.
///
/// # Errors
///
/// Returns an [`EngineError`] on an unrecoverable PTY or render failure.
pub async fn run<R: Renderer, C: ClipboardSource>(
    mut tabs: TabManager,
    mut router: InputRouter,
    mut renderer: R,
    mut clipboard: C,
    config: &EngineConfig,
) -> Result<(), EngineError> {
    let mut output_poll = tokio::time::interval(std::time::Duration::from_millis(10));
    let mut blink_tick = tokio::time::interval(config.blink_interval);
    let mut draw_interval = tokio::time::interval(config.active_draw_interval);
    let mut events = EventStream::new();

    let mut dirty = true;
    let mut idle_frames: u32 = 0;
    let mut draw_relaxed = false;
    let mut blink_on = true;

    loop {
        tokio::select! {
            _ = output_poll.tick() => {
                let exited = tabs.poll_all();
                for index in exited.into_iter().rev() {
                    if !tabs.close_tab(index)? {
                        return Ok(());
                    }
                }
                dirty = true;
            }

            _ = blink_tick.tick(), if config.blink_enabled => {
                blink_on = !blink_on;
                dirty = true;
            }

            _ = draw_interval.tick() => {
                if dirty {
                    draw(&mut tabs, &mut renderer, blink_on)?;
                    dirty = false;
                    idle_frames = 0;
                    if draw_relaxed {
                        draw_relaxed = false;
                        draw_interval = tokio::time::interval(config.active_draw_interval);
                    }
                } else {
                    idle_frames += 1;
                    if !draw_relaxed && idle_frames >= IDLE_FRAMES_BEFORE_RELAX {
                        draw_relaxed = true;
                        draw_interval = tokio::time::interval(config.idle_draw_interval);
                    }
                }
            }

            Some(event) = events.next() => {
                let Ok(event) = event else { continue };
                match event {
                    Event::Key(key) => match router.handle_key(key, &mut tabs)? {
                        RouterAction::Handled => {}
                        RouterAction::Exit => return Ok(()),
                        RouterAction::Copy(_text) => {
                            // Writing to the system clipboard is the
                            // display backend's job; the engine has
                            // already done its part by serializing the
                            // selection.
                        }
                        RouterAction::RequestPaste => {
                            if let Some(text) = clipboard.read_text() {
                                router.paste(&text, &mut tabs)?;
                            }
                        }
                    },
                    Event::Mouse(mouse) => router.handle_mouse(mouse, &mut tabs)?,
                    Event::Resize(col, row) => tabs.resize_all(col, row),
                    Event::Paste(text) => router.paste(&text, &mut tabs)?,
                    Event::FocusGained | Event::FocusLost => {}
                }
                dirty = true;
            }
        }
    }
}

fn draw<R: Renderer>(tabs: &mut TabManager, renderer: &mut R, blink_on: bool) -> Result<(), EngineError> {
    let labels: Vec<TabLabel> = if tabs.terminals().len() > 1 {
        tabs.terminals()
            .iter()
            .enumerate()
            .map(|(index, terminal)| TabLabel {
                index,
                title: terminal.title().unwrap_or("shell").to_string(),
                focused: index == tabs.focused_index(),
            })
            .collect()
    } else {
        Vec::new()
    };

    let focused = tabs.focused();
    let screen = focused.screen();
    let cursor = screen.cursor();
    let dirty_rows = screen.dirty();
    let cursor_state = CursorState {
        x: cursor.x,
        y: cursor.y,
        visible: !screen.modes().contains(ModeSet::HIDE_CURSOR),
        blink_on: blink_on || !screen.modes().contains(ModeSet::BLINK_GLOBAL),
    };
    let frame = RenderFrame {
        screen,
        dirty: &dirty_rows,
        cursor: cursor_state,
        selection: tabs.selection(),
        tabs: if labels.is_empty() { None } else { Some(&labels) },
        reverse_video: screen.modes().contains(ModeSet::REVERSE_VIDEO),
    };
    renderer.paint(&frame)?;
    tabs.focused_mut().screen_mut().clear_dirty();
    Ok(())
}
