//! Thin driver binary: wires the engine's core (`vtengine::event_loop::run`)
//! to a real `portable-pty` PTY (already owned by `TabManager`) and a
//! `crossterm`-backed display: raw mode on entry, an initial title, the
//! event loop, then cleanup regardless of the result.

use std::io::{self, Write};

use clap::Parser;
use crossterm::{
    ExecutableCommand, QueueableCommand,
    cursor::{Hide, MoveTo, Show},
    event::{DisableBracketedPaste, EnableBracketedPaste},
    style::{Attribute, Color as CtColor, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use vtengine::{
    cli::{Cli, parse_geometry},
    config::EngineConfig,
    error::EngineError,
    event_loop::{self, ClipboardSource},
    input::InputRouter,
    renderer::{RenderFrame, Renderer, resolve_colors},
    screen::cell::Color,
    tabs::TabManager,
};

/// RAII guard: raw mode, bracketed paste, and (optionally) the alternate
/// screen are always torn down on drop, including on an early return or
/// panic unwind.
struct TerminalGuard {
    alt_screen: bool,
}

impl TerminalGuard {
    fn enter(alt_screen: bool) -> io::Result<Self> {
        enable_raw_mode()?;
        io::stdout().execute(EnableBracketedPaste)?;
        if alt_screen {
            io::stdout().execute(EnterAlternateScreen)?;
        }
        Ok(Self { alt_screen })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.alt_screen {
            let _ = io::stdout().execute(LeaveAlternateScreen);
        }
        let _ = io::stdout().execute(DisableBracketedPaste);
        let _ = disable_raw_mode();
    }
}

/// Reads the system clipboard via `arboard`, lazily constructing the
/// platform handle on first use (some backends require a live event-loop
/// connection that isn't available before the terminal enters raw mode).
struct ArboardClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ArboardClipboard {
    fn new() -> Self { Self { inner: None } }
}

impl ClipboardSource for ArboardClipboard {
    fn read_text(&mut self) -> Option<String> {
        let clipboard = match &mut self.inner {
            Some(clipboard) => clipboard,
            None => {
                self.inner = arboard::Clipboard::new().ok();
                self.inner.as_mut()?
            }
        };
        clipboard.get_text().ok()
    }
}

fn to_ct_color(color: Color) -> CtColor {
    match color {
        Color::Default => CtColor::Reset,
        Color::Indexed(index) => CtColor::AnsiValue(index),
    }
}

fn render_err(error: io::Error) -> EngineError { EngineError::Render(error) }

/// Paints the focused terminal's grid straight to the real terminal via
/// `crossterm`, row by row, skipping rows the core didn't mark dirty.
/// DECSCNM (reverse-video mode inverts the default fg/bg pair for the
/// whole screen) is realized by toggling the real terminal's own
/// reverse-video SGR attribute around cells still carrying `Color::Default`
/// on both sides, rather than resolving a concrete color pair ourselves.
struct CrosstermRenderer {
    out: io::Stdout,
}

impl CrosstermRenderer {
    fn new() -> Self { Self { out: io::stdout() } }
}

impl Renderer for CrosstermRenderer {
    fn paint(&mut self, frame: &RenderFrame<'_>) -> Result<(), EngineError> {
        let out = &mut self.out;
        for y in 0..frame.screen.row() {
            if !frame.dirty.get(y as usize).copied().unwrap_or(true) {
                continue;
            }
            out.queue(MoveTo(0, y)).map_err(render_err)?;
            out.queue(Clear(ClearType::CurrentLine)).map_err(render_err)?;

            let mut last_fg = None;
            let mut last_bg = None;
            let mut reversed = false;
            for x in 0..frame.screen.col() {
                let (fg, bg) = resolve_colors(frame.screen, frame.selection, x, y);
                let want_reverse = frame.reverse_video && fg.is_default() && bg.is_default();
                if last_fg != Some(fg) {
                    out.queue(SetForegroundColor(to_ct_color(fg))).map_err(render_err)?;
                    last_fg = Some(fg);
                }
                if last_bg != Some(bg) {
                    out.queue(SetBackgroundColor(to_ct_color(bg))).map_err(render_err)?;
                    last_bg = Some(bg);
                }
                if want_reverse != reversed {
                    let attr = if want_reverse { Attribute::Reverse } else { Attribute::NoReverse };
                    out.queue(SetAttribute(attr)).map_err(render_err)?;
                    reversed = want_reverse;
                }
                out.queue(Print(frame.screen.cell(x, y).ch)).map_err(render_err)?;
            }
            out.queue(SetAttribute(Attribute::NoReverse)).map_err(render_err)?;
            out.queue(ResetColor).map_err(render_err)?;
        }

        if let Some(labels) = frame.tabs {
            let row = frame.screen.row();
            out.queue(MoveTo(0, row)).map_err(render_err)?;
            out.queue(Clear(ClearType::CurrentLine)).map_err(render_err)?;
            out.queue(SetAttribute(Attribute::Reverse)).map_err(render_err)?;
            for label in labels {
                let marker = if label.focused { '*' } else { ' ' };
                out.queue(Print(format!(" {}{}:{} ", marker, label.index + 1, label.title))).map_err(render_err)?;
            }
            out.queue(SetAttribute(Attribute::NoReverse)).map_err(render_err)?;
        }

        if frame.cursor.visible && frame.cursor.blink_on {
            out.queue(MoveTo(frame.cursor.x, frame.cursor.y)).map_err(render_err)?;
            out.queue(Show).map_err(render_err)?;
        } else {
            out.queue(Hide).map_err(render_err)?;
        }
        out.flush().map_err(render_err)
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    vtengine::logging::init()?;

    let cli = Cli::parse();

    let (col, row) = cli
        .geometry
        .as_deref()
        .and_then(parse_geometry)
        .or_else(|| crossterm::terminal::size().ok())
        .unwrap_or((80, 24));

    let config = EngineConfig { alt_screen_enabled: !cli.no_alt_screen, window_id: cli.window_id, ..EngineConfig::default() };

    let mut tabs = TabManager::new(config.clone(), &cli.exec, col, row)
        .map_err(|error| miette::miette!("failed to start the first tab: {error}"))?;

    if let Some(title) = cli.title {
        tabs.focused_mut().set_initial_title(title);
    }
    if let Some(path) = &cli.output_log {
        let file = std::fs::File::create(path)
            .map_err(|error| miette::miette!("failed to open -o output log {path:?}: {error}"))?;
        tabs.focused_mut().set_output_tee(file);
    }

    let router = InputRouter::new(&config);
    let renderer = CrosstermRenderer::new();
    let clipboard = ArboardClipboard::new();

    let guard = TerminalGuard::enter(config.alt_screen_enabled)
        .map_err(|error| miette::miette!("failed to enter raw mode: {error}"))?;

    let result = event_loop::run(tabs, router, renderer, clipboard, &config).await;
    drop(guard);

    result.map_err(|error| miette::miette!("{error}"))
}
