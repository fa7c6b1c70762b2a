//! `vtengine` — the core of a VT-compatible terminal emulator: a byte-stream
//! parser over UTF-8 + C0/C1 controls + CSI/OSC/DCS escape sequences, a
//! two-buffer screen model with scroll regions and bounded scrollback, a
//! selection model with word/line snapping, and a tab manager that
//! multiplexes several such engines onto one display surface.
//!
//! The window-system backend, the PTY backend, and argument/configuration
//! wiring are external collaborators (see `renderer`, `pty`, `cli`); this
//! crate only depends on their contracts. `vtengine-term` (`src/bin`) is
//! the thin binary that supplies real implementations of those contracts.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod config;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod logging;
pub mod parser;
pub mod pty;
pub mod renderer;
pub mod screen;
pub mod selection;
pub mod tabs;
pub mod terminal;
pub mod utf8;
