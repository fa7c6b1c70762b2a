//! Leaf error types for the system boundaries named in the error-handling
//! design: PTY setup/write, and rendering. The parser and screen never
//! return `Result` — they repair or ignore (see `screen` and `parser`).

use thiserror::Error;

/// A failure at one of the engine's external boundaries.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to allocate a pseudo-terminal: {0}")]
    PtyAllocate(String),

    #[error("failed to spawn child process: {0}")]
    PtySpawn(String),

    #[error("write to pty failed for tab {tab}: {source}")]
    PtyWrite {
        tab: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resize pty: {0}")]
    PtyResize(String),

    #[error("render I/O failed: {0}")]
    Render(#[source] std::io::Error),

    #[error("no tab at index {0}")]
    NoSuchTab(usize),

    #[error("no tabs remain")]
    NoTabs,
}
