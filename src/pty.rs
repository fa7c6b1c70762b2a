//! PTY backend adapter: a `portable-pty`-backed session with a
//! `tokio::sync::mpsc` channel carrying output back to the owning
//! `Terminal`.

use std::io::Write;

use portable_pty::{CommandBuilder, PtySize, native_pty_system};
use tokio::sync::mpsc;

use crate::error::EngineError;

/// One output chunk read from the PTY master, or a lifecycle event.
#[derive(Debug)]
pub enum PtyOutputEvent {
    Output(Vec<u8>),
    Exited,
}

/// A spawned child's PTY session: the write half feeds `write`/`resize`
/// requests to a blocking writer thread (PTY writes are blocking per spec
/// §5), the receiver half yields `PtyOutputEvent`s read by a background
/// task.
pub struct PtyHandle {
    writer: Box<dyn Write + Send>,
    controller: Box<dyn portable_pty::MasterPty + Send>,
    child: Box<dyn portable_pty::Child + Send + Sync>,
    pub output_rx: mpsc::UnboundedReceiver<PtyOutputEvent>,
}

impl std::fmt::Debug for PtyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtyHandle").finish_non_exhaustive()
    }
}

/// Resolves the shell to exec: honour `$SHELL`, fall back to a platform
/// default.
#[must_use]
pub fn resolve_shell() -> String {
    std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
}

impl PtyHandle {
    /// Allocates a PTY pair and spawns `command` (or the resolved shell if
    /// `command` is empty) sized to `(col, row)`. Clears `COLUMNS`/`LINES`/
    /// `TERMCAP` and sets `TERM`/`LOGNAME`/`USER`/`HOME`/`SHELL` in the
    /// child.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PtyAllocate`] or [`EngineError::PtySpawn`] if
    /// the pseudo-terminal cannot be allocated or the child cannot exec.
    pub fn spawn(
        command: &[String],
        col: u16,
        row: u16,
        window_id: Option<&str>,
    ) -> Result<Self, EngineError> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize { rows: row, cols: col, pixel_width: 0, pixel_height: 0 })
            .map_err(|e| EngineError::PtyAllocate(e.to_string()))?;

        let mut cmd = if let [program, args @ ..] = command {
            let mut cmd = CommandBuilder::new(program);
            cmd.args(args);
            cmd
        } else {
            CommandBuilder::new(resolve_shell())
        };

        cmd.env_remove("COLUMNS");
        cmd.env_remove("LINES");
        cmd.env_remove("TERMCAP");
        cmd.env("TERM", "xterm-256color");
        if let Ok(logname) = std::env::var("LOGNAME") {
            cmd.env("LOGNAME", logname);
        }
        if let Ok(user) = std::env::var("USER") {
            cmd.env("USER", user);
        }
        if let Ok(home) = std::env::var("HOME") {
            cmd.env("HOME", home);
        }
        cmd.env("SHELL", resolve_shell());
        if let Some(window_id) = window_id {
            cmd.env("WINDOWID", window_id);
        }

        let child =
            pair.slave.spawn_command(cmd).map_err(|e| EngineError::PtySpawn(e.to_string()))?;
        drop(pair.slave);

        let mut reader =
            pair.master.try_clone_reader().map_err(|e| EngineError::PtyAllocate(e.to_string()))?;
        let writer =
            pair.master.take_writer().map_err(|e| EngineError::PtyAllocate(e.to_string()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => {
                        let _ = tx.send(PtyOutputEvent::Exited);
                        break;
                    }
                    Ok(n) => {
                        if tx.send(PtyOutputEvent::Output(buf[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "pty read failed");
                        let _ = tx.send(PtyOutputEvent::Exited);
                        break;
                    }
                }
            }
        });

        Ok(Self { writer, controller: pair.master, child, output_rx: rx })
    }

    /// Writes `bytes` to the PTY master. Blocking and best-effort per spec
    /// §5: a short write retries; any other error is fatal to this
    /// terminal only.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PtyWrite`] on an unrecoverable write failure.
    pub fn write(&mut self, tab: usize, bytes: &[u8]) -> Result<(), EngineError> {
        let mut written = 0;
        while written < bytes.len() {
            match self.writer.write(&bytes[written..]) {
                Ok(0) => continue,
                Ok(n) => written += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(EngineError::PtyWrite { tab, source: e }),
            }
        }
        Ok(())
    }

    /// Pushes a window-size change to the PTY, carrying
    /// `(rows, cols, pixel-w, pixel-h)`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PtyResize`] if the ioctl fails.
    pub fn resize(&self, col: u16, row: u16) -> Result<(), EngineError> {
        self.controller
            .resize(PtySize { rows: row, cols: col, pixel_width: 0, pixel_height: 0 })
            .map_err(|e| EngineError::PtyResize(e.to_string()))
    }

    pub fn kill(&mut self) {
        let _ = self.child.kill();
    }
}
