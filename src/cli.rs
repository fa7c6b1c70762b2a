//! Command-line flags for `vtengine-term`.

use std::path::PathBuf;

use clap::Parser;

/// `vtengine-term` — a VT-compatible terminal engine.
#[derive(Debug, Parser)]
#[command(name = "vtengine-term", version, about)]
pub struct Cli {
    /// Disable the alternate screen buffer.
    #[arg(short = 'a', long = "no-alt-screen")]
    pub no_alt_screen: bool,

    /// Window class hint, passed through to the display backend.
    #[arg(short = 'c', long = "class")]
    pub class: Option<String>,

    /// Font name hint, passed through to the display backend.
    #[arg(short = 'f', long = "font")]
    pub font: Option<String>,

    /// Geometry as `COLSxROWS` (e.g. `80x24`).
    #[arg(short = 'g', long = "geometry")]
    pub geometry: Option<String>,

    /// Tee all PTY output to this file.
    #[arg(short = 'o', long = "output-log")]
    pub output_log: Option<PathBuf>,

    /// Initial window/tab title.
    #[arg(short = 't', long = "title")]
    pub title: Option<String>,

    /// Window id to expose as `WINDOWID` in the child's environment.
    #[arg(short = 'w', long = "window-id")]
    pub window_id: Option<String>,

    /// Command to exec instead of the resolved shell.
    #[arg(short = 'e', long = "exec", num_args = 1.., trailing_var_arg = true)]
    pub exec: Vec<String>,
}

/// Parsed `-g COLSxROWS`, or `None` if absent/malformed (the caller falls
/// back to the real terminal size).
#[must_use]
pub fn parse_geometry(geometry: &str) -> Option<(u16, u16)> {
    let (cols, rows) = geometry.split_once('x')?;
    Some((cols.parse().ok()?, rows.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_parses_cols_by_rows() {
        assert_eq!(parse_geometry("80x24"), Some((80, 24)));
    }

    #[test]
    fn geometry_rejects_malformed_input() {
        assert_eq!(parse_geometry("nonsense"), None);
        assert_eq!(parse_geometry("80"), None);
    }

    #[test]
    fn exec_flag_collects_trailing_args() {
        let cli = Cli::parse_from(["vtengine-term", "-e", "vim", "file.txt"]);
        assert_eq!(cli.exec, vec!["vim".to_string(), "file.txt".to_string()]);
    }
}
