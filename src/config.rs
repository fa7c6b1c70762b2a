//! Defaults for constants that colors, key tables, and window geometry
//! leave as external configuration. The engine still needs runnable
//! defaults; CLI flags (`cli.rs`) override individual fields.

use std::time::Duration;

/// Scrollback capacity: number of evicted lines retained per terminal.
pub const DEFAULT_SCROLLBACK_CAPACITY: usize = 10_000;

/// Default tab-stop spacing in columns.
pub const DEFAULT_TAB_STOP_WIDTH: u16 = 8;

/// Window, in milliseconds, for a second click to count as a double click.
pub const DEFAULT_DOUBLE_CLICK_TIMEOUT_MS: u64 = 300;

/// Window, in milliseconds, for a third click to count as a triple click.
pub const DEFAULT_TRIPLE_CLICK_TIMEOUT_MS: u64 = 600;

/// Redraw pacing used while the terminal is actively producing output.
pub const DEFAULT_ACTIVE_DRAW_INTERVAL_MS: u64 = 16;

/// Redraw pacing once `IDLE_FRAMES_BEFORE_RELAX` active-interval ticks have
/// passed with nothing dirty.
pub const DEFAULT_IDLE_DRAW_INTERVAL_MS: u64 = 100;

/// Number of consecutive idle draw frames before the interval relaxes.
pub const IDLE_FRAMES_BEFORE_RELAX: u32 = 8;

/// Cursor blink half-period.
pub const DEFAULT_BLINK_INTERVAL_MS: u64 = 500;

/// Runtime configuration for one engine instance (shared by all tabs).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub scrollback_capacity: usize,
    pub tab_stop_width: u16,
    pub double_click_timeout: Duration,
    pub triple_click_timeout: Duration,
    pub active_draw_interval: Duration,
    pub idle_draw_interval: Duration,
    pub blink_interval: Duration,
    pub alt_screen_enabled: bool,
    pub blink_enabled: bool,
    /// `-w window-id`: set as `WINDOWID` in every spawned child's
    /// environment.
    pub window_id: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scrollback_capacity: DEFAULT_SCROLLBACK_CAPACITY,
            tab_stop_width: DEFAULT_TAB_STOP_WIDTH,
            double_click_timeout: Duration::from_millis(DEFAULT_DOUBLE_CLICK_TIMEOUT_MS),
            triple_click_timeout: Duration::from_millis(DEFAULT_TRIPLE_CLICK_TIMEOUT_MS),
            active_draw_interval: Duration::from_millis(DEFAULT_ACTIVE_DRAW_INTERVAL_MS),
            idle_draw_interval: Duration::from_millis(DEFAULT_IDLE_DRAW_INTERVAL_MS),
            blink_interval: Duration::from_millis(DEFAULT_BLINK_INTERVAL_MS),
            alt_screen_enabled: true,
            blink_enabled: true,
            window_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_ordering() {
        let cfg = EngineConfig::default();
        assert!(cfg.double_click_timeout < cfg.triple_click_timeout);
        assert_eq!(cfg.scrollback_capacity, 10_000);
    }
}
