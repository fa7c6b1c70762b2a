//! Terminal mode set.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModeSet: u16 {
        const WRAP               = 0b0000_0000_0000_0001;
        const INSERT             = 0b0000_0000_0000_0010;
        const APP_KEYPAD         = 0b0000_0000_0000_0100;
        const ALT_SCREEN_ACTIVE  = 0b0000_0000_0000_1000;
        const CRLF               = 0b0000_0000_0001_0000;
        const MOUSE_BTN_REPORT   = 0b0000_0000_0010_0000;
        const MOUSE_MOTION_REPORT= 0b0000_0000_0100_0000;
        const REVERSE_VIDEO      = 0b0000_0000_1000_0000;
        const KEYBOARD_LOCK      = 0b0000_0001_0000_0000;
        const HIDE_CURSOR        = 0b0000_0010_0000_0000;
        const ECHO               = 0b0000_0100_0000_0000;
        const APP_CURSOR         = 0b0000_1000_0000_0000;
        const MOUSE_SGR          = 0b0001_0000_0000_0000;
        const EIGHT_BIT_INPUT    = 0b0010_0000_0000_0000;
        const BLINK_GLOBAL       = 0b0100_0000_0000_0000;
        const BLINK_FRAME        = 0b1000_0000_0000_0000;
    }
}

impl Default for ModeSet {
    /// Wrap is on, echo is on by default; everything else starts cleared.
    fn default() -> Self { ModeSet::WRAP | ModeSet::ECHO }
}
