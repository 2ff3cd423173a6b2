//! Raw key codes delivered by keyboard drivers.
//!
//! Printable keys arrive as their ASCII value. Control keys use the codes
//! below; [`FOCUS_SWITCH`] is reserved and never reaches a window.

pub const TAB: u8 = 9;
pub const LINE_FEED: u8 = b'\n';
pub const ENTER: u8 = 13;
pub const ESCAPE: u8 = 27;
pub const BACKSPACE: u8 = 127;
pub const DELETE: u8 = 127;
pub const BACKSPACE_ASCII: u8 = 8;

/// Navigation keys sit above ASCII so they never read as text or as line
/// editing.
pub const UP_ARROW: u8 = 0x80;
pub const DOWN_ARROW: u8 = 0x81;
pub const LEFT_ARROW: u8 = 0x82;
pub const RIGHT_ARROW: u8 = 0x83;
pub const PAGE_UP: u8 = 0x84;
pub const PAGE_DOWN: u8 = 0x85;

/// Shift+Tab: move input focus to the next window.
pub const FOCUS_SWITCH: u8 = 0x0F;

/// `true` for either backspace encoding.
pub const fn is_backspace(key: u8) -> bool {
    key == BACKSPACE || key == BACKSPACE_ASCII
}

/// `true` for the line terminator windows see after routing.
pub const fn is_line_end(key: u8) -> bool {
    key == LINE_FEED
}

/// `true` for arrow and page keys.
pub const fn is_navigation(key: u8) -> bool {
    key >= UP_ARROW && key <= PAGE_DOWN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_keys_are_not_editing_keys() {
        for key in [UP_ARROW, DOWN_ARROW, LEFT_ARROW, RIGHT_ARROW, PAGE_UP, PAGE_DOWN] {
            assert!(is_navigation(key));
            assert!(!is_backspace(key));
            assert!(!is_line_end(key));
            assert_ne!(key, FOCUS_SWITCH);
        }
        assert!(!is_navigation(b'a'));
        assert!(!is_navigation(BACKSPACE));
    }
}
