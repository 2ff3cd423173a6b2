//! Blocking input on a window.
//!
//! Every call here suspends by yielding and polling again; there is no
//! timeout. A window only receives keys while it has focus, so a task
//! reading from a window that never regains focus waits forever.

use alloc::string::String;
use alloc::vec::Vec;

use crate::color::Color;
use crate::drivers::PixelDriver;
use crate::keys;
use crate::scan::{self, ScanValue};
use crate::window::Window;

const INVALID_INPUT: &str = "Invalid input!\n";

impl<D: PixelDriver> Window<D> {
    /// Keys routed to this window and not yet read.
    pub fn pending_keys(&self) -> usize {
        self.keys().len()
    }

    /// Router side: queue a key, echoing it if a raw read asked for that.
    /// Returns `false` when the buffer is full and the key was dropped.
    pub(crate) fn deliver(&self, key: u8) -> bool {
        let mut buffer = self.keys();
        if !buffer.push(key) {
            return false;
        }
        if buffer.echo() {
            self.write(key);
        }
        true
    }

    /// Oldest buffered key, without waiting. `None` unless this window is
    /// focused and has input.
    pub fn pressed_key(&self) -> Option<u8> {
        if !self.is_focused() {
            return None;
        }
        self.keys().pop()
    }

    /// Wait for the next key routed to this window.
    pub fn getchar(&self) -> u8 {
        loop {
            if let Some(key) = self.pressed_key() {
                return key;
            }
            self.scheduler().yield_now();
        }
    }

    /// Read one line into `out` with echo and backspace editing. The line
    /// end is echoed as a line break but not stored; arrow and page keys are
    /// skipped.
    pub fn read_string(&self, out: &mut String) {
        out.clear();
        loop {
            let key = self.getchar();
            if keys::is_line_end(key) {
                break;
            }
            if keys::is_navigation(key) {
                continue;
            }
            if keys::is_backspace(key) {
                if out.pop().is_some() {
                    self.write(key);
                }
            } else {
                out.push(key as char);
                self.write(key);
            }
        }
        self.write(b'\n');
    }

    pub fn read_line(&self) -> String {
        let mut line = String::new();
        self.read_string(&mut line);
        line
    }

    /// Read lines until one converts every field of `format`.
    ///
    /// A line that comes up short is answered with an inline error in red
    /// and the user is asked again. A format with a conversion the scanner
    /// does not support is refused without reading anything.
    pub fn scanf(&self, format: &str) -> Vec<ScanValue> {
        let Some(expected) = scan::placeholder_count(format) else {
            log::warn!("window {}: unsupported scan format {:?}", self.id().get(), format);
            return Vec::new();
        };
        let mut line = String::new();
        loop {
            self.read_string(&mut line);
            let values = scan::parse(&line, format);
            if values.len() == expected {
                return values;
            }
            log::debug!(
                "window {}: {:?} matched {} of {} fields",
                self.id().get(),
                line,
                values.len(),
                expected
            );
            let color = self.text_color();
            self.set_text_color(Color::Red);
            self.print_str(INVALID_INPUT);
            self.set_text_color(color);
        }
    }

    /// Read one line straight from the key buffer and convert it once.
    ///
    /// Echo is switched on so the router draws keys as they arrive. The
    /// line is taken when a line end is buffered, or when the buffer fills
    /// up without one. Returns whatever fields converted, possibly fewer
    /// than `format` asks for.
    pub fn scan_echoed(&self, format: &str) -> Vec<ScanValue> {
        self.keys().set_echo(true);
        let mut line = String::new();
        loop {
            if self.is_focused() {
                let mut buffer = self.keys();
                if buffer.has_line() || buffer.is_full() {
                    buffer.take_line(&mut line);
                    buffer.set_echo(false);
                    break;
                }
            }
            self.scheduler().yield_now();
        }
        self.write(b'\n');
        scan::parse(&line, format)
    }
}
