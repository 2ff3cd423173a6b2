//! Per-window input buffer.

use alloc::string::String;
use heapless::Deque;

use crate::config::KEY_BUF_LEN;
use crate::keys;

/// Bounded FIFO of routed keys plus the echo flag.
///
/// The router is the only producer and the owning task the only consumer;
/// both go through the window's lock.
pub struct KeyBuffer {
    keys: Deque<u8, KEY_BUF_LEN>,
    echo: bool,
}

impl KeyBuffer {
    pub const fn new() -> Self {
        Self {
            keys: Deque::new(),
            echo: false,
        }
    }

    /// Append a key. Returns `false` and drops it when full.
    pub fn push(&mut self, key: u8) -> bool {
        self.keys.push_back(key).is_ok()
    }

    /// Oldest buffered key.
    pub fn pop(&mut self) -> Option<u8> {
        self.keys.pop_front()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.keys.is_full()
    }

    pub const fn capacity(&self) -> usize {
        KEY_BUF_LEN
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Router echoes routed keys to the window while set.
    pub fn echo(&self) -> bool {
        self.echo
    }

    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    /// `true` once a complete line is buffered.
    pub fn has_line(&self) -> bool {
        self.keys.iter().any(|&k| keys::is_line_end(k))
    }

    /// Move keys up to the first line end into `out`, applying backspaces.
    /// The line end is consumed but not stored. Keys after it stay queued.
    pub fn take_line(&mut self, out: &mut String) {
        out.clear();
        while let Some(key) = self.keys.pop_front() {
            match key {
                k if keys::is_line_end(k) => break,
                k if keys::is_backspace(k) => {
                    out.pop();
                }
                k if keys::is_navigation(k) => {}
                k => out.push(k as char),
            }
        }
    }
}

impl Default for KeyBuffer {
    fn default() -> Self {
        Self::new()
    }
}
