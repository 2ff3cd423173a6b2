//! Scripted keyboard
//!
//! Replays raw key codes pushed through a [`KeyFeed`]. Used for headless
//! runs (serial console bridges, demos) and by the test suite.

use alloc::collections::VecDeque;
use alloc::sync::Arc;
use core::convert::Infallible;
use spin::Mutex;

use crate::drivers::KeySource;

/// Producer side of a [`ScriptedKeyboard`].
#[derive(Clone, Default)]
pub struct KeyFeed {
    keys: Arc<Mutex<VecDeque<u8>>>,
}

impl KeyFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, key: u8) {
        self.keys.lock().push_back(key);
    }

    pub fn push_str(&self, s: &str) {
        let mut keys = self.keys.lock();
        keys.extend(s.bytes());
    }

    /// Keys not yet read by the keyboard.
    pub fn pending(&self) -> usize {
        self.keys.lock().len()
    }

    /// Keyboard reading from this feed.
    pub fn keyboard(&self) -> ScriptedKeyboard {
        ScriptedKeyboard { keys: self.keys.clone() }
    }
}

pub struct ScriptedKeyboard {
    keys: Arc<Mutex<VecDeque<u8>>>,
}

impl KeySource for ScriptedKeyboard {
    type Error = Infallible;

    fn key_available(&mut self) -> bool {
        !self.keys.lock().is_empty()
    }

    fn read_key(&mut self) -> nb::Result<u8, Self::Error> {
        self.keys.lock().pop_front().ok_or(nb::Error::WouldBlock)
    }
}
