//! PS/2 keyboard adapter
//!
//! The clock-line interrupt pushes raw scancode bytes into a
//! [`ScancodeQueue`]; [`Ps2Keyboard`] decodes them on the reading task and
//! hands out raw key codes from [`crate::keys`].

use core::sync::atomic::{AtomicUsize, Ordering};

use bitflags::bitflags;
use heapless::Deque;
use pc_keyboard::{layouts, DecodedKey, HandleControl, KeyCode, KeyEvent, KeyState, Keyboard, ScancodeSet2};
use spin::Mutex;

use crate::drivers::KeySource;
use crate::keys;

const SCANCODE_QUEUE_LEN: usize = 64;

/// Runs the closure with the keyboard interrupt masked. Firmware passes its
/// platform's `without_interrupts`.
pub type InterruptFree = fn(&mut dyn FnMut());

/// [`InterruptFree`] for producers that are not interrupt handlers.
pub fn run_directly(f: &mut dyn FnMut()) {
    f()
}

/// Interrupt-to-task scancode hand-off.
///
/// Neither side ever waits on the lock. The task side takes it only with
/// the interrupt masked, so on a single core the handler always finds it
/// free.
pub struct ScancodeQueue {
    bytes: Mutex<Deque<u8, SCANCODE_QUEUE_LEN>>,
    dropped: AtomicUsize,
    interrupt_free: InterruptFree,
}

impl ScancodeQueue {
    pub const fn new(interrupt_free: InterruptFree) -> Self {
        Self {
            bytes: Mutex::new(Deque::new()),
            dropped: AtomicUsize::new(0),
            interrupt_free,
        }
    }

    /// Called from the interrupt handler. Bytes that find the queue full
    /// (or locked) are counted and discarded.
    pub fn push(&self, scancode: u8) {
        let queued = match self.bytes.try_lock() {
            Some(mut bytes) => bytes.push_back(scancode).is_ok(),
            None => false,
        };
        if !queued {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn pop(&self) -> Option<u8> {
        let mut byte = None;
        (self.interrupt_free)(&mut || {
            byte = self.bytes.try_lock().and_then(|mut bytes| bytes.pop_front());
        });
        byte
    }

    /// Number of scancodes lost so far.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for ScancodeQueue {
    fn default() -> Self {
        Self::new(run_directly)
    }
}

bitflags! {
    /// Modifier keys currently held.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b001;
        const CTRL = 0b010;
        const ALT = 0b100;
    }
}

/// Scancode set 2 keyboard decoded with a US layout.
pub struct Ps2Keyboard {
    queue: &'static ScancodeQueue,
    decoder: Keyboard<layouts::Us104Key, ScancodeSet2>,
    modifiers: Modifiers,
    pending: Option<u8>,
}

impl Ps2Keyboard {
    pub fn new(queue: &'static ScancodeQueue) -> Self {
        Self {
            queue,
            decoder: Keyboard::new(ScancodeSet2::new(), layouts::Us104Key, HandleControl::Ignore),
            modifiers: Modifiers::empty(),
            pending: None,
        }
    }

    /// Modifier keys held after the last decoded byte.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    fn track_modifiers(&mut self, event: &KeyEvent) {
        let flag = match event.code {
            KeyCode::LShift | KeyCode::RShift => Modifiers::SHIFT,
            KeyCode::LControl | KeyCode::RControl => Modifiers::CTRL,
            KeyCode::LAlt => Modifiers::ALT,
            _ => return,
        };
        let held = matches!(event.state, KeyState::Down | KeyState::SingleShot);
        self.modifiers.set(flag, held);
    }

    fn translate(&mut self, event: KeyEvent) -> Option<u8> {
        self.track_modifiers(&event);

        if event.code == KeyCode::Tab && event.state == KeyState::Down && self.modifiers.contains(Modifiers::SHIFT) {
            return Some(keys::FOCUS_SWITCH);
        }

        match self.decoder.process_keyevent(event)? {
            DecodedKey::Unicode(c) => match c {
                '\n' | '\r' => Some(keys::ENTER),
                '\u{8}' | '\u{7f}' => Some(keys::BACKSPACE),
                '\u{1b}' => Some(keys::ESCAPE),
                '\t' => Some(keys::TAB),
                c if c.is_ascii() => Some(c as u8),
                _ => None,
            },
            DecodedKey::RawKey(code) => match code {
                KeyCode::ArrowUp => Some(keys::UP_ARROW),
                KeyCode::ArrowDown => Some(keys::DOWN_ARROW),
                KeyCode::ArrowLeft => Some(keys::LEFT_ARROW),
                KeyCode::ArrowRight => Some(keys::RIGHT_ARROW),
                KeyCode::PageUp => Some(keys::PAGE_UP),
                KeyCode::PageDown => Some(keys::PAGE_DOWN),
                _ => None,
            },
        }
    }

    fn decode_next(&mut self) -> nb::Result<u8, pc_keyboard::Error> {
        while let Some(byte) = self.queue.pop() {
            if let Some(event) = self.decoder.add_byte(byte).map_err(nb::Error::Other)? {
                if let Some(key) = self.translate(event) {
                    return Ok(key);
                }
            }
        }
        Err(nb::Error::WouldBlock)
    }
}

impl KeySource for Ps2Keyboard {
    type Error = pc_keyboard::Error;

    fn key_available(&mut self) -> bool {
        if self.pending.is_none() {
            match self.decode_next() {
                Ok(key) => self.pending = Some(key),
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(e)) => log::warn!("ps2: discarded scancode: {:?}", e),
            }
        }
        self.pending.is_some()
    }

    fn read_key(&mut self) -> nb::Result<u8, Self::Error> {
        match self.pending.take() {
            Some(key) => Ok(key),
            None => self.decode_next(),
        }
    }
}
