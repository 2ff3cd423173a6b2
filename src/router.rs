//! Keyboard router task.
//!
//! The router is the only producer of window input. It drains the keyboard
//! driver, turns the focus hotkey into a carousel step and hands every
//! other key to whichever window holds focus at that moment.

use alloc::sync::Arc;

use crate::carousel::Carousel;
use crate::drivers::{KeySource, PixelDriver};
use crate::keys;
use crate::rtos::Scheduler;

/// What one [`KeyRouter::poll_once`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// No key pending.
    Idle,
    /// The hotkey moved focus.
    FocusSwitched,
    /// Key queued on the focused window.
    Delivered(u8),
    /// Key lost: no window has focus or its buffer is full.
    Dropped(u8),
}

pub struct KeyRouter<D, K> {
    carousel: Arc<Carousel<D>>,
    keyboard: K,
    scheduler: Arc<dyn Scheduler>,
    poll_ms: u32,
}

impl<D: PixelDriver, K: KeySource> KeyRouter<D, K> {
    pub fn new(carousel: Arc<Carousel<D>>, keyboard: K, scheduler: Arc<dyn Scheduler>, poll_ms: u32) -> Self {
        Self {
            carousel,
            keyboard,
            scheduler,
            poll_ms,
        }
    }

    /// Route at most one key.
    pub fn poll_once(&mut self) -> Routed {
        let key = match self.keyboard.read_key() {
            Ok(key) => key,
            Err(nb::Error::WouldBlock) => return Routed::Idle,
            Err(nb::Error::Other(e)) => {
                log::warn!("keyboard error: {:?}", e);
                return Routed::Idle;
            }
        };

        if key == keys::FOCUS_SWITCH {
            self.carousel.next();
            return Routed::FocusSwitched;
        }

        let key = if key == keys::ENTER { keys::LINE_FEED } else { key };
        match self.carousel.focused() {
            Some(window) if window.deliver(key) => Routed::Delivered(key),
            Some(window) => {
                log::debug!("window {}: input buffer full, dropped {:#04x}", window.id().get(), key);
                Routed::Dropped(key)
            }
            None => {
                log::debug!("no focused window, dropped {:#04x}", key);
                Routed::Dropped(key)
            }
        }
    }

    /// Task body: route keys forever, sleeping between polls when idle.
    pub fn run(mut self) -> ! {
        log::info!("key router running, poll every {} ms", self.poll_ms);
        loop {
            if self.poll_once() == Routed::Idle {
                self.scheduler.delay_ms(self.poll_ms);
            }
        }
    }
}
