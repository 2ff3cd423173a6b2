//! Window registry and input focus.
//!
//! The carousel owns every window in creation order and tracks which one
//! has focus. Focus is written only by [`Carousel::create`],
//! [`Carousel::set_focus`], [`Carousel::next`] and [`Carousel::destroy`];
//! blocked readers and the router only read it.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use spin::{Mutex, MutexGuard};

use crate::color::Color;
use crate::config::MAX_WINDOWS;
use crate::drivers::PixelDriver;
use crate::error::Error;
use crate::rtos::{self, Scheduler};
use crate::window::{Frame, Window, WindowId};

const NO_FOCUS: usize = 0;

/// The focused window id, readable without locking.
pub struct Focus {
    current: AtomicUsize,
}

impl Focus {
    pub const fn new() -> Self {
        Self {
            current: AtomicUsize::new(NO_FOCUS),
        }
    }

    pub fn get(&self) -> Option<WindowId> {
        match self.current.load(Ordering::Acquire) {
            NO_FOCUS => None,
            id => Some(WindowId(id)),
        }
    }

    pub fn is(&self, id: WindowId) -> bool {
        self.current.load(Ordering::Acquire) == id.0
    }

    fn set(&self, id: Option<WindowId>) {
        self.current.store(id.map_or(NO_FOCUS, |id| id.0), Ordering::Release);
    }
}

impl Default for Focus {
    fn default() -> Self {
        Self::new()
    }
}

struct Slots<D> {
    windows: heapless::Vec<Arc<Window<D>>, MAX_WINDOWS>,
    active: usize,
}

pub struct Carousel<D> {
    display: Arc<Mutex<D>>,
    scheduler: Arc<dyn Scheduler>,
    focus: Arc<Focus>,
    slots: Mutex<Slots<D>>,
    next_id: AtomicUsize,
}

impl<D: PixelDriver> Carousel<D> {
    pub fn new(display: Arc<Mutex<D>>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            display,
            scheduler,
            focus: Arc::new(Focus::new()),
            slots: Mutex::new(Slots {
                windows: heapless::Vec::new(),
                active: 0,
            }),
            next_id: AtomicUsize::new(NO_FOCUS + 1),
        }
    }

    pub fn display(&self) -> &Arc<Mutex<D>> {
        &self.display
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    pub fn len(&self) -> usize {
        self.slots().windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Windows in creation order.
    pub fn windows(&self) -> Vec<Arc<Window<D>>> {
        self.slots().windows.iter().cloned().collect()
    }

    /// Create a window, paint it and give it focus.
    ///
    /// `width` x `height` is the interior size; the frame adds a title bar
    /// and border around it.
    pub fn create(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        title: &str,
        border: Color,
    ) -> Result<Arc<Window<D>>, Error> {
        let id = WindowId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let window = Arc::new(Window::new(
            id,
            Frame::new(x, y, width, height),
            title,
            border,
            self.display.clone(),
            self.focus.clone(),
            self.scheduler.clone(),
        ));

        {
            let mut slots = self.slots();
            if slots.windows.push(window.clone()).is_err() {
                log::error!("window {:?}: carousel full ({} slots)", title, MAX_WINDOWS);
                return Err(Error::CarouselFull);
            }
            slots.active = slots.windows.len() - 1;
        }

        window.paint_frame(false);
        log::info!("window {} {:?} created at {:?}", id.get(), title, window.frame().outer);
        self.focus_on(&window);
        Ok(window)
    }

    /// Give focus to `window`.
    pub fn set_focus(&self, window: &Arc<Window<D>>) -> Result<(), Error> {
        {
            let mut slots = self.slots();
            let index = slots
                .windows
                .iter()
                .position(|w| w.id() == window.id())
                .ok_or(Error::UnknownWindow)?;
            slots.active = index;
        }
        self.focus_on(window);
        Ok(())
    }

    /// Move focus to the next window in creation order, wrapping around.
    pub fn next(&self) {
        let window = {
            let mut slots = self.slots();
            if slots.windows.is_empty() {
                return;
            }
            slots.active = (slots.active + 1) % slots.windows.len();
            slots.windows[slots.active].clone()
        };
        self.focus_on(&window);
    }

    /// The window holding focus, as windows themselves see it.
    pub fn focused(&self) -> Option<Arc<Window<D>>> {
        let id = self.focus.get()?;
        self.slots().windows.iter().find(|w| w.id() == id).cloned()
    }

    pub fn rows(&self, window: &Window<D>) -> u32 {
        window.rows()
    }

    pub fn cols(&self, window: &Window<D>) -> u32 {
        window.cols()
    }

    /// Remove `window` and blank its area. If it had focus, focus passes to
    /// the window now in its slot, or is cleared when none is left.
    pub fn destroy(&self, window: &Arc<Window<D>>) -> Result<(), Error> {
        let successor = {
            let mut slots = self.slots();
            let index = slots
                .windows
                .iter()
                .position(|w| w.id() == window.id())
                .ok_or(Error::UnknownWindow)?;
            slots.windows.remove(index);

            if self.focus.is(window.id()) {
                if slots.windows.is_empty() {
                    slots.active = 0;
                    self.focus.set(None);
                    None
                } else {
                    slots.active = index % slots.windows.len();
                    Some(slots.windows[slots.active].clone())
                }
            } else {
                if index < slots.active {
                    slots.active -= 1;
                }
                None
            }
        };

        window.erase();
        log::info!("window {} {:?} destroyed", window.id().get(), window.title());
        if let Some(next) = successor {
            self.focus_on(&next);
        }
        Ok(())
    }

    fn slots(&self) -> MutexGuard<'_, Slots<D>> {
        rtos::lock(&self.slots, &*self.scheduler)
    }

    fn focus_on(&self, window: &Arc<Window<D>>) {
        let previous = self.focus.get();
        self.focus.set(Some(window.id()));
        if let Some(previous) = previous.filter(|&id| id != window.id()) {
            let old = self.slots().windows.iter().find(|w| w.id() == previous).cloned();
            if let Some(old) = old {
                old.paint_focus(false);
            }
        }
        window.paint_focus(true);
        log::debug!("focus -> window {}", window.id().get());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn new_window_takes_focus() {
        let carousel = testing::carousel();
        let a = carousel.create(0, 20, 64, 32, "a", Color::Red).unwrap();
        assert!(a.is_focused());
        let b = carousel.create(100, 20, 64, 32, "b", Color::Blue).unwrap();
        assert!(b.is_focused());
        assert!(!a.is_focused());
        carousel.next();
        assert!(a.is_focused());
    }

    #[test]
    fn exactly_one_window_is_focused() {
        let carousel = testing::carousel();
        let windows: Vec<_> = (0..4)
            .map(|i| carousel.create(i * 80, 20, 64, 32, "w", Color::Red).unwrap())
            .collect();
        for step in 0..11 {
            if step % 3 == 0 {
                carousel.set_focus(&windows[step % 4]).unwrap();
            } else {
                carousel.next();
            }
            assert_eq!(windows.iter().filter(|w| w.is_focused()).count(), 1);
            assert_eq!(carousel.focused().map(|w| w.id()), carousel.focus().get());
        }
    }

    #[test]
    fn full_carousel_is_an_error() {
        let carousel = testing::carousel();
        for i in 0..MAX_WINDOWS as u32 {
            carousel.create(0, i * 40, 32, 16, "w", Color::Red).unwrap();
        }
        assert_eq!(carousel.create(0, 0, 32, 16, "extra", Color::Red).unwrap_err(), Error::CarouselFull);
        assert_eq!(carousel.len(), MAX_WINDOWS);
    }

    #[test]
    fn focus_marker_follows_focus() {
        let carousel = testing::carousel();
        let a = carousel.create(0, 20, 64, 32, "a", Color::Red).unwrap();
        let b = carousel.create(100, 20, 64, 32, "b", Color::Red).unwrap();
        let fb = carousel.display().lock();
        let (ax, ay) = a.frame().marker_center();
        let (bx, by) = b.frame().marker_center();
        assert_eq!(fb.pixel(ax, ay), Color::White);
        assert_eq!(fb.pixel(ax + 3, ay), Color::Black);
        assert_eq!(fb.pixel(bx, by), Color::Green);
    }

    #[test]
    fn destroying_the_focused_window_hands_focus_on() {
        let carousel = testing::carousel();
        let a = carousel.create(0, 20, 64, 32, "a", Color::Red).unwrap();
        let b = carousel.create(100, 20, 64, 32, "b", Color::Red).unwrap();
        let c = carousel.create(200, 20, 64, 32, "c", Color::Red).unwrap();
        carousel.set_focus(&b).unwrap();

        carousel.destroy(&b).unwrap();
        assert!(c.is_focused());
        assert_eq!(carousel.destroy(&b), Err(Error::UnknownWindow));
        assert!(carousel.display().lock().is_filled(b.frame().outer, Color::Black));

        carousel.destroy(&a).unwrap();
        assert!(c.is_focused());
        carousel.next();
        assert!(c.is_focused());

        carousel.destroy(&c).unwrap();
        assert!(carousel.focus().get().is_none());
        assert!(carousel.focused().is_none());
        carousel.next();
    }

    #[test]
    fn focused_window_agrees_with_window_focus() {
        let carousel = testing::carousel();
        assert!(carousel.focused().is_none());
        let a = carousel.create(0, 20, 64, 32, "a", Color::Red).unwrap();
        let b = carousel.create(100, 20, 64, 32, "b", Color::Red).unwrap();
        for _ in 0..3 {
            let focused = carousel.focused().unwrap();
            assert!(focused.is_focused());
            assert_eq!(Some(focused.id()), carousel.focus().get());
            carousel.next();
        }
        carousel.destroy(&a).unwrap();
        assert_eq!(carousel.focused().map(|w| w.id()), Some(b.id()));
        assert!(b.is_focused());
    }

    #[test]
    fn grid_accessors() {
        let carousel = testing::carousel();
        let w = carousel.create(0, 20, 80, 48, "g", Color::Red).unwrap();
        assert_eq!(carousel.rows(&w), 6);
        assert_eq!(carousel.cols(&w), 10);
        w.set_text_size(2);
        assert_eq!((carousel.rows(&w), carousel.cols(&w)), (3, 5));
    }
}
