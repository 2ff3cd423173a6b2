//! Top-level window system.
//!
//! [`WindowSystem`] ties the display, the keyboard, the scheduler and the
//! carousel together. Typical firmware flow:
//!
//! ```ignore
//! let mut system = WindowSystem::new(display, keyboard, scheduler, SystemConfig::default());
//! system.init_io();
//! system.create_task_with_window(shell, 0, 20, 300, 200, "Shell", Color::Green, None)?;
//! system.start();
//! ```

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;

use spin::Mutex;

use crate::carousel::Carousel;
use crate::color::Color;
use crate::config::{SystemConfig, MAX_WINDOWS};
use crate::drivers::{KeySource, PixelDriver, Rect};
use crate::error::Error;
use crate::infobar::InfoBar;
use crate::router::KeyRouter;
use crate::rtos::{self, Scheduler, TaskHandle, TaskSpec};
use crate::splash;
use crate::window::Window;

pub struct WindowSystem<D, K> {
    display: Arc<Mutex<D>>,
    keyboard: K,
    scheduler: Arc<dyn Scheduler>,
    carousel: Arc<Carousel<D>>,
    config: SystemConfig,
    tasks: heapless::Vec<TaskHandle, MAX_WINDOWS>,
}

impl<D, K> WindowSystem<D, K>
where
    D: PixelDriver + 'static,
    K: KeySource + 'static,
{
    /// Both drivers must be initialized before any window is created.
    pub fn new(display: D, keyboard: K, scheduler: Arc<dyn Scheduler>, config: SystemConfig) -> Self {
        let display = Arc::new(Mutex::new(display));
        let carousel = Arc::new(Carousel::new(display.clone(), scheduler.clone()));
        Self {
            display,
            keyboard,
            scheduler,
            carousel,
            config,
            tasks: heapless::Vec::new(),
        }
    }

    /// Show the splash screen (if enabled) and blank the display.
    pub fn init_io(&mut self) {
        if self.config.splash {
            splash::show(&self.display, &mut self.keyboard, &*self.scheduler, self.config.router_poll_ms);
        }
        let mut display = rtos::lock(&*self.display, &*self.scheduler);
        let screen = Rect::new(0, 0, display.width(), display.height());
        display.fill_rect(screen, Color::Black);
        log::info!("display {}x{} ready", screen.width, screen.height);
    }

    pub fn create_window(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        title: &str,
        border: Color,
    ) -> Result<Arc<Window<D>>, Error> {
        self.carousel.create(x, y, width, height, title, border)
    }

    /// Create a window and a task that receives it.
    ///
    /// `param` is attached to the window as user data before the task runs.
    /// If the task cannot be created the window is removed again.
    #[allow(clippy::too_many_arguments)]
    pub fn create_task_with_window<F>(
        &mut self,
        task: F,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        name: &str,
        border: Color,
        param: Option<Arc<dyn Any + Send + Sync>>,
    ) -> Result<Arc<Window<D>>, Error>
    where
        F: FnOnce(Arc<Window<D>>) + Send + 'static,
    {
        let window = self.carousel.create(x, y, width, height, name, border)?;
        if let Some(param) = param {
            window.set_user_data(param);
        }

        let spec = TaskSpec {
            name,
            stack_words: self.config.window_task_stack,
            priority: self.config.window_task_priority,
        };
        let handed = window.clone();
        let handle = match self.scheduler.spawn(spec, Box::new(move || task(handed))) {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("task {:?}: {}", name, e);
                self.carousel.destroy(&window)?;
                return Err(e);
            }
        };
        if self.tasks.push(handle).is_err() {
            log::warn!("task {:?} spawned but not tracked, handle list full", name);
        }
        Ok(window)
    }

    /// Handles of tasks created with [`WindowSystem::create_task_with_window`].
    pub fn tasks(&self) -> &[TaskHandle] {
        &self.tasks
    }

    pub fn next_window(&self) {
        self.carousel.next();
    }

    pub fn set_focus(&self, window: &Arc<Window<D>>) -> Result<(), Error> {
        self.carousel.set_focus(window)
    }

    pub fn task_yield(&self) {
        self.scheduler.yield_now();
    }

    pub fn delay(&self, ms: u32) {
        self.scheduler.delay_ms(ms);
    }

    pub fn carousel(&self) -> &Arc<Carousel<D>> {
        &self.carousel
    }

    pub fn display(&self) -> &Arc<Mutex<D>> {
        &self.display
    }

    pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
        &self.scheduler
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Spawn the router and the info bar, then hand the CPU to the
    /// scheduler. Returning from the scheduler is fatal.
    pub fn start(self) -> ! {
        let router = KeyRouter::new(
            self.carousel.clone(),
            self.keyboard,
            self.scheduler.clone(),
            self.config.router_poll_ms,
        );
        let spec = TaskSpec {
            name: "KeyScan",
            stack_words: self.config.router_stack,
            priority: self.config.service_priority,
        };
        if let Err(e) = self.scheduler.spawn(spec, Box::new(move || {
            router.run();
        })) {
            panic!("key router task: {}", e);
        }

        if self.config.infobar {
            let bar = InfoBar::new(self.display.clone(), self.scheduler.clone(), self.config.infobar_period_ms);
            let spec = TaskSpec {
                name: "InfoBar",
                stack_words: self.config.infobar_stack,
                priority: self.config.service_priority,
            };
            if let Err(e) = self.scheduler.spawn(spec, Box::new(move || {
                bar.run();
            })) {
                panic!("info bar task: {}", e);
            }
        }

        log::info!(
            "starting {} with {} windows, {} tasks",
            self.scheduler.kernel_name(),
            self.carousel.len(),
            self.tasks.len()
        );
        self.scheduler.start();
        panic!("RTOS kernel not running!");
    }
}
