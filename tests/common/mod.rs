#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use orbita_wm::drivers::framebuffer::PackedFramebuffer;
use orbita_wm::rtos::{Scheduler, TaskEntry, TaskHandle, TaskSpec};
use orbita_wm::{Carousel, Error};
use spin::Mutex;

/// Runs every task on its own host thread.
#[derive(Default)]
pub struct ThreadScheduler {
    spawned: AtomicUsize,
    pub refuse_spawn: bool,
}

impl ThreadScheduler {
    /// A scheduler whose every spawn fails.
    pub fn refusing() -> Self {
        Self {
            refuse_spawn: true,
            ..Self::default()
        }
    }
}

impl Scheduler for ThreadScheduler {
    fn spawn(&self, spec: TaskSpec<'_>, entry: TaskEntry) -> Result<TaskHandle, Error> {
        if self.refuse_spawn {
            return Err(Error::SpawnFailed);
        }
        std::thread::Builder::new()
            .name(spec.name.into())
            .spawn(entry)
            .map_err(|_| Error::SpawnFailed)?;
        Ok(TaskHandle(self.spawned.fetch_add(1, Ordering::SeqCst)))
    }

    fn yield_now(&self) {
        std::thread::yield_now();
    }

    fn delay_ms(&self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms.into()));
    }

    /// Host threads are already running; returns at once.
    fn start(&self) {}

    fn free_heap_bytes(&self) -> Option<usize> {
        Some(64_000)
    }

    fn kernel_name(&self) -> &str {
        "host threads"
    }
}

pub fn scheduler() -> Arc<dyn Scheduler> {
    Arc::new(ThreadScheduler::default())
}

pub fn carousel() -> Arc<Carousel<PackedFramebuffer>> {
    let display = Arc::new(Mutex::new(PackedFramebuffer::new(640, 480)));
    Arc::new(Carousel::new(display, scheduler()))
}

/// Poll `cond` until it holds or a second passes.
pub fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(1);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    cond()
}
