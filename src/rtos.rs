//! Scheduler contract.
//!
//! The window system runs on a preemptive priority scheduler it does not
//! own. Firmware implements [`Scheduler`] over the RTOS kernel; the test
//! suite implements it over host threads.

use alloc::boxed::Box;

use spin::{Mutex, MutexGuard};

use crate::error::Error;

/// Body of a task. Captured state plays the role of the task parameter.
pub type TaskEntry = Box<dyn FnOnce() + Send + 'static>;

/// Identifier handed back by [`Scheduler::spawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle(pub usize);

/// Creation parameters of a task.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec<'a> {
    pub name: &'a str,
    /// Stack budget in words.
    pub stack_words: usize,
    /// Higher runs first.
    pub priority: u8,
}

pub trait Scheduler: Send + Sync {
    fn spawn(&self, spec: TaskSpec<'_>, entry: TaskEntry) -> Result<TaskHandle, Error>;

    /// Let other ready tasks run.
    fn yield_now(&self);

    /// Block the calling task for at least `ms` milliseconds.
    fn delay_ms(&self, ms: u32);

    /// Start scheduling. Under normal operation this never returns.
    fn start(&self);

    /// Called while a lock the caller wants is held by another task.
    /// Must block the caller long enough for a lower-priority holder to
    /// run; a plain yield only reaches tasks of equal priority.
    fn back_off(&self) {
        self.delay_ms(1);
    }

    /// Unallocated heap, if the allocator can tell.
    fn free_heap_bytes(&self) -> Option<usize> {
        None
    }

    /// Kernel name and version shown on the splash screen.
    fn kernel_name(&self) -> &str {
        "RTOS"
    }
}

/// Take `mutex` without spinning on it. While another task holds the lock
/// the caller backs off through the scheduler, so a preempted holder gets
/// the CPU back and can release it.
pub fn lock<'a, T: ?Sized>(mutex: &'a Mutex<T>, scheduler: &dyn Scheduler) -> MutexGuard<'a, T> {
    loop {
        if let Some(guard) = mutex.try_lock() {
            return guard;
        }
        scheduler.back_off();
    }
}
