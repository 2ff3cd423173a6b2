mod common;

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use orbita_wm::drivers::framebuffer::PackedFramebuffer;
use orbita_wm::drivers::scripted::{KeyFeed, ScriptedKeyboard};
use orbita_wm::drivers::Rect;
use orbita_wm::{Color, Error, SystemConfig, WindowSystem};

use common::ThreadScheduler;

fn system(feed: &KeyFeed, scheduler: ThreadScheduler) -> WindowSystem<PackedFramebuffer, ScriptedKeyboard> {
    let config = SystemConfig {
        splash: false,
        router_poll_ms: 1,
        ..SystemConfig::default()
    };
    WindowSystem::new(PackedFramebuffer::new(640, 480), feed.keyboard(), Arc::new(scheduler), config)
}

#[test]
fn splash_waits_for_a_key_then_clears() {
    let feed = KeyFeed::new();
    let config = SystemConfig {
        router_poll_ms: 1,
        ..SystemConfig::default()
    };
    let mut system = WindowSystem::new(
        PackedFramebuffer::new(640, 480),
        feed.keyboard(),
        Arc::new(ThreadScheduler::default()),
        config,
    );
    feed.push(b' ');
    system.init_io();
    assert_eq!(feed.pending(), 0);
    assert!(system.display().lock().is_filled(Rect::new(0, 0, 640, 480), Color::Black));
}

#[test]
fn task_receives_its_window_and_parameter() {
    let feed = KeyFeed::new();
    let mut system = system(&feed, ThreadScheduler::default());
    let (tx, rx) = mpsc::channel();

    let window = system
        .create_task_with_window(
            move |w| {
                let limit = w.user_data::<u32>().map(|v| *v);
                tx.send((w.title().to_string(), limit)).unwrap();
            },
            20,
            20,
            160,
            80,
            "Worker",
            Color::Cyan,
            Some(Arc::new(42u32)),
        )
        .unwrap();

    let (title, limit) = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(title, "Worker");
    assert_eq!(limit, Some(42));
    assert!(window.is_focused());
    assert_eq!(system.tasks().len(), 1);
}

#[test]
fn refused_task_leaves_no_window_behind() {
    let feed = KeyFeed::new();
    let mut system = system(&feed, ThreadScheduler::refusing());
    let result = system.create_task_with_window(|_| {}, 0, 20, 64, 32, "nope", Color::Red, None);
    assert_eq!(result.unwrap_err(), Error::SpawnFailed);
    assert!(system.carousel().is_empty());
    assert!(system.tasks().is_empty());
}

#[test]
fn window_tasks_share_one_keyboard() {
    let feed = KeyFeed::new();
    let mut system = system(&feed, ThreadScheduler::default());
    let (tx, rx) = mpsc::channel();

    for (name, x) in [("left", 0), ("right", 320)] {
        let tx = tx.clone();
        system
            .create_task_with_window(
                move |w| {
                    let line = w.read_line();
                    tx.send((w.title().to_string(), line)).unwrap();
                },
                x,
                20,
                200,
                80,
                name,
                Color::Green,
                None,
            )
            .unwrap();
    }

    let windows = system.carousel().windows();
    let runner = std::thread::spawn(move || {
        system.start();
    });

    // "right" was created last and holds focus.
    feed.push_str("one\r");
    assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap(), ("right".to_string(), "one".to_string()));
    feed.push(orbita_wm::keys::FOCUS_SWITCH);
    assert!(common::wait_for(|| windows[0].is_focused()));
    feed.push_str("two\r");
    assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap(), ("left".to_string(), "two".to_string()));

    // start() returns from the host scheduler and panics.
    let outcome = runner.join();
    assert!(outcome.is_err());
}

#[test]
#[should_panic(expected = "RTOS kernel not running!")]
fn returning_scheduler_is_fatal() {
    let feed = KeyFeed::new();
    system(&feed, ThreadScheduler::default()).start();
}
