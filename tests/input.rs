mod common;

use std::sync::Arc;
use std::thread;

use orbita_wm::config::KEY_BUF_LEN;
use orbita_wm::drivers::framebuffer::PackedFramebuffer;
use orbita_wm::drivers::scripted::KeyFeed;
use orbita_wm::{keys, Carousel, Color, KeyRouter, ScanValue};

fn spawn_router(carousel: &Arc<Carousel<PackedFramebuffer>>, feed: &KeyFeed) {
    let router = KeyRouter::new(carousel.clone(), feed.keyboard(), common::scheduler(), 1);
    thread::spawn(move || {
        router.run();
    });
}

#[test]
fn read_line_through_the_router() {
    let carousel = common::carousel();
    let feed = KeyFeed::new();
    let w = carousel.create(10, 20, 200, 80, "shell", Color::Green).unwrap();
    spawn_router(&carousel, &feed);

    feed.push_str("abc");
    feed.push(keys::BACKSPACE);
    feed.push(b'd');
    feed.push(keys::ENTER);
    assert_eq!(w.read_line(), "abd");
    assert_eq!(w.cursor(), (1, 0));
}

#[test]
fn keys_arrive_in_order() {
    let carousel = common::carousel();
    let feed = KeyFeed::new();
    let w = carousel.create(10, 20, 200, 80, "fifo", Color::Green).unwrap();
    spawn_router(&carousel, &feed);

    feed.push_str("hello");
    let got: Vec<u8> = (0..5).map(|_| w.getchar()).collect();
    assert_eq!(got, b"hello");
}

#[test]
fn saturated_buffer_keeps_the_first_keys() {
    let carousel = common::carousel();
    let feed = KeyFeed::new();
    let w = carousel.create(10, 20, 200, 80, "full", Color::Green).unwrap();
    let text: String = (0..KEY_BUF_LEN + 10).map(|i| (b'a' + (i % 26) as u8) as char).collect();
    feed.push_str(&text);
    spawn_router(&carousel, &feed);

    assert!(common::wait_for(|| feed.pending() == 0));
    assert_eq!(w.pending_keys(), KEY_BUF_LEN);
    let drained: String = (0..KEY_BUF_LEN).map(|_| w.getchar() as char).collect();
    assert_eq!(drained, text[..KEY_BUF_LEN]);
    assert_eq!(w.pending_keys(), 0);
}

#[test]
fn hotkey_wraps_focus_between_two_windows() {
    let carousel = common::carousel();
    let feed = KeyFeed::new();
    let a = carousel.create(10, 20, 100, 60, "A", Color::Red).unwrap();
    assert!(a.is_focused());
    let b = carousel.create(200, 20, 100, 60, "B", Color::Blue).unwrap();
    assert!(b.is_focused());
    spawn_router(&carousel, &feed);

    feed.push(keys::FOCUS_SWITCH);
    assert!(common::wait_for(|| a.is_focused()));
    assert!(!b.is_focused());

    feed.push(b'x');
    assert_eq!(a.getchar(), b'x');
    assert_eq!(b.pending_keys(), 0);
}

#[test]
fn scanf_reprompts_on_a_short_line() {
    let carousel = common::carousel();
    let feed = KeyFeed::new();
    let w = carousel.create(10, 20, 240, 80, "calc", Color::Yellow).unwrap();
    spawn_router(&carousel, &feed);

    feed.push_str("5\r");
    let reader = {
        let w = w.clone();
        thread::spawn(move || w.scanf("%d %d"))
    };
    // The first line alone must not satisfy the read.
    assert!(common::wait_for(|| w.cursor().0 >= 2));
    assert!(!reader.is_finished());

    feed.push_str("5 7\r");
    let values = reader.join().unwrap();
    assert_eq!(values, [ScanValue::Int(5), ScanValue::Int(7)]);
}

#[test]
fn echoed_scan_reads_the_raw_buffer() {
    let carousel = common::carousel();
    let feed = KeyFeed::new();
    let w = carousel.create(10, 20, 240, 80, "raw", Color::Yellow).unwrap();
    spawn_router(&carousel, &feed);

    let reader = {
        let w = w.clone();
        thread::spawn(move || w.scan_echoed("%s %x"))
    };
    feed.push_str("id ff\r");
    let values = reader.join().unwrap();
    assert_eq!(values[0].as_str(), Some("id"));
    assert_eq!(values[1].as_u64(), Some(255));
    assert_eq!(w.cursor(), (1, 0));
    assert_eq!(w.pending_keys(), 0);
}

#[test]
fn arrow_keys_stay_inside_the_line() {
    let carousel = common::carousel();
    let feed = KeyFeed::new();
    let w = carousel.create(10, 20, 200, 80, "edit", Color::Green).unwrap();
    spawn_router(&carousel, &feed);

    feed.push_str("ab");
    feed.push(keys::DOWN_ARROW);
    feed.push(b'c');
    feed.push(keys::LEFT_ARROW);
    feed.push_str("d\r");
    assert_eq!(w.read_line(), "abcd");
    assert_eq!(w.cursor(), (1, 0));
}
