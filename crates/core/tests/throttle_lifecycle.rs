//! Throttle lifecycle integration tests.
//!
//! These tests drive `throttle_latest_frame` end to end:
//! manual frames, concurrent producer and frame threads, and timer frames
//! consumed through the stream bridge.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use futures::StreamExt;

use framethrottle_core::{
    testing::{fixtures, RecordingObserver},
    Completion, ManualFrameProvider, Notification, Observable, ObservableExt, Observer, Subject,
    TimerFrameProvider,
};

#[test]
fn test_three_frame_window_emits_first_and_latest() {
    let fixture = fixtures::throttled_subject::<&'static str>(3);

    fixture.source.on_next("A");
    assert_eq!(fixture.observer.values(), vec!["A"]);

    fixture.frames.advance();
    fixture.source.on_next("B");
    fixture.source.on_next("C");
    fixture.frames.advance();
    assert_eq!(fixture.observer.values(), vec!["A"]);

    fixture.frames.advance();
    assert_eq!(fixture.observer.values(), vec!["A", "C"]);
}

#[test]
fn test_consecutive_windows() {
    let fixture = fixtures::throttled_subject::<u32>(2);

    for window in 0..4u32 {
        let base = window * 10;
        fixture.source.on_next(base);
        fixture.source.on_next(base + 1);
        fixture.source.on_next(base + 2);
        fixture.frames.advance_by(2);
    }

    assert_eq!(
        fixture.observer.values(),
        vec![0, 2, 10, 12, 20, 22, 30, 32]
    );
    assert_eq!(fixture.frames.pending_work(), 0);
}

#[test]
fn test_independent_subscriptions_have_independent_windows() {
    let source: Subject<u32> = Subject::new();
    let frames = Arc::new(ManualFrameProvider::new());
    let throttled = source.clone().throttle_latest_frame(2, frames.clone());

    let early = RecordingObserver::<u32>::new();
    let late = RecordingObserver::<u32>::new();
    throttled.subscribe(early.clone());

    source.on_next(1);
    throttled.subscribe(late.clone());
    source.on_next(2);
    frames.advance_by(2);

    assert_eq!(early.values(), vec![1, 2]);
    assert_eq!(late.values(), vec![2]);
}

#[test]
fn test_concurrent_producer_and_frames_preserve_order() {
    const VALUES: u32 = 5_000;

    let fixture = fixtures::throttled_subject::<u32>(3);
    let source = fixture.source.clone();
    let frames = Arc::clone(&fixture.frames);

    let producer = thread::spawn(move || {
        for value in 0..VALUES {
            source.on_next(value);
            if value % 64 == 0 {
                thread::yield_now();
            }
        }
    });
    let ticker = thread::spawn(move || {
        for _ in 0..2_000 {
            frames.advance();
            thread::yield_now();
        }
    });

    producer.join().unwrap();
    ticker.join().unwrap();
    fixture.frames.advance_by(3);

    let values = fixture.observer.values();
    assert_eq!(values.first(), Some(&0));
    assert_eq!(values.last(), Some(&(VALUES - 1)));
    assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(fixture.frames.pending_work(), 0);
}

#[tokio::test]
async fn test_timer_frames_through_stream() {
    let frames = Arc::new(TimerFrameProvider::from_millis(2).unwrap());
    let source: Subject<u32> = Subject::new();
    let stream = source
        .clone()
        .throttle_latest_frame(3, frames.clone())
        .into_stream();

    frames.start().unwrap();

    for value in 0..5 {
        source.on_next(value);
    }
    tokio::time::sleep(Duration::from_millis(100)).await;
    source.on_completed(Completion::Success);

    let notifications: Vec<Notification<u32>> = stream.collect().await;
    frames.stop().await;

    let values: Vec<u32> = notifications
        .iter()
        .filter_map(|n| n.value().copied())
        .collect();
    assert_eq!(values, vec![0, 4]);
    assert!(notifications.last().unwrap().is_completed());
    assert_eq!(frames.pending_work(), 0);
}
