//! Testing utilities for observable pipelines.
//!
//! # Example
//!
//! ```rust,ignore
//! use framethrottle_core::testing::fixtures;
//!
//! let fixture = fixtures::throttled_subject::<u32>(3);
//! fixture.source.on_next(1);
//! fixture.frames.advance_by(3);
//! assert_eq!(fixture.observer.values(), vec![1]);
//! ```

mod recording_observer;

pub use recording_observer::RecordingObserver;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::sync::Arc;

    use super::RecordingObserver;
    use crate::frame::ManualFrameProvider;
    use crate::observable::{Observable, ObservableExt, Subject, Subscription};

    /// A subject throttled over a manual frame provider, with a recorder attached.
    pub struct ThrottleFixture<T> {
        pub source: Subject<T>,
        pub frames: Arc<ManualFrameProvider>,
        pub observer: Arc<RecordingObserver<T>>,
        pub subscription: Subscription,
    }

    /// Build a `ThrottleFixture` with windows of `frame_count` frames.
    pub fn throttled_subject<T>(frame_count: i64) -> ThrottleFixture<T>
    where
        T: Clone + Send + 'static,
    {
        let source: Subject<T> = Subject::new();
        let frames = Arc::new(ManualFrameProvider::new());
        let observer = RecordingObserver::<T>::new();
        let subscription = source
            .clone()
            .throttle_latest_frame(frame_count, frames.clone())
            .subscribe(observer.clone());
        ThrottleFixture {
            source,
            frames,
            observer,
            subscription,
        }
    }
}
