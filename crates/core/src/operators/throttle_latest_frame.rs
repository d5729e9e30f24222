//! Frame-based latest-value throttling.
//!
//! The first value after a quiet period is forwarded immediately and opens a
//! window lasting `frame_count` frames. Values arriving while the window is
//! open overwrite each other; the survivor is forwarded on the frame that
//! closes the window. A window that saw no further values closes silently.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError, Weak};

use tracing::trace;

use crate::frame::{normalize_frame_count, FrameProvider, FrameWorkItem};
use crate::metrics;
use crate::observable::{Completion, Disposable, Observable, Observer, StreamError, Subscription};

/// Observable produced by `ObservableExt::throttle_latest_frame`.
pub struct ThrottleLatestFrame<T> {
    source: Arc<dyn Observable<T>>,
    frame_count: usize,
    frame_provider: Arc<dyn FrameProvider>,
}

impl<T> ThrottleLatestFrame<T>
where
    T: Send + 'static,
{
    /// Throttle `source` to windows of `frame_count` frames of `frame_provider`.
    ///
    /// Non-positive `frame_count` values are treated as 1.
    pub fn new<O>(source: O, frame_count: i64, frame_provider: Arc<dyn FrameProvider>) -> Self
    where
        O: Observable<T> + 'static,
    {
        Self {
            source: Arc::new(source),
            frame_count: normalize_frame_count(frame_count),
            frame_provider,
        }
    }

    /// Window length in frames, after normalization.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }
}

impl<T> Observable<T> for ThrottleLatestFrame<T>
where
    T: Send + 'static,
{
    fn subscribe(&self, observer: Arc<dyn Observer<T>>) -> Subscription {
        let throttle = ThrottleLatestFrameObserver::new(
            observer,
            self.frame_count,
            Arc::clone(&self.frame_provider),
        );
        let upstream = self.source.subscribe(throttle.clone());
        Subscription::combine([upstream, Subscription::new(throttle)])
    }
}

/// Window state, only touched under `ThrottleLatestFrameObserver::gate`.
struct WindowState<T> {
    /// Latest value seen while the window is open, not yet forwarded.
    pending: Option<T>,
    /// Frames observed since the window opened.
    tick_count: usize,
    /// Whether a window is open, which is also whether we are registered
    /// with the frame provider.
    window_open: bool,
}

struct ThrottleLatestFrameObserver<T> {
    observer: Arc<dyn Observer<T>>,
    frame_provider: Arc<dyn FrameProvider>,
    frame_count: usize,
    gate: Mutex<WindowState<T>>,
    disposed: AtomicBool,
    this: Weak<Self>,
}

impl<T> ThrottleLatestFrameObserver<T>
where
    T: Send + 'static,
{
    fn new(
        observer: Arc<dyn Observer<T>>,
        frame_count: usize,
        frame_provider: Arc<dyn FrameProvider>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            observer,
            frame_provider,
            frame_count,
            gate: Mutex::new(WindowState {
                pending: None,
                tick_count: 0,
                window_open: false,
            }),
            disposed: AtomicBool::new(false),
            this: this.clone(),
        })
    }

    fn gate(&self) -> MutexGuard<'_, WindowState<T>> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Mark disposed and release the pending value. Returns `false` if
    /// already disposed.
    fn terminate(&self, reason: &'static str) -> bool {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return false;
        }

        // Dispose may be called by the downstream observer from inside an
        // emission, while this thread already holds the gate. In that case
        // the pending value is released when the frame provider and the
        // upstream drop their references.
        let pending = match self.gate.try_lock() {
            Ok(mut state) => state.pending.take(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().pending.take(),
            Err(TryLockError::WouldBlock) => None,
        };
        if pending.is_some() {
            metrics::THROTTLE_VALUES_DROPPED
                .with_label_values(&[reason])
                .inc();
        }
        true
    }
}

impl<T> Observer<T> for ThrottleLatestFrameObserver<T>
where
    T: Send + 'static,
{
    fn on_next(&self, value: T) {
        if self.is_disposed() {
            return;
        }

        let mut state = self.gate();
        if !state.window_open {
            state.window_open = true;
            state.tick_count = 0;
            if let Some(this) = self.this.upgrade() {
                self.frame_provider.register(this);
            }
            metrics::THROTTLE_WINDOWS_OPENED.inc();
            metrics::THROTTLE_VALUES_EMITTED
                .with_label_values(&["window_open"])
                .inc();
            trace!(
                frame = self.frame_provider.frame_count(),
                frame_count = self.frame_count,
                "Throttle window opened"
            );
            // Emitting under the gate keeps the opening value ahead of any
            // frame racing to close the window.
            self.observer.on_next(value);
        } else if state.pending.replace(value).is_some() {
            metrics::THROTTLE_VALUES_DROPPED
                .with_label_values(&["overwritten"])
                .inc();
        }
    }

    fn on_error_resume(&self, error: StreamError) {
        if self.is_disposed() {
            return;
        }
        self.observer.on_error_resume(error);
    }

    fn on_completed(&self, completion: Completion) {
        // Disposed before forwarding; a frame that takes the gate after this
        // point drops the pending value instead of flushing it.
        if !self.terminate("completed") {
            return;
        }
        self.observer.on_completed(completion);
    }
}

impl<T> FrameWorkItem for ThrottleLatestFrameObserver<T>
where
    T: Send + 'static,
{
    fn move_next(&self, frame: u64) -> bool {
        let mut state = self.gate();
        if self.is_disposed() {
            // Termination skips the pending value when it finds the gate held.
            if state.pending.take().is_some() {
                metrics::THROTTLE_VALUES_DROPPED
                    .with_label_values(&["disposed"])
                    .inc();
            }
            state.window_open = false;
            return false;
        }

        state.tick_count += 1;
        if state.tick_count < self.frame_count {
            return true;
        }

        let flushed = state.pending.take();
        let emitted = flushed.is_some();
        if let Some(value) = flushed {
            metrics::THROTTLE_VALUES_EMITTED
                .with_label_values(&["window_close"])
                .inc();
            self.observer.on_next(value);
        }
        state.window_open = false;
        trace!(frame, emitted, "Throttle window closed");
        false
    }
}

impl<T> Disposable for ThrottleLatestFrameObserver<T>
where
    T: Send + 'static,
{
    fn dispose(&self) {
        self.terminate("disposed");
    }
}
