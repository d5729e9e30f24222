//! Observer recording every notification for assertions.

use std::sync::{Arc, Mutex};

use crate::observable::{Completion, Notification, Observer, StreamError};

/// Observer that records everything it receives.
///
/// # Example
///
/// ```rust,ignore
/// let observer = RecordingObserver::<u32>::new();
/// subject.subscribe(observer.clone());
/// subject.on_next(1);
/// assert_eq!(observer.values(), vec![1]);
/// ```
pub struct RecordingObserver<T> {
    notifications: Mutex<Vec<Notification<T>>>,
}

impl<T> std::fmt::Debug for RecordingObserver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingObserver")
            .field("notifications", &self.notifications.lock().unwrap().len())
            .finish()
    }
}

impl<T> RecordingObserver<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            notifications: Mutex::new(Vec::new()),
        })
    }

    /// Errors received through `on_error_resume`.
    pub fn errors(&self) -> Vec<StreamError> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter_map(|n| match n {
                Notification::ErrorResume(e) => Some(e.clone()),
                _ => None,
            })
            .collect()
    }

    /// Completions received. More than one means the source misbehaved.
    pub fn completions(&self) -> Vec<Completion> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter_map(|n| match n {
                Notification::Completed(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn is_completed(&self) -> bool {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .any(Notification::is_completed)
    }

    /// Number of notifications received.
    pub fn len(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.notifications.lock().unwrap().clear();
    }
}

impl<T: Clone> RecordingObserver<T> {
    /// Values received through `on_next`, in order.
    pub fn values(&self) -> Vec<T> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter_map(|n| n.value().cloned())
            .collect()
    }

    /// Every notification received, in order.
    pub fn notifications(&self) -> Vec<Notification<T>> {
        self.notifications.lock().unwrap().clone()
    }
}

impl<T: Send> Observer<T> for RecordingObserver<T> {
    fn on_next(&self, value: T) {
        self.notifications
            .lock()
            .unwrap()
            .push(Notification::Next(value));
    }

    fn on_error_resume(&self, error: StreamError) {
        self.notifications
            .lock()
            .unwrap()
            .push(Notification::ErrorResume(error));
    }

    fn on_completed(&self, completion: Completion) {
        self.notifications
            .lock()
            .unwrap()
            .push(Notification::Completed(completion));
    }
}
