use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::traits::Disposable;

type DisposeAction = Box<dyn FnOnce() + Send>;

struct SubscriptionInner {
    disposed: AtomicBool,
    action: Mutex<Option<DisposeAction>>,
}

/// Handle controlling an attached observer.
///
/// Cheaply cloneable; every clone refers to the same underlying subscription.
/// Disposing is idempotent: the teardown action runs at most once.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl Subscription {
    /// A subscription with nothing to tear down.
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(SubscriptionInner {
                disposed: AtomicBool::new(false),
                action: Mutex::new(None),
            }),
        }
    }

    /// A subscription running `action` on first dispose.
    pub fn from_fn<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            inner: Arc::new(SubscriptionInner {
                disposed: AtomicBool::new(false),
                action: Mutex::new(Some(Box::new(action))),
            }),
        }
    }

    /// A subscription disposing `disposable` on first dispose.
    pub fn new(disposable: Arc<dyn Disposable>) -> Self {
        Self::from_fn(move || disposable.dispose())
    }

    /// A subscription disposing every subscription in `subscriptions`, in order.
    pub fn combine(subscriptions: impl IntoIterator<Item = Subscription>) -> Self {
        let subscriptions: Vec<Subscription> = subscriptions.into_iter().collect();
        Self::from_fn(move || {
            for subscription in subscriptions {
                subscription.dispose();
            }
        })
    }

    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let action = self
            .inner
            .action
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(action) = action {
            action();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }
}

impl Disposable for Subscription {
    fn dispose(&self) {
        Subscription::dispose(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_dispose_runs_action_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = Subscription::from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!subscription.is_disposed());
        subscription.dispose();
        subscription.clone().dispose();

        assert!(subscription.is_disposed());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_subscription() {
        let subscription = Subscription::empty();
        subscription.dispose();
        assert!(subscription.is_disposed());
    }

    #[test]
    fn test_combine_disposes_all() {
        let first = Subscription::empty();
        let second = Subscription::empty();
        let combined = Subscription::combine([first.clone(), second.clone()]);

        combined.dispose();

        assert!(first.is_disposed());
        assert!(second.is_disposed());
    }
}
