use std::sync::Arc;

use super::subscription::Subscription;
use super::types::{Completion, StreamError};

/// Receiver side of a push-based sequence.
///
/// Callbacks may arrive on any thread. Implementations must not synchronously
/// push back into the subscription that is currently calling them.
pub trait Observer<T>: Send + Sync {
    /// A value arrived.
    fn on_next(&self, value: T);

    /// A recoverable error arrived. The sequence continues.
    fn on_error_resume(&self, error: StreamError);

    /// The sequence terminated.
    fn on_completed(&self, completion: Completion);
}

/// Source side of a push-based sequence.
pub trait Observable<T>: Send + Sync {
    /// Attach an observer. Disposing the returned subscription detaches it.
    fn subscribe(&self, observer: Arc<dyn Observer<T>>) -> Subscription;
}

/// Something that can be torn down once.
pub trait Disposable: Send + Sync {
    fn dispose(&self);
}

impl<T, O> Observable<T> for Arc<O>
where
    O: Observable<T> + ?Sized,
{
    fn subscribe(&self, observer: Arc<dyn Observer<T>>) -> Subscription {
        (**self).subscribe(observer)
    }
}
