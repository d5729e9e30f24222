use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::subscription::Subscription;
use super::traits::{Observable, Observer};
use super::types::{Completion, StreamError};

type Observers<T> = Vec<(u64, Arc<dyn Observer<T>>)>;

struct SubjectState<T> {
    observers: Observers<T>,
    next_id: u64,
    completion: Option<Completion>,
}

/// Multicast hot source.
///
/// Values pushed through the `Observer` side are delivered to every observer
/// attached at that moment. Delivery happens on the pushing thread, outside the
/// subject's lock, so observers may subscribe or unsubscribe while being called.
/// After completion, values are ignored and late subscribers receive the
/// completion immediately.
pub struct Subject<T> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for Subject<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subject<T>
where
    T: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                observers: Vec::new(),
                next_id: 0,
                completion: None,
            })),
        }
    }

    /// Number of currently attached observers.
    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    pub fn is_completed(&self) -> bool {
        self.lock().completion.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, SubjectState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> Option<Vec<Arc<dyn Observer<T>>>> {
        let state = self.lock();
        if state.completion.is_some() {
            return None;
        }
        Some(state.observers.iter().map(|(_, o)| Arc::clone(o)).collect())
    }

    fn remove(state: &Weak<Mutex<SubjectState<T>>>, id: u64) {
        if let Some(state) = state.upgrade() {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            state.observers.retain(|(observer_id, _)| *observer_id != id);
        }
    }
}

impl<T> Observable<T> for Subject<T>
where
    T: Clone + Send + 'static,
{
    fn subscribe(&self, observer: Arc<dyn Observer<T>>) -> Subscription {
        let mut state = self.lock();
        if let Some(completion) = state.completion.clone() {
            drop(state);
            observer.on_completed(completion);
            return Subscription::empty();
        }

        let id = state.next_id;
        state.next_id += 1;
        state.observers.push((id, observer));
        drop(state);

        let weak = Arc::downgrade(&self.state);
        Subscription::from_fn(move || Self::remove(&weak, id))
    }
}

impl<T> Observer<T> for Subject<T>
where
    T: Clone + Send + 'static,
{
    fn on_next(&self, value: T) {
        if let Some(observers) = self.snapshot() {
            for observer in observers {
                observer.on_next(value.clone());
            }
        }
    }

    fn on_error_resume(&self, error: StreamError) {
        if let Some(observers) = self.snapshot() {
            for observer in observers {
                observer.on_error_resume(error.clone());
            }
        }
    }

    fn on_completed(&self, completion: Completion) {
        let observers = {
            let mut state = self.lock();
            if state.completion.is_some() {
                return;
            }
            state.completion = Some(completion.clone());
            std::mem::take(&mut state.observers)
        };
        for (_, observer) in observers {
            observer.on_completed(completion.clone());
        }
    }
}
