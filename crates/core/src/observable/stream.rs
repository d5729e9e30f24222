//! Bridge from the push world into a `futures::Stream`.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Stream, StreamExt};

use super::subscription::Subscription;
use super::traits::{Observable, Observer};
use super::types::{Completion, Notification, StreamError};

struct ChannelObserver<T> {
    tx: UnboundedSender<Notification<T>>,
}

impl<T> ChannelObserver<T> {
    fn send(&self, notification: Notification<T>) {
        // Receiver gone means the stream was dropped; the subscription is
        // being torn down anyway.
        let _ = self.tx.unbounded_send(notification);
    }
}

impl<T: Send> Observer<T> for ChannelObserver<T> {
    fn on_next(&self, value: T) {
        self.send(Notification::Next(value));
    }

    fn on_error_resume(&self, error: StreamError) {
        self.send(Notification::ErrorResume(error));
    }

    fn on_completed(&self, completion: Completion) {
        self.send(Notification::Completed(completion));
        self.tx.close_channel();
    }
}

/// Stream of notifications from a subscribed observable.
///
/// Yields every notification, ends right after `Notification::Completed`,
/// and disposes the underlying subscription when finished or dropped.
pub struct ObservableStream<T> {
    receiver: UnboundedReceiver<Notification<T>>,
    subscription: Subscription,
    finished: bool,
}

impl<T> ObservableStream<T>
where
    T: Send + 'static,
{
    pub fn new<O>(source: &O) -> Self
    where
        O: Observable<T> + ?Sized,
    {
        let (tx, receiver) = mpsc::unbounded();
        let observer: Arc<dyn Observer<T>> = Arc::new(ChannelObserver { tx });
        let subscription = source.subscribe(observer);
        Self {
            receiver,
            subscription,
            finished: false,
        }
    }

    /// Subscription backing this stream.
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl<T> Stream for ObservableStream<T> {
    type Item = Notification<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }
        match self.receiver.poll_next_unpin(cx) {
            Poll::Ready(Some(notification)) => {
                if notification.is_completed() {
                    self.finished = true;
                    self.subscription.dispose();
                }
                Poll::Ready(Some(notification))
            }
            Poll::Ready(None) => {
                self.finished = true;
                self.subscription.dispose();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for ObservableStream<T> {
    fn drop(&mut self) {
        self.subscription.dispose();
    }
}
