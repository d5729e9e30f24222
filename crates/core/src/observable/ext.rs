use std::sync::Arc;

use crate::frame::FrameProvider;
use crate::operators::ThrottleLatestFrame;

use super::stream::ObservableStream;
use super::traits::Observable;

/// Operator chaining for any observable.
pub trait ObservableExt<T>: Observable<T> + Sized + 'static
where
    T: Send + 'static,
{
    /// Emit the first value of each window immediately and the latest value
    /// seen during the window once `frame_count` frames have elapsed.
    ///
    /// Non-positive `frame_count` values are treated as 1.
    fn throttle_latest_frame(
        self,
        frame_count: i64,
        frame_provider: Arc<dyn FrameProvider>,
    ) -> ThrottleLatestFrame<T> {
        ThrottleLatestFrame::new(self, frame_count, frame_provider)
    }

    /// Subscribe and expose the notifications as a `futures::Stream`.
    fn into_stream(&self) -> ObservableStream<T> {
        ObservableStream::new(self)
    }
}

impl<T, O> ObservableExt<T> for O
where
    T: Send + 'static,
    O: Observable<T> + 'static,
{
}
