//! Push-based sequence primitives.
//!
//! A minimal observer/observable pipeline: a multicast `Subject`, disposable
//! `Subscription` handles, and a bridge into `futures::Stream`. Operators
//! such as `throttle_latest_frame` attach through `ObservableExt`.

mod ext;
mod stream;
mod subject;
mod subscription;
mod traits;
mod types;

pub use ext::ObservableExt;
pub use stream::ObservableStream;
pub use subject::Subject;
pub use subscription::Subscription;
pub use traits::{Disposable, Observable, Observer};
pub use types::{Completion, Notification, StreamError};
