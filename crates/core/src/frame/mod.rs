//! Frame (tick) sources.
//!
//! A `FrameProvider` calls registered `FrameWorkItem`s once per frame until
//! they ask to stop. Two providers are available:
//! - `ManualFrameProvider`: frames advance only when told to (tests, game loops
//!   that already own their tick)
//! - `TimerFrameProvider`: frames advance on a tokio interval

mod manual;
mod runner;
mod timer;
mod traits;

pub use manual::ManualFrameProvider;
pub use runner::FrameRunner;
pub use timer::TimerFrameProvider;
pub use traits::{normalize_frame_count, FrameProvider, FrameWorkItem};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameProviderError {
    #[error("Frame provider is already running")]
    AlreadyRunning,

    #[error("Invalid frame interval: {0}")]
    InvalidInterval(String),
}
