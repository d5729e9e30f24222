//! Operators over `Observable`s.

mod throttle_latest_frame;

pub use throttle_latest_frame::ThrottleLatestFrame;
