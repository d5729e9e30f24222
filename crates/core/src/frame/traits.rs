use std::sync::Arc;

/// Unit of work run once per frame.
pub trait FrameWorkItem: Send + Sync {
    /// Called with the index of the current frame.
    ///
    /// Return `true` to be called again on the next frame, `false` to be
    /// unregistered.
    fn move_next(&self, frame: u64) -> bool;
}

/// Source of frames.
pub trait FrameProvider: Send + Sync {
    /// Index of the most recently run frame (0 before the first frame).
    fn frame_count(&self) -> u64;

    /// Register a work item. It runs from the next frame on.
    fn register(&self, item: Arc<dyn FrameWorkItem>);
}

/// Clamp a configured frame count to at least one frame.
pub fn normalize_frame_count(frame_count: i64) -> usize {
    if frame_count <= 0 {
        1
    } else {
        usize::try_from(frame_count).unwrap_or(usize::MAX)
    }
}
