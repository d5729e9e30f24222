use std::sync::Arc;

use super::runner::FrameRunner;
use super::traits::{FrameProvider, FrameWorkItem};

/// Frame provider advanced explicitly by its owner.
///
/// Deterministic: nothing happens between calls to `advance`. Useful in tests
/// and in loops that already have their own notion of a frame.
#[derive(Debug, Default)]
pub struct ManualFrameProvider {
    runner: FrameRunner,
}

impl ManualFrameProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame and return its index.
    pub fn advance(&self) -> u64 {
        self.runner.run_frame()
    }

    /// Run `frames` frames and return the index of the last one.
    pub fn advance_by(&self, frames: u64) -> u64 {
        for _ in 0..frames {
            self.runner.run_frame();
        }
        self.runner.frame_count()
    }

    /// Number of registered work items.
    pub fn pending_work(&self) -> usize {
        self.runner.pending_work()
    }
}

impl FrameProvider for ManualFrameProvider {
    fn frame_count(&self) -> u64 {
        self.runner.frame_count()
    }

    fn register(&self, item: Arc<dyn FrameWorkItem>) {
        self.runner.register(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct Forever {
        last: AtomicU64,
    }

    impl FrameWorkItem for Forever {
        fn move_next(&self, frame: u64) -> bool {
            self.last.store(frame, Ordering::SeqCst);
            true
        }
    }

    #[test]
    fn test_advance_by() {
        let provider = ManualFrameProvider::new();
        let item = Arc::new(Forever {
            last: AtomicU64::new(0),
        });
        provider.register(item.clone());

        assert_eq!(provider.advance_by(3), 3);
        assert_eq!(item.last.load(Ordering::SeqCst), 3);
        assert_eq!(provider.frame_count(), 3);
        assert_eq!(provider.pending_work(), 1);
    }

    #[test]
    fn test_advance_by_zero_is_noop() {
        let provider = ManualFrameProvider::new();
        assert_eq!(provider.advance_by(0), 0);
    }
}
