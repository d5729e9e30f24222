use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::trace;

use super::traits::FrameWorkItem;
use crate::metrics;

/// Registry of frame work items plus the frame counter.
///
/// Shared by the frame providers. The item list is never locked while items
/// run, so a work item (or anything it calls) may register new items from
/// inside `move_next`; those run from the following frame.
pub struct FrameRunner {
    items: Mutex<Vec<Arc<dyn FrameWorkItem>>>,
    frame: AtomicU64,
    /// Serializes whole frames when several threads drive the same runner.
    run_lock: Mutex<()>,
}

impl std::fmt::Debug for FrameRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRunner")
            .field("frame", &self.frame_count())
            .field("pending_work", &self.pending_work())
            .finish()
    }
}

impl Default for FrameRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRunner {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            frame: AtomicU64::new(0),
            run_lock: Mutex::new(()),
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame.load(Ordering::Acquire)
    }

    pub fn register(&self, item: Arc<dyn FrameWorkItem>) {
        self.items().push(item);
    }

    /// Number of registered work items.
    pub fn pending_work(&self) -> usize {
        self.items().len()
    }

    /// Run one frame and return its index.
    pub fn run_frame(&self) -> u64 {
        let _frame_guard = self.run_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let started = Instant::now();
        // Items registered after the take run next frame, so the counter
        // only moves once the batch for this frame is fixed.
        let items = std::mem::take(&mut *self.items());
        let frame = self.frame.fetch_add(1, Ordering::AcqRel) + 1;
        let ran = items.len();

        let mut survivors = Vec::with_capacity(ran);
        for item in items {
            if item.move_next(frame) {
                survivors.push(item);
            }
        }

        let pending = {
            let mut registered = self.items();
            let late = std::mem::take(&mut *registered);
            survivors.extend(late);
            *registered = survivors;
            registered.len()
        };

        metrics::FRAMES_ADVANCED.inc();
        metrics::FRAME_RUN_DURATION
            .with_label_values(&[])
            .observe(started.elapsed().as_secs_f64());
        metrics::FRAME_WORK_ITEMS.set(pending as i64);
        trace!(frame, ran, pending, "Frame completed");

        frame
    }

    fn items(&self) -> MutexGuard<'_, Vec<Arc<dyn FrameWorkItem>>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
