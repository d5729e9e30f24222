use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::runner::FrameRunner;
use super::traits::{FrameProvider, FrameWorkItem};
use super::FrameProviderError;

/// Frame provider driven by a tokio interval.
///
/// Frames run on a spawned task. When the task falls behind, missed frames
/// are skipped rather than replayed in a burst.
pub struct TimerFrameProvider {
    runner: Arc<FrameRunner>,
    interval: Duration,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for TimerFrameProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerFrameProvider")
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .field("runner", &self.runner)
            .finish()
    }
}

impl TimerFrameProvider {
    /// Create a stopped provider producing one frame per `interval`.
    pub fn new(interval: Duration) -> Result<Self, FrameProviderError> {
        if interval.is_zero() {
            return Err(FrameProviderError::InvalidInterval(
                "interval must be greater than zero".to_string(),
            ));
        }
        let (shutdown_tx, _) = broadcast::channel(1);
        Ok(Self {
            runner: Arc::new(FrameRunner::new()),
            interval,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            handle: Mutex::new(None),
        })
    }

    /// Create a provider from a frame interval in milliseconds.
    pub fn from_millis(interval_ms: u64) -> Result<Self, FrameProviderError> {
        Self::new(Duration::from_millis(interval_ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Frame interval in whole milliseconds, saturating at `u64::MAX`.
    pub fn interval_ms(&self) -> u64 {
        u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Number of registered work items.
    pub fn pending_work(&self) -> usize {
        self.runner.pending_work()
    }

    /// Start producing frames. Must be called from within a tokio runtime.
    pub fn start(&self) -> Result<(), FrameProviderError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(FrameProviderError::AlreadyRunning);
        }

        info!(interval_ms = self.interval_ms(), "Starting frame provider");

        let runner = Arc::clone(&self.runner);
        let running = Arc::clone(&self.running);
        let interval = self.interval;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; frames start one interval in.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        debug!("Frame provider received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        runner.run_frame();
                    }
                }
            }

            running.store(false, Ordering::SeqCst);
        });

        *self.handle.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(())
    }

    /// Stop producing frames and wait for the frame task to exit.
    ///
    /// Registered work items stay registered and resume on the next `start`.
    pub async fn stop(&self) {
        let _ = self.shutdown_tx.send(());

        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }

        self.running.store(false, Ordering::SeqCst);
        info!(frames = self.runner.frame_count(), "Frame provider stopped");
    }
}

impl FrameProvider for TimerFrameProvider {
    fn frame_count(&self) -> u64 {
        self.runner.frame_count()
    }

    fn register(&self, item: Arc<dyn FrameWorkItem>) {
        self.runner.register(item);
    }
}

impl Drop for TimerFrameProvider {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;

    struct FrameCounter {
        frames: AtomicU64,
    }

    impl FrameWorkItem for FrameCounter {
        fn move_next(&self, _frame: u64) -> bool {
            self.frames.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = TimerFrameProvider::new(Duration::ZERO);
        assert!(matches!(
            result,
            Err(FrameProviderError::InvalidInterval(_))
        ));
    }

    #[test]
    fn test_interval_ms_saturates() {
        let provider = TimerFrameProvider::from_millis(16).unwrap();
        assert_eq!(provider.interval_ms(), 16);

        let provider = TimerFrameProvider::new(Duration::MAX).unwrap();
        assert_eq!(provider.interval_ms(), u64::MAX);
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let provider = TimerFrameProvider::from_millis(5).unwrap();
        provider.start().unwrap();
        assert_eq!(provider.start(), Err(FrameProviderError::AlreadyRunning));
        provider.stop().await;
        assert!(!provider.is_running());
    }

    #[tokio::test]
    async fn test_frames_advance_while_running() {
        let provider = TimerFrameProvider::from_millis(2).unwrap();
        let counter = Arc::new(FrameCounter {
            frames: AtomicU64::new(0),
        });
        provider.register(counter.clone());

        provider.start().unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        provider.stop().await;

        let frames = counter.frames.load(Ordering::SeqCst);
        assert!(frames > 0);
        assert_eq!(frames, provider.frame_count());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(counter.frames.load(Ordering::SeqCst), frames);
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let provider = TimerFrameProvider::from_millis(2).unwrap();
        provider.start().unwrap();
        provider.stop().await;

        provider.start().unwrap();
        assert!(provider.is_running());
        provider.stop().await;
    }
}
