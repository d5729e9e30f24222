//! Prometheus metrics for the throttle operator and frame providers.
//!
//! This module provides metrics for:
//! - Throttle windows (opened windows, emitted and dropped values)
//! - Frame providers (frames run, registered work, frame run time)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Throttle Metrics
// =============================================================================

/// Throttle windows opened total.
pub static THROTTLE_WINDOWS_OPENED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "framethrottle_throttle_windows_opened_total",
        "Total throttle windows opened",
    )
    .unwrap()
});

/// Values forwarded downstream by trigger.
pub static THROTTLE_VALUES_EMITTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "framethrottle_throttle_values_emitted_total",
            "Total values forwarded downstream by the throttle",
        ),
        &["trigger"], // "window_open", "window_close"
    )
    .unwrap()
});

/// Values discarded by reason.
pub static THROTTLE_VALUES_DROPPED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "framethrottle_throttle_values_dropped_total",
            "Total values discarded by the throttle",
        ),
        &["reason"], // "overwritten", "completed", "disposed"
    )
    .unwrap()
});

// =============================================================================
// Frame Metrics
// =============================================================================

/// Frames run total.
pub static FRAMES_ADVANCED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("framethrottle_frames_advanced_total", "Total frames run").unwrap()
});

/// Work items registered after the most recent frame.
pub static FRAME_WORK_ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "framethrottle_frame_work_items",
        "Work items registered after the most recent frame",
    )
    .unwrap()
});

/// Time spent running the work items of one frame, in seconds.
pub static FRAME_RUN_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "framethrottle_frame_run_duration_seconds",
            "Time spent running the work items of one frame",
        )
        .buckets(vec![0.00001, 0.0001, 0.001, 0.005, 0.01, 0.05, 0.1]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Throttle
        Box::new(THROTTLE_WINDOWS_OPENED.clone()),
        Box::new(THROTTLE_VALUES_EMITTED.clone()),
        Box::new(THROTTLE_VALUES_DROPPED.clone()),
        // Frames
        Box::new(FRAMES_ADVANCED.clone()),
        Box::new(FRAME_WORK_ITEMS.clone()),
        Box::new(FRAME_RUN_DURATION.clone()),
    ]
}
