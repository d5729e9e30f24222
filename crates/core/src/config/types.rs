use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub throttle: ThrottleConfig,
    #[serde(default)]
    pub frames: FrameConfig,
    #[serde(default)]
    pub producer: ProducerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Throttle operator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThrottleConfig {
    /// Window length in frames. Values below 1 are treated as 1.
    #[serde(default = "default_frame_count")]
    pub frame_count: i64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            frame_count: default_frame_count(),
        }
    }
}

fn default_frame_count() -> i64 {
    1
}

/// Timer frame provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FrameConfig {
    /// Time between frames in milliseconds (default: 16, roughly 60 fps)
    #[serde(default = "default_frame_interval_ms")]
    pub interval_ms: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_frame_interval_ms(),
        }
    }
}

fn default_frame_interval_ms() -> u64 {
    16
}

/// Demo producer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProducerConfig {
    /// Time between produced values in milliseconds
    #[serde(default = "default_producer_interval_ms")]
    pub interval_ms: u64,
    /// Number of values to produce before completing
    #[serde(default = "default_producer_count")]
    pub count: u64,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_producer_interval_ms(),
            count: default_producer_count(),
        }
    }
}

fn default_producer_interval_ms() -> u64 {
    5
}

fn default_producer_count() -> u64 {
    200
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}
