pub mod config;
pub mod frame;
pub mod metrics;
pub mod observable;
pub mod operators;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, FrameConfig,
    LoggingConfig, ProducerConfig, ThrottleConfig,
};
pub use frame::{
    normalize_frame_count, FrameProvider, FrameProviderError, FrameRunner, FrameWorkItem,
    ManualFrameProvider, TimerFrameProvider,
};
pub use observable::{
    Completion, Disposable, Notification, Observable, ObservableExt, ObservableStream, Observer,
    StreamError, Subject, Subscription,
};
pub use operators::ThrottleLatestFrame;
