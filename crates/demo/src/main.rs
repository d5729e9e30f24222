use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use prometheus::{Encoder, Registry, TextEncoder};
use tokio::signal;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use framethrottle_core::{
    load_config, metrics, normalize_frame_count, validate_config, Completion, Config, ConfigError,
    FrameProvider, LoggingConfig, Notification, ObservableExt, Observer, Subject,
    TimerFrameProvider,
};

/// Config file used when `FRAMETHROTTLE_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Logging may not be initialised yet if the config failed to load.
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let (config, config_source) = resolve_config()?;

    init_logging(&config.logging);
    info!("Configuration loaded from {}", config_source);
    debug!(
        "Effective configuration: {}",
        serde_json::to_string(&config).unwrap_or_default()
    );

    validate_config(&config).context("Configuration validation failed")?;

    let registry = Registry::new();
    for collector in metrics::all_metrics() {
        registry
            .register(collector)
            .context("Failed to register metrics")?;
    }

    let frames = Arc::new(
        TimerFrameProvider::from_millis(config.frames.interval_ms)
            .context("Failed to create frame provider")?,
    );
    frames.start().context("Failed to start frame provider")?;

    info!(
        "Throttling to one window per {} frame(s) of {}ms",
        normalize_frame_count(config.throttle.frame_count),
        config.frames.interval_ms
    );

    let source: Subject<u64> = Subject::new();
    let mut throttled = source
        .clone()
        .throttle_latest_frame(config.throttle.frame_count, frames.clone())
        .into_stream();

    let producer = tokio::spawn(produce(
        source.clone(),
        config.producer.count,
        Duration::from_millis(config.producer.interval_ms),
    ));

    let mut emitted = 0u64;
    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                warn!("Interrupted, shutting down");
                source.on_completed(Completion::Success);
                break;
            }
            notification = throttled.next() => match notification {
                Some(Notification::Next(value)) => {
                    emitted += 1;
                    info!(frame = frames.frame_count(), value, "Emitted");
                }
                Some(Notification::ErrorResume(e)) => {
                    warn!("Upstream error: {}", e);
                }
                Some(Notification::Completed(completion)) => {
                    match completion.error() {
                        Some(e) => warn!("Source failed: {}", e),
                        None => info!("Source completed"),
                    }
                    break;
                }
                None => break,
            },
        }
    }

    producer.abort();
    frames.stop().await;

    info!(
        "Forwarded {} of {} values over {} frames",
        emitted,
        config.producer.count,
        frames.frame_count()
    );

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .context("Failed to encode metrics")?;
    println!("{}", String::from_utf8_lossy(&buffer));

    Ok(())
}

/// Push `count` sequential values into `source`, one per `interval`, then complete.
async fn produce(source: Subject<u64>, count: u64, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    for value in 0..count {
        ticker.tick().await;
        source.on_next(value);
    }
    source.on_completed(Completion::Success);
}

/// Load the config file, falling back to defaults when the default path is absent.
fn resolve_config() -> Result<(Config, String)> {
    let explicit = std::env::var("FRAMETHROTTLE_CONFIG").ok().map(PathBuf::from);
    let config_path = explicit
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    match load_config(&config_path) {
        Ok(config) => Ok((config, format!("{:?}", config_path))),
        Err(ConfigError::FileNotFound(_)) if explicit.is_none() => {
            Ok((Config::default(), "built-in defaults".to_string()))
        }
        Err(e) => {
            Err(e).with_context(|| format!("Failed to load config from {:?}", config_path))
        }
    }
}

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,framethrottle_core=debug".into());

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
