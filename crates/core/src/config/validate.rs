use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Frame interval is not 0
/// - Producer interval is not 0
///
/// `throttle.frame_count` is deliberately not validated; values below 1 are
/// clamped where the operator is built.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.frames.interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "frames.interval_ms cannot be 0".to_string(),
        ));
    }

    if config.producer.interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "producer.interval_ms cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FrameConfig, ProducerConfig, ThrottleConfig};

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_non_positive_frame_count_passes() {
        let config = Config {
            throttle: ThrottleConfig { frame_count: 0 },
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_frame_interval_zero_fails() {
        let config = Config {
            frames: FrameConfig { interval_ms: 0 },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_producer_interval_zero_fails() {
        let config = Config {
            producer: ProducerConfig {
                interval_ms: 0,
                count: 10,
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
