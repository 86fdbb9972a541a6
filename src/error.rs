//! Configuration error types

use thiserror::Error;

/// Errors raised while validating a monitor configuration
///
/// All failures are construction-time; nothing in this crate errors mid-run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("min_delta must be finite and >= 0, got {0}")]
    InvalidMinDelta(f32),

    #[error("unknown direction mode: {0} (expected min, max, or auto)")]
    UnknownMode(String),
}

/// Result type for configuration validation
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidMinDelta(-0.5);
        assert!(format!("{err}").contains("min_delta"));
        assert!(format!("{err}").contains("-0.5"));

        let err = ConfigError::UnknownMode("median".to_string());
        assert!(format!("{err}").contains("unknown direction mode"));
        assert!(format!("{err}").contains("median"));
    }
}
