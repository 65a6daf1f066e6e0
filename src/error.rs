//! Error types for the PCM buffer engine.
//!
//! Implements CO-162: Expected errors shall use Result<T, E> types with meaningful error enums
//! Implements Recommendation: Document error codes as they're defined
//!
//! Every steady-state buffer operation is designed to be infallible or
//! self-healing (admission refusal returns `None`, not `Err`); the error
//! type here is only reached at construction time, when the caller has
//! handed the engine a structurally unusable arena or setting.

use thiserror::Error;

/// Top-level error type for the buffer engine.
#[derive(Debug, Error)]
pub enum PcmBufError {
    /// The arena/settings combination handed to `PcmBufferEngine::new` can't
    /// be used to build a working buffer.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from validating or applying [`crate::config::Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A duration-valued setting was negative, NaN, or infinite.
    #[error("invalid duration for '{field}': {value}")]
    InvalidDuration { field: &'static str, value: f32 },

    /// The native sample rate is zero or otherwise unusable.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    /// The arena handed to the engine is smaller than one minimum chunk
    /// plus the fixed scratch buffers, so no playback would ever fit.
    #[error("arena too small: {available} bytes available, {required} required")]
    ArenaTooSmall { available: usize, required: usize },
}

pub type Result<T> = std::result::Result<T, PcmBufError>;

/// Recommended handling for a given error.
///
/// Mirrors the coding convention that transient vs. permanent failures get
/// different retry policies; construction errors here are all permanent.
#[derive(Debug, Clone, Copy)]
pub enum RecoveryStrategy {
    /// Caller passed bad input; fix the call site and retry.
    Fatal,
}

impl PcmBufError {
    /// Get the recommended recovery strategy for this error.
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            PcmBufError::Config(_) => RecoveryStrategy::Fatal,
        }
    }

    /// Get an error code for logging/debugging.
    pub fn error_code(&self) -> &'static str {
        match self {
            PcmBufError::Config(ConfigError::InvalidDuration { .. }) => "PB_CFG_001",
            PcmBufError::Config(ConfigError::InvalidSampleRate(_)) => "PB_CFG_002",
            PcmBufError::Config(ConfigError::ArenaTooSmall { .. }) => "PB_CFG_003",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_unique() {
        use std::collections::HashSet;

        let errors = vec![
            PcmBufError::Config(ConfigError::InvalidDuration {
                field: "fade_out_duration",
                value: -1.0,
            }),
            PcmBufError::Config(ConfigError::InvalidSampleRate(0)),
            PcmBufError::Config(ConfigError::ArenaTooSmall {
                available: 0,
                required: 1,
            }),
        ];

        let codes: HashSet<_> = errors.iter().map(|e| e.error_code()).collect();
        assert_eq!(codes.len(), errors.len(), "error codes must be unique");
    }
}
