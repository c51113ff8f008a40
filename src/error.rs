//! Errors raised by sketch construction and hashing.

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EstimatorError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimatorError {
    /// HyperLogLog precision outside of the supported `[4, 18]` range.
    #[error("invalid HyperLogLog precision {precision}: expected value in [4, 18] range")]
    InvalidPrecision { precision: u8 },

    /// Recordinality working set capacity must be positive.
    #[error("invalid Recordinality capacity {capacity}: expected positive value")]
    InvalidCapacity { capacity: usize },

    /// Target relative error used to size a sketch must be finite and positive.
    #[error("invalid target error rate {error_rate}")]
    InvalidErrorRate { error_rate: f64 },

    /// Hash oracle could not hash the given token.
    #[error("hash failure: {0}")]
    HashFailure(String),
}

impl EstimatorError {
    /// Return whether error was caused by invalid construction parameters.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, EstimatorError::HashFailure(_))
    }
}
