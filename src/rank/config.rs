//! Run configuration and fail-fast validation

use thiserror::Error;

/// Configuration validation errors
///
/// Raised at construction time, before any ingestion or iteration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Damping factor outside the open interval (0, 1)
    #[error("damping factor must be in (0, 1), got {0}")]
    InvalidAlpha(f64),

    /// Convergence threshold not strictly positive
    #[error("convergence threshold must be > 0, got {0}")]
    InvalidConvergence(f64),

    /// Iteration limit of zero
    #[error("max_iterations must be > 0")]
    InvalidMaxIterations,

    /// Empty edge-list delimiter
    #[error("delimiter must not be empty")]
    EmptyDelimiter,
}

/// PageRank run configuration
///
/// # Example
///
/// ```
/// use rapidrank::RankConfig;
///
/// let config = RankConfig {
///     convergence: 1e-10,
///     ..RankConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct RankConfig {
    /// Damping factor: probability of following a link vs restarting.
    /// Must lie in (0, 1).
    pub alpha: f64,

    /// Convergence threshold on the L1 distance between consecutive
    /// normalized iterates. Must be > 0.
    pub convergence: f64,

    /// Iteration cap; hitting it is normal termination, not failure
    pub max_iterations: u32,

    /// Emit a tracing event per iteration
    pub trace: bool,

    /// Edge-list keys are already zero-based indices; skip the registry
    pub numeric: bool,

    /// Field separator for edge-list lines
    pub delimiter: String,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            alpha: 0.85,
            convergence: 1e-6,
            max_iterations: 100,
            trace: false,
            numeric: false,
            delimiter: " ".to_string(),
        }
    }
}

impl RankConfig {
    /// Check all parameters, failing fast on the first violation.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        if !(self.convergence > 0.0) {
            return Err(ConfigError::InvalidConvergence(self.convergence));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations);
        }
        if self.delimiter.is_empty() {
            return Err(ConfigError::EmptyDelimiter);
        }
        Ok(())
    }
}
