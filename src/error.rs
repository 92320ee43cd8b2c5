//! Error types for approximation, sampling, and workflow operations.

use thiserror::Error;

/// Errors raised by the approximation core and its collaborators.
///
/// Every error is returned synchronously to the immediate caller; nothing in
/// this crate retries or recovers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A scale, shape, order, or probability argument is outside its domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested base distribution has no registered moments.
    #[error("Distribution {0} is not supported")]
    UnsupportedDistribution(String),

    /// Input data that cannot produce a meaningful result.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A random variate generator could not be constructed.
    #[error("sampling error: {0}")]
    Sampling(String),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
