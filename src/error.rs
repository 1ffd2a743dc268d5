//! Error types for device geometry generation

use thiserror::Error;

/// A parameter set that cannot be turned into geometry.
///
/// Raised before any output is produced: generation either returns a
/// complete, valid result or this error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid parameter(s) {}: {reason}", .parameters.join(", "))]
pub struct InvalidParameterError {
    /// Names of the offending parameters.
    pub parameters: Vec<String>,
    /// Human-readable reason.
    pub reason: String,
}

impl InvalidParameterError {
    /// Error blaming a single parameter.
    pub fn new(parameter: &str, reason: impl Into<String>) -> Self {
        Self {
            parameters: vec![parameter.to_string()],
            reason: reason.into(),
        }
    }

    /// Error blaming several parameters that are only invalid together.
    pub fn for_parameters(parameters: &[&str], reason: impl Into<String>) -> Self {
        Self {
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            reason: reason.into(),
        }
    }

    /// Whether `parameter` is among the blamed ones.
    pub fn involves(&self, parameter: &str) -> bool {
        self.parameters.iter().any(|p| p == parameter)
    }
}

/// Errors from loading, saving or building devices.
#[derive(Debug, Error)]
pub enum Error {
    /// Parameter outside its domain
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameterError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed parameter file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for configuration and device operations
pub type Result<T> = std::result::Result<T, Error>;
