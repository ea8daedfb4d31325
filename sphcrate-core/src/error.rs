//! Error types for sphcrate

use thiserror::Error;

/// Main error type for sphcrate operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient samples: {samples} samples for {coefficients} coefficients")]
    InsufficientSamples { samples: usize, coefficients: usize },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Coefficient count mismatch: expected {expected}, got {actual}")]
    CoefficientCount { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Whether the error belongs to the input class (bad or too few points)
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::InsufficientSamples { .. })
    }

    /// Whether the error belongs to the configuration class (mismatched shapes or lengths)
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Error::ShapeMismatch(_) | Error::CoefficientCount { .. } | Error::InvalidConfig(_)
        )
    }
}

/// Result type alias for sphcrate operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<ndarray::ShapeError> for Error {
    fn from(e: ndarray::ShapeError) -> Self {
        Error::ShapeMismatch(e.to_string())
    }
}
