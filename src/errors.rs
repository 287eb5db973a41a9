//! Error types for the tetration solver
//!
//! Every failure is local and synchronous: a solve either yields a value
//! with the method that produced it, or one of these diagnostics.

use thiserror::Error;

/// Main error type for parsing, solving and configuration
#[derive(Error, Debug)]
pub enum TetrationError {
    /// Malformed base or height literal
    #[error("invalid complex literal {literal:?}: {reason}")]
    Parse { literal: String, reason: String },

    /// Precision must be a positive bit count
    #[error("invalid precision: {0} bits (need a positive integer)")]
    InvalidPrecision(u32),

    /// No attracting fixed point and the height is not a usable integer
    #[error("non-attracting regime or fixed point not found; non-integer heights in this regime are unsupported")]
    NonAttractingRegime,

    /// Multiplier at the fixed point is zero or otherwise unusable
    #[error("degenerate derivative at fixed point: {reason}")]
    DegenerateDerivative { reason: String },

    /// Integer tower would exceed the configured iteration bound
    #[error("integer height {height} exceeds tower limit {max}")]
    HeightTooLarge { height: u64, max: u64 },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, TetrationError>;

/// Convert anyhow errors to TetrationError
impl From<anyhow::Error> for TetrationError {
    fn from(err: anyhow::Error) -> Self {
        TetrationError::Generic(err.to_string())
    }
}

impl TetrationError {
    /// Build a parse error for `literal`
    pub fn parse(literal: &str, reason: impl Into<String>) -> Self {
        TetrationError::Parse {
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }

    /// Build a degenerate-derivative error
    pub fn degenerate(reason: impl Into<String>) -> Self {
        TetrationError::DegenerateDerivative {
            reason: reason.into(),
        }
    }

    /// Whether this is a domain error (as opposed to input or I/O trouble)
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            TetrationError::NonAttractingRegime
                | TetrationError::DegenerateDerivative { .. }
                | TetrationError::HeightTooLarge { .. }
        )
    }
}
