//! Error types for interval arithmetic and notation conversion
//!
//! Representation errors and resource exhaustion are hard errors. Failing to
//! find a notation for a value is not an error: those conversions return
//! `Option::None` so callers can fall back to a canonical rendering.

use thiserror::Error;

use crate::notation::fjs::FjsFlavor;

/// Top-level error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntervalError {
    /// The operation needs a capability the operands' domain lacks
    #[error("{0}")]
    Representation(String),

    /// A prime beyond the known prime table was requested
    #[error("Out of primes: prime #{index} requested but the table holds {size}")]
    OutOfPrimes { index: usize, size: usize },

    /// No external comma table registered for a non-native flavor
    #[error("No comma table registered for flavor '{0}'")]
    MissingCommaTable(FjsFlavor),

    #[error("Unrecognized nominal '{0}'")]
    UnknownNominal(String),

    #[error("Unrecognized accidental '{0}'")]
    UnknownAccidental(String),

    #[error("Division by zero")]
    DivisionByZero,

    /// Relative ⟷ absolute conversion without a unison frequency
    #[error("Reference frequency must be set for {0} conversion. Try 1/1 = 440 Hz")]
    MissingReference(&'static str),

    /// Malformed literal text
    #[error("Parse error at {position}: {message}")]
    Parse { position: usize, message: String },

    /// Settings could not be read or decoded
    #[error("Invalid settings: {0}")]
    Settings(String),
}

impl IntervalError {
    pub(crate) fn representation(message: impl Into<String>) -> Self {
        IntervalError::Representation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, IntervalError>;
