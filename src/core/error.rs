//! Error handling logic

use std::fmt;
use thiserror::Error;

/// Position of a single qubit within the full register.
///
/// Qubit `q` owns bit `q` of a computational-basis index, so qubit 0 is the
/// least significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub usize);

impl QubitId {
    /// Bit mask selecting this qubit inside a basis index.
    pub fn mask(self) -> u64 {
        1u64 << self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GroverError>;

/// Failures raised while configuring, building or simulating a search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GroverError {
    /// Search parameters are unusable (key width too small or too large,
    /// target outside the value domain). Raised before any simulation work.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// What was wrong with the configuration
        message: String,
    },

    /// A table record does not fit the declared register widths, or its key
    /// is duplicated. Raised while building the oracle.
    #[error("Invalid record (key {id}): {message}")]
    InvalidRecord {
        /// Key of the offending record
        id: u64,
        /// Why the record was rejected
        message: String,
    },

    /// The amplitude sum drifted away from 1. Always a simulator defect.
    #[error("Normalization violated: sum(|a|^2) = {norm} (tolerance {tolerance})")]
    NormalizationError {
        /// Observed sum of squared magnitudes
        norm: f64,
        /// Allowed deviation from 1.0
        tolerance: f64,
    },

    /// A gate or circuit is inconsistent with the state it is applied to.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// InvalidOperation failure message
        message: String,
    },
}
