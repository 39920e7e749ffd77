// src/validation/mod.rs

//! Checks on amplitude states and on the record tables fed to the oracle.

use crate::core::{AmplitudeState, GroverError, Record, Result, DEFAULT_NORM_TOLERANCE, VALUE_WIDTH};
use std::collections::HashSet;

/// `true` when `value` fits in `width` bits.
pub(crate) fn fits_in(value: u64, width: usize) -> bool {
    width >= 64 || value >> width == 0
}

/// Checks if the state is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `AmplitudeState` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to 1e-6.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(GroverError::NormalizationError)` otherwise.
pub fn check_normalization(state: &AmplitudeState, tolerance: Option<f64>) -> Result<()> {
    let tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let norm = state.norm_sqr();
    if !norm.is_finite() || (norm - 1.0).abs() > tolerance {
        Err(GroverError::NormalizationError { norm, tolerance })
    } else {
        Ok(())
    }
}

/// Performs the basic validation checks on a state. Currently only
/// normalization.
pub fn validate_state(state: &AmplitudeState, norm_tolerance: Option<f64>) -> Result<()> {
    check_normalization(state, norm_tolerance)
}

/// Checks that every record fits the register widths and that keys are
/// pairwise distinct.
///
/// # Errors
/// `InvalidRecord` naming the first offending key.
pub fn validate_table(table: &[Record], key_width: usize) -> Result<()> {
    let mut seen = HashSet::with_capacity(table.len());
    for record in table {
        if !fits_in(record.id, key_width) {
            return Err(GroverError::InvalidRecord {
                id: record.id,
                message: format!("key does not fit in {} bits", key_width),
            });
        }
        if !fits_in(record.value, VALUE_WIDTH) {
            return Err(GroverError::InvalidRecord {
                id: record.id,
                message: format!("value {} does not fit in {} bits", record.value, VALUE_WIDTH),
            });
        }
        if !seen.insert(record.id) {
            return Err(GroverError::InvalidRecord {
                id: record.id,
                message: "duplicate key".to_string(),
            });
        }
    }
    Ok(())
}
