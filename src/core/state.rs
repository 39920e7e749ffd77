// src/core/state.rs

use super::constants::PRUNE_EPSILON;
use super::error::{GroverError, Result};
use num_complex::Complex;
use num_traits::Zero;
use std::collections::BTreeMap;
use std::fmt;

/// Complex amplitudes over the full computational basis of a register.
///
/// The basis has `2^num_qubits` indices, which for a search register
/// (`key + 32 + 1` qubits) is far too many to store densely. Only non-zero
/// amplitudes are kept, keyed by basis index; every absent index has
/// amplitude zero. A `BTreeMap` keeps iteration order deterministic so that
/// seeded sampling is reproducible.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct AmplitudeState {
    num_qubits: usize,
    amplitudes: BTreeMap<u64, Complex<f64>>,
}

impl AmplitudeState {
    /// Creates the all-zero basis state `|0...0>` over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::check_width(num_qubits)?;
        let mut amplitudes = BTreeMap::new();
        amplitudes.insert(0, Complex::new(1.0, 0.0));
        Ok(Self { num_qubits, amplitudes })
    }

    /// Creates a state from explicit `(basis index, amplitude)` pairs.
    /// Repeated indices accumulate. The result is not normalized.
    pub fn from_amplitudes<I>(num_qubits: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u64, Complex<f64>)>,
    {
        Self::check_width(num_qubits)?;
        let mut amplitudes: BTreeMap<u64, Complex<f64>> = BTreeMap::new();
        for (index, amp) in entries {
            if num_qubits < 64 && index >> num_qubits != 0 {
                return Err(GroverError::InvalidOperation {
                    message: format!("Basis index {} does not fit in {} qubits", index, num_qubits),
                });
            }
            *amplitudes.entry(index).or_insert_with(Complex::zero) += amp;
        }
        amplitudes.retain(|_, a| a.norm_sqr() >= PRUNE_EPSILON);
        Ok(Self { num_qubits, amplitudes })
    }

    fn check_width(num_qubits: usize) -> Result<()> {
        if num_qubits == 0 || num_qubits > 64 {
            return Err(GroverError::InvalidOperation {
                message: format!("Cannot represent a register of {} qubits (supported: 1..=64)", num_qubits),
            });
        }
        Ok(())
    }

    /// Number of qubits the state spans.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Amplitude of a single basis index (zero when absent).
    pub fn amplitude(&self, index: u64) -> Complex<f64> {
        self.amplitudes.get(&index).copied().unwrap_or_else(Complex::zero)
    }

    /// Squared magnitude of a single basis index.
    pub fn probability(&self, index: u64) -> f64 {
        self.amplitude(index).norm_sqr()
    }

    /// Number of basis indices carrying a non-zero amplitude.
    pub fn support_len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Iterates non-zero amplitudes in ascending basis-index order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, Complex<f64>)> + '_ {
        self.amplitudes.iter().map(|(i, a)| (*i, *a))
    }

    /// Sum of squared magnitudes over the whole basis.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.values().map(|a| a.norm_sqr()).sum()
    }

    /// Replaces the amplitude map wholesale, dropping negligible entries.
    pub(crate) fn replace(&mut self, mut amplitudes: BTreeMap<u64, Complex<f64>>) {
        amplitudes.retain(|_, a| a.norm_sqr() >= PRUNE_EPSILON);
        self.amplitudes = amplitudes;
    }

    /// Moves every entry whose index has all `control_mask` bits set to the
    /// index with `target_mask` toggled. Other entries stay where they are.
    /// `target_mask` must not overlap `control_mask`.
    pub(crate) fn toggle_where(&mut self, control_mask: u64, target_mask: u64) {
        let moved: Vec<(u64, Complex<f64>)> = self
            .amplitudes
            .iter()
            .filter(|(index, _)| **index & control_mask == control_mask)
            .map(|(index, amp)| (*index, *amp))
            .collect();
        for (index, _) in &moved {
            self.amplitudes.remove(index);
        }
        for (index, amp) in moved {
            self.amplitudes.insert(index ^ target_mask, amp);
        }
    }

    pub(crate) fn amplitudes(&self) -> &BTreeMap<u64, Complex<f64>> {
        &self.amplitudes
    }
}

impl fmt::Display for AmplitudeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amplitudes[")?;
        for (i, (index, c)) in self.amplitudes.iter().enumerate() {
            write!(f, "{}|{:0width$b}>: {:.4}", if i > 0 { ", " } else { "" }, index, c, width = self.num_qubits)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_all_zero_basis() -> Result<()> {
        let state = AmplitudeState::new(36)?;
        assert_eq!(state.support_len(), 1);
        assert_eq!(state.amplitude(0), Complex::new(1.0, 0.0));
        assert_eq!(state.amplitude(1), Complex::new(0.0, 0.0));
        assert!((state.norm_sqr() - 1.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let err = AmplitudeState::from_amplitudes(2, vec![(4, Complex::new(1.0, 0.0))]);
        assert!(matches!(err, Err(GroverError::InvalidOperation { .. })));
    }

    #[test]
    fn test_toggle_where_moves_only_matching_entries() -> Result<()> {
        let half = Complex::new(0.5, 0.0);
        let mut state = AmplitudeState::from_amplitudes(
            4,
            vec![(0b0011, half), (0b0001, half), (0b0111, -half), (0b1010, half)],
        )?;
        // Controls on qubits 0 and 1, target qubit 3.
        state.toggle_where(0b0011, 0b1000);
        assert_eq!(state.amplitude(0b1011), half);
        assert_eq!(state.amplitude(0b1111), -half);
        assert_eq!(state.amplitude(0b0001), half);
        assert_eq!(state.amplitude(0b1010), half);
        assert_eq!(state.amplitude(0b0011), Complex::new(0.0, 0.0));
        assert_eq!(state.support_len(), 4);
        Ok(())
    }

    #[test]
    fn test_rejects_zero_width() {
        assert!(AmplitudeState::new(0).is_err());
        assert!(AmplitudeState::new(65).is_err());
    }
}
