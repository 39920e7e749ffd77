// src/simulation/results.rs
use crate::core::QubitId;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;

/// Probability distribution over the joint outcomes of a list of qubits.
///
/// Outcome bit `j` is the value of `qubits[j]`, so an outcome reads directly
/// as an unsigned integer when the list is a register in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginalDistribution {
    qubits: Vec<QubitId>,
    /// Maps each outcome with non-zero mass to its probability.
    probabilities: BTreeMap<u64, f64>,
}

impl MarginalDistribution {
    pub(crate) fn new(qubits: Vec<QubitId>, probabilities: BTreeMap<u64, f64>) -> Self {
        Self { qubits, probabilities }
    }

    /// The qubits this distribution was marginalised onto.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Probability of observing `outcome`. Zero for outcomes never seen.
    pub fn probability(&self, outcome: u64) -> f64 {
        self.probabilities.get(&outcome).copied().unwrap_or(0.0)
    }

    /// Total probability mass (1.0 for a normalized state).
    pub fn total(&self) -> f64 {
        self.probabilities.values().sum()
    }

    /// The outcome carrying the most mass. Ties go to the smaller outcome.
    pub fn most_likely(&self) -> Option<(u64, f64)> {
        self.probabilities
            .iter()
            .fold(None, |best: Option<(u64, f64)>, (outcome, p)| match best {
                Some((_, best_p)) if best_p >= *p => best,
                _ => Some((*outcome, *p)),
            })
    }

    /// Iterates `(outcome, probability)` pairs in ascending outcome order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.probabilities.iter().map(|(o, p)| (*o, *p))
    }

    /// Draws one outcome with probability proportional to its mass.
    /// Returns `None` for an empty distribution.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<u64> {
        let total = self.total();
        if self.probabilities.is_empty() || total <= 0.0 {
            return None;
        }
        let p_sample: f64 = rng.random::<f64>() * total; // Sample in [0, total)
        let mut cumulative = 0.0;
        for (outcome, p) in &self.probabilities {
            cumulative += *p;
            if p_sample < cumulative {
                return Some(*outcome);
            }
        }
        // p_sample can land on `total` through rounding
        self.probabilities.keys().next_back().copied()
    }

    /// Splits an outcome into one bit per qubit, in qubit-list order.
    pub fn to_bits(&self, outcome: u64) -> Vec<bool> {
        (0..self.qubits.len()).map(|j| (outcome >> j) & 1 == 1).collect()
    }
}

impl fmt::Display for MarginalDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Marginal over {} qubits:", self.qubits.len())?;
        if self.probabilities.is_empty() {
            writeln!(f, "  (empty)")?;
        }
        for (outcome, p) in &self.probabilities {
            writeln!(f, "  {:0width$b}: {:.6}", outcome, p, width = self.qubits.len())?;
        }
        Ok(())
    }
}
