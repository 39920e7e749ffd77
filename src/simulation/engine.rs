// src/simulation/engine.rs
use crate::circuits::Circuit;
use crate::core::{AmplitudeState, GroverError, QubitId, Result, DEFAULT_NORM_TOLERANCE};
use crate::operations::Operation;
use crate::simulation::MarginalDistribution;
use crate::validation::check_normalization;
use num_complex::Complex;
use num_traits::Zero;
use rand::Rng;
use std::collections::BTreeMap;
use std::f64::consts::FRAC_1_SQRT_2;
use tracing::trace;

/// Evolves one `AmplitudeState` through a sequence of gates.
///
/// The engine owns its state exclusively; a search builds a fresh engine and
/// drops it when done. Every gate is followed by a normalization check, and
/// a violation aborts with `NormalizationError`.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    state: AmplitudeState,
    norm_tolerance: f64,
}

impl SimulationEngine {
    /// Initializes the engine in `|0...0>` over `num_qubits` qubits.
    pub fn init(num_qubits: usize) -> Result<Self> {
        Ok(Self::from_state(AmplitudeState::new(num_qubits)?))
    }

    /// Wraps an existing state. The state is not checked here; the first
    /// applied gate will check it.
    pub fn from_state(state: AmplitudeState) -> Self {
        Self { state, norm_tolerance: DEFAULT_NORM_TOLERANCE }
    }

    /// Overrides the normalization tolerance.
    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.norm_tolerance = tolerance;
        self
    }

    pub fn state(&self) -> &AmplitudeState {
        &self.state
    }

    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    /// Squared magnitude of one basis index.
    pub fn probability_of(&self, index: u64) -> f64 {
        self.state.probability(index)
    }

    /// Applies a single operation, then checks normalization.
    pub fn apply_operation(&mut self, op: &Operation) -> Result<()> {
        match op {
            Operation::BitFlip { target } => self.apply_bit_flip(*target),
            Operation::ControlledBitFlip { controls, target } => self.apply_controlled_bit_flip(controls, *target),
            Operation::UniformSuperposition { targets } => self.apply_uniform_superposition(targets),
        }
    }

    /// Applies every operation of `circuit` in order. Each gate completes
    /// before the next one starts.
    pub fn apply_circuit(&mut self, circuit: &Circuit) -> Result<()> {
        for op in circuit.operations() {
            self.apply_operation(op)?;
        }
        trace!(ops = circuit.len(), support = self.state.support_len(), "applied circuit");
        Ok(())
    }

    /// Swaps every amplitude pair that differs only in `target`.
    pub fn apply_bit_flip(&mut self, target: QubitId) -> Result<()> {
        self.apply_controlled_bit_flip(&[], target)
    }

    /// For every basis index with all `controls` set, swaps its amplitude
    /// with the index where `target` is toggled.
    pub fn apply_controlled_bit_flip(&mut self, controls: &[QubitId], target: QubitId) -> Result<()> {
        self.check_qubit(target)?;
        let mut control_mask = 0u64;
        for control in controls {
            self.check_qubit(*control)?;
            if *control == target {
                return Err(GroverError::InvalidOperation {
                    message: format!("Target {} cannot also be a control", target),
                });
            }
            control_mask |= control.mask();
        }
        let target_mask = target.mask();

        if control_mask == 0 {
            // Uncontrolled: every entry moves.
            let flipped: BTreeMap<u64, Complex<f64>> =
                self.state.amplitudes().iter().map(|(index, amp)| (index ^ target_mask, *amp)).collect();
            self.state.replace(flipped);
        } else {
            self.state.toggle_where(control_mask, target_mask);
        }
        self.validate()
    }

    /// Applies the 1/√2 `[[1, 1], [1, -1]]` transform to each target in turn.
    pub fn apply_uniform_superposition(&mut self, targets: &[QubitId]) -> Result<()> {
        for target in targets {
            self.check_qubit(*target)?;
        }
        let scale = Complex::new(FRAC_1_SQRT_2, 0.0);
        for target in targets {
            let mask = target.mask();
            let mut next: BTreeMap<u64, Complex<f64>> = BTreeMap::new();
            for (index, amp) in self.state.amplitudes() {
                let low = index & !mask;
                let high = index | mask;
                let scaled = *amp * scale;
                // |0> -> (|0> + |1>)/√2, |1> -> (|0> - |1>)/√2
                *next.entry(low).or_insert_with(Complex::zero) += scaled;
                if index & mask == 0 {
                    *next.entry(high).or_insert_with(Complex::zero) += scaled;
                } else {
                    *next.entry(high).or_insert_with(Complex::zero) -= scaled;
                }
            }
            self.state.replace(next);
        }
        self.validate()
    }

    /// Marginal probability distribution over `qubits`.
    pub fn marginal(&self, qubits: &[QubitId]) -> Result<MarginalDistribution> {
        if qubits.len() > 64 {
            return Err(GroverError::InvalidOperation {
                message: format!("Cannot marginalise onto {} qubits (max 64)", qubits.len()),
            });
        }
        for qubit in qubits {
            self.check_qubit(*qubit)?;
        }
        let mut probabilities: BTreeMap<u64, f64> = BTreeMap::new();
        for (index, amp) in self.state.iter() {
            let outcome = qubits
                .iter()
                .enumerate()
                .fold(0u64, |acc, (j, q)| if index & q.mask() != 0 { acc | (1u64 << j) } else { acc });
            *probabilities.entry(outcome).or_default() += amp.norm_sqr();
        }
        Ok(MarginalDistribution::new(qubits.to_vec(), probabilities))
    }

    /// Draws one joint outcome of `qubits` without disturbing the state.
    /// Bit `j` of the result is the value observed on `qubits[j]`.
    pub fn sample_bits<R: Rng>(&self, qubits: &[QubitId], rng: &mut R) -> Result<Vec<bool>> {
        let marginal = self.marginal(qubits)?;
        let outcome = marginal.sample(rng).ok_or(GroverError::NormalizationError {
            norm: marginal.total(),
            tolerance: self.norm_tolerance,
        })?;
        Ok(marginal.to_bits(outcome))
    }

    /// Checks the normalization invariant on the current state.
    pub fn validate(&self) -> Result<()> {
        check_normalization(&self.state, Some(self.norm_tolerance))
    }

    fn check_qubit(&self, qubit: QubitId) -> Result<()> {
        if qubit.0 >= self.state.num_qubits() {
            return Err(GroverError::InvalidOperation {
                message: format!("{} is outside the {}-qubit register", qubit, self.state.num_qubits()),
            });
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: AmplitudeState) -> Result<()> {
        if state.num_qubits() != self.state.num_qubits() {
            return Err(GroverError::InvalidOperation {
                message: format!(
                    "Cannot set state: provided width {} does not match engine width {}",
                    state.num_qubits(),
                    self.state.num_qubits()
                ),
            });
        }
        self.state = state;
        Ok(())
    }
}
