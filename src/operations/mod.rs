// src/operations/mod.rs

//! Defines the reversible gate operations a circuit is made of.
//!
//! Every variant is its own inverse: applying the same operation twice in a
//! row leaves the state unchanged. Uncomputation relies on this, replaying a
//! sub-circuit verbatim instead of deriving an inverse for it.

use crate::core::QubitId;

/// A single gate applied to the amplitude state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Swaps the amplitudes of every index pair that differs only in `target`.
    ///
    /// Analogy: the X / NOT gate.
    BitFlip {
        /// The qubit to flip.
        target: QubitId,
    },

    /// Flips `target` on every basis index whose `controls` bits are all set.
    /// An empty control set degenerates to [`Operation::BitFlip`].
    ///
    /// Analogy: CNOT, Toffoli and their multi-controlled generalisations.
    ControlledBitFlip {
        /// Qubits that must all be 1 for the flip to happen.
        controls: Vec<QubitId>,
        /// The qubit that gets flipped.
        target: QubitId,
    },

    /// Applies the 1/√2 `[[1, 1], [1, -1]]` transform to each listed qubit
    /// independently.
    ///
    /// Analogy: a layer of Hadamard gates.
    UniformSuperposition {
        /// The qubits receiving the transform.
        targets: Vec<QubitId>,
    },
}

impl Operation {
    /// Returns a list of all qubits the operation reads or writes.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        match self {
            Operation::BitFlip { target } => vec![*target],
            Operation::ControlledBitFlip { controls, target } => {
                let mut qubits = controls.clone();
                qubits.push(*target);
                qubits
            }
            Operation::UniformSuperposition { targets } => targets.clone(),
        }
    }

    /// Highest qubit index touched, if any.
    pub fn max_qubit(&self) -> Option<QubitId> {
        self.involved_qubits().into_iter().max()
    }

    /// Rewrites every qubit `q` to `mapping[q]`. Returns `None` when a qubit
    /// has no entry in `mapping`.
    pub fn remap(&self, mapping: &[QubitId]) -> Option<Operation> {
        let map = |q: &QubitId| mapping.get(q.0).copied();
        Some(match self {
            Operation::BitFlip { target } => Operation::BitFlip { target: map(target)? },
            Operation::ControlledBitFlip { controls, target } => Operation::ControlledBitFlip {
                controls: controls.iter().map(map).collect::<Option<Vec<_>>>()?,
                target: map(target)?,
            },
            Operation::UniformSuperposition { targets } => Operation::UniformSuperposition {
                targets: targets.iter().map(map).collect::<Option<Vec<_>>>()?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qid(id: usize) -> QubitId {
        QubitId(id)
    }

    #[test]
    fn test_involved_qubits_lists_controls_then_target() {
        let op = Operation::ControlledBitFlip { controls: vec![qid(0), qid(2)], target: qid(5) };
        assert_eq!(op.involved_qubits(), vec![qid(0), qid(2), qid(5)]);
        assert_eq!(op.max_qubit(), Some(qid(5)));
    }

    #[test]
    fn test_remap_moves_every_qubit() {
        let op = Operation::ControlledBitFlip { controls: vec![qid(0)], target: qid(1) };
        let mapped = op.remap(&[qid(10), qid(11)]);
        assert_eq!(mapped, Some(Operation::ControlledBitFlip { controls: vec![qid(10)], target: qid(11) }));
        assert_eq!(op.remap(&[qid(10)]), None);
    }
}
