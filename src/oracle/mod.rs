// src/oracle/mod.rs

//! Reversible database oracle.
//!
//! Embeds a `(key, value)` table into a circuit over the key, value and
//! ancilla registers and marks the keys whose value equals a target:
//!
//! ```text
//! |k>|0>|a>  --lookup-->  |k>|v_k>|a>  --compare-->  |k>|v_k>|a ⊕ [v_k == t]>  --lookup-->  |k>|0>|a ⊕ [v_k == t]>
//! ```
//!
//! The second lookup is the same construction as the first, not a derived
//! inverse. It undoes the first because every gate in it is self-inverse and
//! the per-record blocks only ever touch disjoint basis states.
//!
//! Keys without a record read as value 0, so a target of 0 marks every empty
//! slot along with any real record holding 0. The search driver's iteration
//! count assumes a single marked key, and with several marked keys it can
//! rotate amplitude away from all of them.

use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{GroverError, QubitId, Record, RegisterLayout, Result, MAX_KEY_WIDTH, VALUE_WIDTH};
use crate::validation::{fits_in, validate_table};
use tracing::debug;

/// Builds the lookup, compare and full oracle circuits for one table.
///
/// Circuits are expressed over [`RegisterLayout::new(key_width)`]: key qubits
/// first, then the 32 value qubits, then the ancilla.
#[derive(Debug, Clone)]
pub struct DatabaseOracle<'a> {
    table: &'a [Record],
    target: u64,
    layout: RegisterLayout,
}

impl<'a> DatabaseOracle<'a> {
    /// Validates the inputs and prepares a builder.
    ///
    /// # Errors
    /// * `InvalidConfiguration` if `key_width` is 0 or above `MAX_KEY_WIDTH`,
    ///   or `target` does not fit in 32 bits.
    /// * `InvalidRecord` if a key does not fit in `key_width` bits, a value
    ///   does not fit in 32 bits, or a key repeats.
    pub fn new(table: &'a [Record], target: u64, key_width: usize) -> Result<Self> {
        if key_width == 0 || key_width > MAX_KEY_WIDTH {
            return Err(GroverError::InvalidConfiguration {
                message: format!("key width {} outside supported range 1..={}", key_width, MAX_KEY_WIDTH),
            });
        }
        if !fits_in(target, VALUE_WIDTH) {
            return Err(GroverError::InvalidConfiguration {
                message: format!("target value {} does not fit in {} bits", target, VALUE_WIDTH),
            });
        }
        validate_table(table, key_width)?;
        Ok(Self { table, target, layout: RegisterLayout::new(key_width) })
    }

    pub fn layout(&self) -> &RegisterLayout {
        &self.layout
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// `|k>|w>  ->  |k>|w ⊕ v_k>` for every key `k` present in the table.
    /// Keys absent from the table leave the value register untouched.
    ///
    /// Records are visited in key order. The key register is inverted on the
    /// zero bits of the current key so the full register can act as the
    /// control set; moving to the next key only flips the bits in which the
    /// two inversion patterns differ.
    pub fn lookup(&self) -> Circuit {
        let key = self.layout.key();
        let value = self.layout.value();
        let key_qubits = key.qubits();
        let key_mask = low_mask(key.width());

        let mut records: Vec<&Record> = self.table.iter().filter(|r| r.value != 0).collect();
        records.sort_by_key(|r| r.id);

        let mut builder = CircuitBuilder::new();
        let mut inverted = 0u64;
        for record in records {
            let pattern = !record.id & key_mask;
            builder = builder.flip_each(bits_of(inverted ^ pattern, key.width()).map(|bit| key.qubit(bit)));
            inverted = pattern;
            for bit in bits_of(record.value, VALUE_WIDTH) {
                builder = builder.controlled_flip(key_qubits.clone(), value.qubit(bit));
            }
        }
        builder.flip_each(bits_of(inverted, key.width()).map(|bit| key.qubit(bit))).build()
    }

    /// Toggles the ancilla exactly when the value register equals the target.
    /// All other qubits are restored.
    pub fn compare(&self) -> Circuit {
        let value = self.layout.value();
        let zero_bits: Vec<QubitId> =
            bits_of(!self.target & low_mask(VALUE_WIDTH), VALUE_WIDTH).map(|bit| value.qubit(bit)).collect();

        CircuitBuilder::new()
            .flip_each(zero_bits.iter().copied())
            .controlled_flip(value.qubits(), self.layout.ancilla_qubit())
            .flip_each(zero_bits.iter().copied())
            .build()
    }

    /// `lookup ; compare ; lookup`, each lookup built afresh.
    pub fn build(&self) -> Circuit {
        let oracle = CircuitBuilder::new()
            .add_circuit(&self.lookup())
            .add_circuit(&self.compare())
            .add_circuit(&self.lookup())
            .build();
        debug!(records = self.table.len(), ops = oracle.len(), "built database oracle");
        oracle
    }
}

fn low_mask(width: usize) -> u64 {
    if width >= 64 { u64::MAX } else { (1u64 << width) - 1 }
}

/// Positions of the set bits of `word` below `width`, ascending.
fn bits_of(word: u64, width: usize) -> impl Iterator<Item = usize> {
    (0..width).filter(move |bit| (word >> bit) & 1 == 1)
}

/// Validates `table` and returns the full oracle circuit for `target`.
pub fn build_oracle(table: &[Record], target: u64, key_width: usize) -> Result<Circuit> {
    Ok(DatabaseOracle::new(table, target, key_width)?.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AmplitudeState;
    use crate::operations::Operation;
    use crate::simulation::SimulationEngine;
    use num_complex::Complex;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn table() -> Vec<Record> {
        [(1, 42), (2, 17), (3, 73), (4, 29), (5, 55)].into_iter().map(Record::from).collect()
    }

    fn basis_engine(layout: &RegisterLayout, key: u64, value: u64, ancilla: u64) -> Result<SimulationEngine> {
        let index = (key << layout.key().offset()) | (value << layout.value().offset()) | (ancilla << layout.ancilla().offset());
        let state = AmplitudeState::from_amplitudes(layout.num_qubits(), vec![(index, Complex::new(1.0, 0.0))])?;
        Ok(SimulationEngine::from_state(state))
    }

    fn single_index(engine: &SimulationEngine) -> u64 {
        let entries: Vec<(u64, Complex<f64>)> = engine.state().iter().collect();
        assert_eq!(entries.len(), 1, "expected a basis state, got {}", engine.state());
        assert!((entries[0].1.norm_sqr() - 1.0).abs() < TEST_TOLERANCE);
        entries[0].0
    }

    #[test]
    fn test_lookup_writes_only_matching_key() -> Result<()> {
        let table = table();
        let oracle = DatabaseOracle::new(&table, 73, 3)?;
        let layout = oracle.layout().clone();
        let lookup = oracle.lookup();

        for key in 0..8u64 {
            let mut engine = basis_engine(&layout, key, 0, 0)?;
            engine.apply_circuit(&lookup)?;
            let index = single_index(&engine);
            let expected = table.iter().find(|r| r.id == key).map(|r| r.value).unwrap_or(0);
            assert_eq!(layout.key().extract(index), key, "key register changed for key {}", key);
            assert_eq!(layout.value().extract(index), expected, "wrong value for key {}", key);
            assert_eq!(layout.ancilla().extract(index), 0);
        }
        Ok(())
    }

    #[test]
    fn test_lookup_handles_key_zero() -> Result<()> {
        let table = vec![Record::new(0, 9), Record::new(3, 4)];
        let oracle = DatabaseOracle::new(&table, 4, 2)?;
        let layout = oracle.layout().clone();
        for (key, expected) in [(0u64, 9u64), (1, 0), (2, 0), (3, 4)] {
            let mut engine = basis_engine(&layout, key, 0, 0)?;
            engine.apply_circuit(&oracle.lookup())?;
            assert_eq!(layout.value().extract(single_index(&engine)), expected);
        }
        Ok(())
    }

    #[test]
    fn test_lookup_twice_is_identity() -> Result<()> {
        let table = table();
        let oracle = DatabaseOracle::new(&table, 73, 3)?;
        let layout = oracle.layout().clone();

        // Arbitrary superposition with junk already in the value register.
        let entries = vec![
            (0b011 | (5u64 << 3), Complex::new(0.5, 0.0)),
            (0b001 | (0xdead_beefu64 << 3), Complex::new(0.0, 0.5)),
            (0b110 | (1u64 << 35), Complex::new(-0.5, 0.0)),
            (0b101, Complex::new(0.5, 0.0)),
        ];
        let initial = AmplitudeState::from_amplitudes(layout.num_qubits(), entries)?;
        let mut engine = SimulationEngine::from_state(initial.clone());
        engine.apply_circuit(&oracle.lookup())?;
        assert_ne!(engine.state(), &initial);
        engine.apply_circuit(&oracle.lookup())?;
        assert_eq!(engine.state(), &initial);
        Ok(())
    }

    #[test]
    fn test_lookup_shares_key_inversions_between_records() -> Result<()> {
        let table: Vec<Record> = (0..8u64).map(|k| Record::new(k, k + 1)).collect();
        let oracle = DatabaseOracle::new(&table, 4, 3)?;
        let flips = |circuit: &Circuit| {
            circuit.operations().iter().filter(|op| matches!(op, Operation::BitFlip { .. })).count()
        };
        // Inverting 111 for key 0, then one flip per differing bit between
        // consecutive keys: 3 + (1 + 2 + 1 + 3 + 1 + 2 + 1).
        assert_eq!(flips(&oracle.lookup()), 14);

        // Table order does not change the circuit.
        let reversed: Vec<Record> = table.iter().rev().copied().collect();
        assert_eq!(DatabaseOracle::new(&reversed, 4, 3)?.lookup(), oracle.lookup());
        Ok(())
    }

    #[test]
    fn test_compare_toggles_ancilla_only_on_target() -> Result<()> {
        let table = table();
        let target = 73u64;
        let oracle = DatabaseOracle::new(&table, target, 3)?;
        let layout = oracle.layout().clone();
        let compare = oracle.compare();

        let mut patterns: Vec<u64> = vec![0, target, u32::MAX as u64, 42, 1u64 << 31];
        patterns.extend((0..VALUE_WIDTH).map(|bit| target ^ (1u64 << bit)));
        for value in patterns {
            for ancilla in [0u64, 1] {
                let mut engine = basis_engine(&layout, 0b110, value, ancilla)?;
                engine.apply_circuit(&compare)?;
                let index = single_index(&engine);
                let expected_ancilla = if value == target { ancilla ^ 1 } else { ancilla };
                assert_eq!(layout.value().extract(index), value, "value not restored for {}", value);
                assert_eq!(layout.key().extract(index), 0b110);
                assert_eq!(layout.ancilla().extract(index), expected_ancilla, "ancilla wrong for {}", value);
            }
        }
        Ok(())
    }

    #[test]
    fn test_oracle_marks_matching_key_and_restores_values() -> Result<()> {
        let table = table();
        let oracle = DatabaseOracle::new(&table, 73, 3)?;
        let layout = oracle.layout().clone();
        let circuit = oracle.build();

        for key in 0..8u64 {
            let mut engine = basis_engine(&layout, key, 0, 0)?;
            engine.apply_circuit(&circuit)?;
            let index = single_index(&engine);
            assert_eq!(layout.value().extract(index), 0, "value register not uncomputed for key {}", key);
            assert_eq!(layout.ancilla().extract(index), u64::from(key == 3), "mark wrong for key {}", key);
        }
        Ok(())
    }

    #[test]
    fn test_oracle_is_lookup_compare_lookup() -> Result<()> {
        let table = table();
        let oracle = DatabaseOracle::new(&table, 73, 3)?;
        let lookup = oracle.lookup();
        let compare = oracle.compare();
        let full = oracle.build();

        assert_eq!(full.len(), 2 * lookup.len() + compare.len());
        assert_eq!(&full.operations()[..lookup.len()], lookup.operations());
        assert_eq!(&full.operations()[full.len() - lookup.len()..], lookup.operations());
        Ok(())
    }

    #[test]
    fn test_invalid_inputs() {
        let oversized = vec![Record::new(1, 1u64 << 32)];
        assert!(matches!(build_oracle(&oversized, 1, 3), Err(GroverError::InvalidRecord { id: 1, .. })));

        let wide_key = vec![Record::new(9, 1)];
        assert!(matches!(build_oracle(&wide_key, 1, 3), Err(GroverError::InvalidRecord { id: 9, .. })));

        assert!(matches!(build_oracle(&[], 1u64 << 32, 3), Err(GroverError::InvalidConfiguration { .. })));
        assert!(matches!(build_oracle(&[], 1, 0), Err(GroverError::InvalidConfiguration { .. })));
    }
}
