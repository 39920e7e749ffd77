// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! gate operations (`grover_db::operations::Operation`).
//!
//! Composition is concatenation. A circuit built over a small local register
//! can be placed onto a subset of a larger register with [`Circuit::remap`].

use crate::core::{GroverError, QubitId, Result};
use crate::operations::Operation;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// An ordered sequence of operations, interpreted as sequential application.
#[derive(Clone, PartialEq, Eq)]
pub struct Circuit {
    /// The unique set of qubits touched by any operation.
    qubits: BTreeSet<QubitId>,

    /// The ordered sequence of operations. Order is significant.
    operations: Vec<Operation>,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self {
            qubits: BTreeSet::new(),
            operations: Vec::new(),
        }
    }

    /// Adds a single operation to the end of the circuit's sequence.
    pub fn add_operation(&mut self, op: Operation) {
        self.qubits.extend(op.involved_qubits());
        self.operations.push(op);
    }

    /// Adds multiple operations from an iterator to the end of the sequence.
    pub fn add_operations<I>(&mut self, ops: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op);
        }
    }

    /// Appends every operation of `other`, in order.
    pub fn extend_from(&mut self, other: &Circuit) {
        self.add_operations(other.operations.iter().cloned());
    }

    /// Returns a copy of this circuit with local qubit `q` moved to
    /// `mapping[q]`.
    ///
    /// # Errors
    /// `InvalidOperation` if some qubit used by the circuit has no entry in
    /// `mapping`.
    pub fn remap(&self, mapping: &[QubitId]) -> Result<Circuit> {
        let mut mapped = Circuit::new();
        for op in &self.operations {
            let moved = op.remap(mapping).ok_or_else(|| GroverError::InvalidOperation {
                message: format!(
                    "Cannot remap {:?}: mapping only covers {} qubits",
                    op,
                    mapping.len()
                ),
            })?;
            mapped.add_operation(moved);
        }
        Ok(mapped)
    }

    /// Returns a reference to the set of unique qubits used by this circuit.
    pub fn qubits(&self) -> &BTreeSet<QubitId> {
        &self.qubits
    }

    /// Returns a slice containing the ordered sequence of operations.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self { circuit: Circuit::new() }
    }

    /// Adds a single operation to the circuit being built.
    pub fn add_op(mut self, op: Operation) -> Self {
        self.circuit.add_operation(op);
        self
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.circuit.add_operations(ops);
        self
    }

    /// Appends a whole sub-circuit.
    pub fn add_circuit(mut self, other: &Circuit) -> Self {
        self.circuit.extend_from(other);
        self
    }

    /// Flips each listed qubit with its own `BitFlip`.
    pub fn flip_each<I>(self, qubits: I) -> Self
    where
        I: IntoIterator<Item = QubitId>,
    {
        self.add_ops(qubits.into_iter().map(|target| Operation::BitFlip { target }))
    }

    /// Adds one `UniformSuperposition` over the listed qubits.
    pub fn superpose(self, targets: Vec<QubitId>) -> Self {
        self.add_op(Operation::UniformSuperposition { targets })
    }

    /// Adds one `ControlledBitFlip`.
    pub fn controlled_flip(self, controls: Vec<QubitId>, target: QubitId) -> Self {
        self.add_op(Operation::ControlledBitFlip { controls, target })
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operations.is_empty() {
            return writeln!(f, "Circuit[0 operations on 0 qubits]");
        }

        let ops = &self.operations;
        let num_ops = ops.len();

        // One row per touched qubit, in ascending order.
        let sorted_qubits: Vec<QubitId> = self.qubits.iter().copied().collect();
        let num_rows = sorted_qubits.len();
        let qubit_to_row: HashMap<QubitId, usize> = sorted_qubits.iter().enumerate().map(|(i, q)| (*q, i)).collect();

        let max_label_width = sorted_qubits.iter().map(|q| format!("{}", q).len()).max().unwrap_or(0);
        let label_padding = " ".repeat(max_label_width + 2);

        const GATE_WIDTH: usize = 5; // e.g., "──X──"
        const WIRE: &str = "─────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] holds the gate or wire segment,
        // v_connect[row][time] the connector drawn below that row.
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; num_rows];
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; num_rows];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!("{}{}{}", H_WIRE.to_string().repeat(pre_dashes), symbol, H_WIRE.to_string().repeat(post_dashes))
            }
        }

        for (t, op) in ops.iter().enumerate() {
            match op {
                Operation::BitFlip { target } => {
                    if let Some(r) = qubit_to_row.get(target) {
                        op_grid[*r][t] = format_gate("X");
                    }
                }
                Operation::ControlledBitFlip { controls, target } => {
                    let rows: Vec<usize> = controls.iter().filter_map(|c| qubit_to_row.get(c).copied()).collect();
                    for r in &rows {
                        op_grid[*r][t] = format_gate("@");
                    }
                    if let Some(r_tgt) = qubit_to_row.get(target) {
                        op_grid[*r_tgt][t] = format_gate("X");
                        let r_min = rows.iter().copied().chain(std::iter::once(*r_tgt)).min().unwrap_or(*r_tgt);
                        let r_max = rows.iter().copied().chain(std::iter::once(*r_tgt)).max().unwrap_or(*r_tgt);
                        for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                            row_vec[t] = V_WIRE;
                        }
                    }
                }
                Operation::UniformSuperposition { targets } => {
                    for target in targets {
                        if let Some(r) = qubit_to_row.get(target) {
                            op_grid[*r][t] = format_gate("H");
                        }
                    }
                }
            }
        }

        writeln!(f, "Circuit[{} operations on {} qubits]", num_ops, num_rows)?;
        for r in 0..num_rows {
            let label = format!("{}: ", sorted_qubits[r]);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_rows - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_ops {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qid(id: usize) -> QubitId {
        QubitId(id)
    }

    #[test]
    fn test_builder_tracks_qubits_in_order() {
        let circuit = CircuitBuilder::new()
            .flip_each(vec![qid(2), qid(0)])
            .controlled_flip(vec![qid(0), qid(2)], qid(4))
            .build();
        assert_eq!(circuit.len(), 3);
        assert_eq!(circuit.qubits().iter().copied().collect::<Vec<_>>(), vec![qid(0), qid(2), qid(4)]);
    }

    #[test]
    fn test_remap_onto_larger_register() -> Result<()> {
        let local = CircuitBuilder::new()
            .superpose(vec![qid(0), qid(1)])
            .controlled_flip(vec![qid(0)], qid(1))
            .build();
        let placed = local.remap(&[qid(7), qid(9)])?;
        assert_eq!(
            placed.operations(),
            &[
                Operation::UniformSuperposition { targets: vec![qid(7), qid(9)] },
                Operation::ControlledBitFlip { controls: vec![qid(7)], target: qid(9) },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_remap_with_short_mapping_fails() {
        let local = CircuitBuilder::new().flip_each(vec![qid(3)]).build();
        assert!(matches!(local.remap(&[qid(0)]), Err(GroverError::InvalidOperation { .. })));
    }

    #[test]
    fn test_display_draws_controls_and_targets() {
        let circuit = CircuitBuilder::new()
            .superpose(vec![qid(0)])
            .controlled_flip(vec![qid(0)], qid(1))
            .build();
        let text = circuit.to_string();
        assert!(text.starts_with("Circuit[2 operations on 2 qubits]"));
        assert!(text.contains("──H────@──"));
        assert!(text.contains(&format!("{}──X──", "─".repeat(5))));
    }
}
