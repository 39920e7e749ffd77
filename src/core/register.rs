// src/core/register.rs

use super::constants::{ANCILLA_WIDTH, VALUE_WIDTH};
use super::error::QubitId;
use std::fmt;

/// A named, fixed-width contiguous range of qubits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    name: &'static str,
    offset: usize,
    width: usize,
}

impl Register {
    /// Creates a register covering qubits `offset..offset + width`.
    pub fn new(name: &'static str, offset: usize, width: usize) -> Self {
        Self { name, offset, width }
    }

    /// Label used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Index of the register's least significant qubit.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of qubits in the register.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Qubit holding bit `bit` (least significant first) of the register.
    /// Callers index with `bit < width`.
    pub fn qubit(&self, bit: usize) -> QubitId {
        debug_assert!(bit < self.width, "bit {} outside register {}", bit, self.name);
        QubitId(self.offset + bit)
    }

    /// All qubits of the register, least significant first.
    pub fn qubits(&self) -> Vec<QubitId> {
        (self.offset..self.offset + self.width).map(QubitId).collect()
    }

    /// Extracts this register's bits out of a full basis index.
    pub fn extract(&self, basis_index: u64) -> u64 {
        let mask = if self.width >= 64 { u64::MAX } else { (1u64 << self.width) - 1 };
        (basis_index >> self.offset) & mask
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..{}]", self.name, self.offset, self.offset + self.width)
    }
}

/// The key, value and ancilla registers of one search, laid out contiguously
/// in that order. Widths are fixed for the lifetime of the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterLayout {
    key: Register,
    value: Register,
    ancilla: Register,
}

impl RegisterLayout {
    /// Layout for a key register of `key_width` qubits.
    pub fn new(key_width: usize) -> Self {
        let key = Register::new("key", 0, key_width);
        let value = Register::new("value", key_width, VALUE_WIDTH);
        let ancilla = Register::new("ancilla", key_width + VALUE_WIDTH, ANCILLA_WIDTH);
        Self { key, value, ancilla }
    }

    /// Key register, starting at qubit 0.
    pub fn key(&self) -> &Register {
        &self.key
    }

    /// 32-qubit value register, right after the key.
    pub fn value(&self) -> &Register {
        &self.value
    }

    /// One-qubit ancilla register, last in the layout.
    pub fn ancilla(&self) -> &Register {
        &self.ancilla
    }

    /// The single ancilla qubit.
    pub fn ancilla_qubit(&self) -> QubitId {
        self.ancilla.qubit(0)
    }

    /// Total number of qubits across all three registers.
    pub fn num_qubits(&self) -> usize {
        self.key.width + self.value.width + self.ancilla.width
    }

    /// Every qubit in layout order (key, value, ancilla).
    pub fn all_qubits(&self) -> Vec<QubitId> {
        (0..self.num_qubits()).map(QubitId).collect()
    }
}
