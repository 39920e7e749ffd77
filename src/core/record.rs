// src/core/record.rs

/// One `(key, value)` row of the lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Record {
    /// Surrogate key, must fit in the key register.
    pub id: u64,
    /// Stored value, must fit in 32 bits.
    pub value: u64,
}

impl Record {
    /// Creates a record mapping key `id` to `value`.
    pub fn new(id: u64, value: u64) -> Self {
        Self { id, value }
    }
}

impl From<(u64, u64)> for Record {
    fn from((id, value): (u64, u64)) -> Self {
        Self { id, value }
    }
}
