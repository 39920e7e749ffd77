// src/diffusion/mod.rs

//! Inversion about the mean over the key register.

use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{GroverError, QubitId, Result};

/// `H(all) X(all) H(last) CX(all but last -> last) H(last) X(all) H(all)`
/// over qubits `0..key_width`.
///
/// Up to a global phase this is `2|s><s| - I` with `|s>` the uniform
/// superposition, i.e. every amplitude is reflected about the mean.
pub fn diffusion(key_width: usize) -> Result<Circuit> {
    if key_width == 0 {
        return Err(GroverError::InvalidConfiguration {
            message: "diffusion needs at least one key qubit".to_string(),
        });
    }
    let all: Vec<QubitId> = (0..key_width).map(QubitId).collect();
    let last = QubitId(key_width - 1);
    let all_but_last = all[..key_width - 1].to_vec();

    Ok(CircuitBuilder::new()
        .superpose(all.clone())
        .flip_each(all.iter().copied())
        // Multi-controlled phase flip on |1...1>
        .superpose(vec![last])
        .controlled_flip(all_but_last, last)
        .superpose(vec![last])
        .flip_each(all.iter().copied())
        .superpose(all)
        .build())
}
