// src/lib.rs

//! `grover_db` - Amplitude-amplification search over a key/value table
//!
//! The table is embedded into a reversible lookup circuit, the key whose
//! looked-up value equals a target is marked by an ancilla flip, and Grover
//! iterations concentrate probability on that key before a single sample is
//! drawn and checked against the table.
//!
//! Simulation is exact over a sparse amplitude state and targets small key
//! registers (up to `MAX_KEY_WIDTH` qubits).

pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod validation;
pub mod oracle;
pub mod diffusion;
pub mod search;

// Re-export the most common types for easier top-level use
pub use crate::core::{
    AmplitudeState, GroverError, QubitId, Record, Register, RegisterLayout, Result, MAX_KEY_WIDTH, VALUE_WIDTH,
};
pub use operations::Operation;
pub use circuits::{Circuit, CircuitBuilder};
pub use simulation::{MarginalDistribution, SimulationEngine};
pub use validation::{check_normalization, validate_state, validate_table};
pub use oracle::{build_oracle, DatabaseOracle};
pub use diffusion::diffusion;
pub use search::{
    decode_bits,
    optimal_iterations,
    search,
    theoretical_success_probability,
    GroverSearch,
    SearchConfig,
    SearchResult,
};

// Example 1: Searching a small table
// Five records fit in a 3-bit key register (8 slots), so two Grover
// iterations are applied before the key register is sampled.
/// ```
/// use grover_db::{GroverSearch, Record, SearchConfig, SearchResult, GroverError};
///
/// let table: Vec<Record> = [(1, 42), (2, 17), (3, 73), (4, 29), (5, 55)]
///     .into_iter()
///     .map(Record::from)
///     .collect();
///
/// let search = GroverSearch::new(&table, 73, 3)?
///     .with_config(SearchConfig::new().with_seed(2024));
/// assert_eq!(search.iterations(), 2);
///
/// // Key 3 carries ~94.5% of the probability mass after amplification.
/// let distribution = search.amplify()?;
/// assert!(distribution.probability(3) > 0.94);
///
/// match search.search()? {
///     SearchResult::Found(key) => assert_eq!(key, 3),
///     SearchResult::NotFound => println!("sample missed the marked key"),
/// }
/// # Ok::<(), GroverError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Building the oracle by hand
// The oracle is lookup ; compare ; lookup. Applied to |key=3>|0>|0> it flips
// the ancilla and leaves the value register cleared.
/// ```
/// use grover_db::{AmplitudeState, DatabaseOracle, Record, SimulationEngine, GroverError};
/// use num_complex::Complex;
///
/// let table = vec![Record::new(1, 42), Record::new(3, 73)];
/// let oracle = DatabaseOracle::new(&table, 73, 2)?;
/// let layout = oracle.layout().clone();
///
/// let start = AmplitudeState::from_amplitudes(layout.num_qubits(), vec![(3, Complex::new(1.0, 0.0))])?;
/// let mut engine = SimulationEngine::from_state(start);
/// engine.apply_circuit(&oracle.build())?;
///
/// let marked = 3 | (1u64 << layout.ancilla().offset());
/// assert!((engine.probability_of(marked) - 1.0).abs() < 1e-12);
/// # Ok::<(), GroverError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
