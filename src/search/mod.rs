// src/search/mod.rs

//! Amplitude-amplification driver.
//!
//! A search runs through a fixed sequence of phases:
//! `Initialized -> Iterating(0..k) -> Sampled -> Decoded -> Verified`.
//! Only sampling is random; the iteration count and every circuit are fully
//! determined by the table, the target and the key width.

use crate::circuits::Circuit;
use crate::core::{GroverError, Record, RegisterLayout, Result, DEFAULT_NORM_TOLERANCE, MAX_KEY_WIDTH, VALUE_WIDTH};
use crate::diffusion::diffusion;
use crate::oracle::DatabaseOracle;
use crate::simulation::{MarginalDistribution, SimulationEngine};
use crate::validation::fits_in;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::f64::consts::PI;
use std::fmt;
use tracing::{debug, trace};

/// Outcome of one search. Never mutated after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchResult {
    /// A key whose record holds the target value, checked against the table.
    Found(u64),
    /// The target is absent, or the single sample missed it.
    NotFound,
}

impl SearchResult {
    /// The found key, if any.
    pub fn key(&self) -> Option<u64> {
        match self {
            SearchResult::Found(key) => Some(*key),
            SearchResult::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found(_))
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchResult::Found(key) => write!(f, "Found({})", key),
            SearchResult::NotFound => write!(f, "NotFound"),
        }
    }
}

/// Tunables for a search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Seed for the sampling RNG. `None` draws a fresh seed per search.
    pub seed: Option<u64>,
    /// Allowed drift of `sum(|a|^2)` from 1.0 after any gate.
    pub norm_tolerance: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            norm_tolerance: DEFAULT_NORM_TOLERANCE,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.norm_tolerance = tolerance;
        self
    }
}

/// `floor(π/4 · √N)` with `N = 2^key_width`: the optimal number of Grover
/// iterations for exactly one marked key.
///
/// # Errors
/// `InvalidConfiguration` when `key_width` is 0 or above `MAX_KEY_WIDTH`.
pub fn optimal_iterations(key_width: usize) -> Result<usize> {
    check_key_width(key_width)?;
    Ok(iteration_count(key_width))
}

/// `sin²((2k+1)θ)` with `θ = asin(1/√N)` and `k = optimal_iterations`:
/// the probability of sampling the single marked key.
///
/// # Errors
/// `InvalidConfiguration` when `key_width` is 0 or above `MAX_KEY_WIDTH`.
pub fn theoretical_success_probability(key_width: usize) -> Result<f64> {
    check_key_width(key_width)?;
    let n = (1u64 << key_width) as f64;
    let theta = (1.0 / n.sqrt()).asin();
    let k = iteration_count(key_width) as f64;
    Ok(((2.0 * k + 1.0) * theta).sin().powi(2))
}

/// Packs bits (least significant first) into an unsigned integer.
///
/// # Errors
/// `InvalidOperation` when given more than 64 bits.
pub fn decode_bits(bits: &[bool]) -> Result<u64> {
    if bits.len() > 64 {
        return Err(GroverError::InvalidOperation {
            message: format!("Cannot pack {} bits into a u64", bits.len()),
        });
    }
    Ok(bits.iter().enumerate().fold(0u64, |acc, (i, bit)| if *bit { acc | (1u64 << i) } else { acc }))
}

fn check_key_width(key_width: usize) -> Result<()> {
    if key_width == 0 || key_width > MAX_KEY_WIDTH {
        return Err(GroverError::InvalidConfiguration {
            message: format!("key width {} outside supported range 1..={}", key_width, MAX_KEY_WIDTH),
        });
    }
    Ok(())
}

// Callers have already checked the width.
fn iteration_count(key_width: usize) -> usize {
    let n = (1u64 << key_width) as f64;
    (PI / 4.0 * n.sqrt()).floor() as usize
}

/// Searches `table` for a key whose value equals `target`.
///
/// One amplitude-amplification run followed by a single sample that is
/// verified against the table. Callers wanting more confidence run it
/// several times.
pub fn search(table: &[Record], target: u64, key_width: usize) -> Result<SearchResult> {
    GroverSearch::new(table, target, key_width)?.search()
}

/// Drives one amplitude-amplification search over a record table.
#[derive(Debug, Clone)]
pub struct GroverSearch<'a> {
    table: &'a [Record],
    target: u64,
    key_width: usize,
    layout: RegisterLayout,
    config: SearchConfig,
}

impl<'a> GroverSearch<'a> {
    /// Checks the configuration. No simulation happens here.
    ///
    /// # Errors
    /// `InvalidConfiguration` when `key_width` is 0 or above
    /// `MAX_KEY_WIDTH`, when `2^key_width < table.len()`, or when `target`
    /// does not fit in 32 bits.
    pub fn new(table: &'a [Record], target: u64, key_width: usize) -> Result<Self> {
        check_key_width(key_width)?;
        let capacity = 1u64 << key_width;
        if (table.len() as u64) > capacity {
            return Err(GroverError::InvalidConfiguration {
                message: format!(
                    "{} records do not fit in a {}-bit key register (capacity {})",
                    table.len(),
                    key_width,
                    capacity
                ),
            });
        }
        if !fits_in(target, VALUE_WIDTH) {
            return Err(GroverError::InvalidConfiguration {
                message: format!("target value {} does not fit in {} bits", target, VALUE_WIDTH),
            });
        }
        debug!(records = table.len(), target_value = target, key_width, "search configured");
        Ok(Self {
            table,
            target,
            key_width,
            layout: RegisterLayout::new(key_width),
            config: SearchConfig::default(),
        })
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn layout(&self) -> &RegisterLayout {
        &self.layout
    }

    /// Number of oracle + diffusion rounds this search applies.
    pub fn iterations(&self) -> usize {
        iteration_count(self.key_width)
    }

    /// Runs the iterations and returns the distribution over key-register
    /// outcomes that sampling would draw from.
    pub fn amplify(&self) -> Result<MarginalDistribution> {
        let engine = self.run()?;
        engine.marginal(&self.layout.key().qubits())
    }

    /// Amplifies, samples the key register once, decodes and verifies.
    pub fn search(&self) -> Result<SearchResult> {
        let engine = self.run()?;

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let bits = engine.sample_bits(&self.layout.key().qubits(), &mut rng)?;
        let candidate = decode_bits(&bits)?;
        debug!(candidate, seed, "sampled key register");

        let result = self.verify(candidate);
        match result {
            SearchResult::Found(key) => debug!(key, "candidate verified"),
            SearchResult::NotFound => debug!(candidate, target_value = self.target, "candidate failed verification"),
        }
        Ok(result)
    }

    /// Checks `candidate` against the table. Only a record with that key and
    /// the target value counts as a hit.
    pub fn verify(&self, candidate: u64) -> SearchResult {
        if self.table.iter().any(|r| r.id == candidate && r.value == self.target) {
            SearchResult::Found(candidate)
        } else {
            SearchResult::NotFound
        }
    }

    /// Builds both circuits placed onto the full layout.
    fn circuits(&self) -> Result<(Circuit, Circuit)> {
        let oracle = DatabaseOracle::new(self.table, self.target, self.key_width)?
            .build()
            .remap(&self.layout.all_qubits())?;
        let diffusion = diffusion(self.key_width)?.remap(&self.layout.key().qubits())?;
        Ok((oracle, diffusion))
    }

    fn run(&self) -> Result<SimulationEngine> {
        // Record errors surface here, before any state exists.
        let (oracle, diffusion) = self.circuits()?;
        let iterations = self.iterations();
        debug!(iterations, oracle_ops = oracle.len(), diffusion_ops = diffusion.len(), "circuits built");

        let mut engine =
            SimulationEngine::init(self.layout.num_qubits())?.with_norm_tolerance(self.config.norm_tolerance);
        engine.apply_uniform_superposition(&self.layout.key().qubits())?;
        // Ancilla in (|0> - |1>)/√2 turns the oracle's ancilla toggle into a
        // phase flip on marked keys.
        let ancilla = self.layout.ancilla_qubit();
        engine.apply_bit_flip(ancilla)?;
        engine.apply_uniform_superposition(&[ancilla])?;

        for i in 0..iterations {
            engine.apply_circuit(&oracle)?;
            engine.apply_circuit(&diffusion)?;
            trace!(iteration = i + 1, support = engine.state().support_len(), "grover iteration");
        }
        engine.validate()?;
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Record> {
        [(1, 42), (2, 17), (3, 73), (4, 29), (5, 55)].into_iter().map(Record::from).collect()
    }

    #[test]
    fn test_iteration_count_formula() -> Result<()> {
        assert_eq!(optimal_iterations(2)?, 1);
        assert_eq!(optimal_iterations(3)?, 2);
        assert_eq!(optimal_iterations(4)?, 3);
        assert_eq!(optimal_iterations(5)?, 4);
        assert_eq!(optimal_iterations(MAX_KEY_WIDTH)?, 25);
        for n in 2..=5 {
            let expected = (PI / 4.0 * ((1u64 << n) as f64).sqrt()).floor() as usize;
            assert_eq!(optimal_iterations(n)?, expected);
        }
        Ok(())
    }

    #[test]
    fn test_theoretical_probability_for_eight_keys() -> Result<()> {
        let theta = (1.0f64 / 8.0f64.sqrt()).asin();
        let expected = (5.0 * theta).sin().powi(2);
        assert!((theoretical_success_probability(3)? - expected).abs() < 1e-12);
        assert!(theoretical_success_probability(3)? > 0.94);
        Ok(())
    }

    #[test]
    fn test_closed_forms_reject_unsupported_widths() {
        for width in [0, MAX_KEY_WIDTH + 1, 64, 200] {
            assert!(matches!(optimal_iterations(width), Err(GroverError::InvalidConfiguration { .. })));
            assert!(matches!(
                theoretical_success_probability(width),
                Err(GroverError::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn test_decode_bits_is_lsb_first() -> Result<()> {
        assert_eq!(decode_bits(&[true, true, false])?, 3);
        assert_eq!(decode_bits(&[false, false, true])?, 4);
        assert_eq!(decode_bits(&[])?, 0);
        let mut top = vec![false; 64];
        top[63] = true;
        assert_eq!(decode_bits(&top)?, 1u64 << 63);
        Ok(())
    }

    #[test]
    fn test_decode_bits_rejects_more_than_64_bits() {
        assert!(matches!(decode_bits(&[true; 65]), Err(GroverError::InvalidOperation { .. })));
    }

    #[test]
    fn test_configuration_errors() {
        let table = table();
        assert!(matches!(GroverSearch::new(&table, 73, 2), Err(GroverError::InvalidConfiguration { .. })));
        assert!(matches!(GroverSearch::new(&table, 73, 0), Err(GroverError::InvalidConfiguration { .. })));
        assert!(matches!(
            GroverSearch::new(&table, 73, MAX_KEY_WIDTH + 1),
            Err(GroverError::InvalidConfiguration { .. })
        ));
        assert!(matches!(GroverSearch::new(&table, 1u64 << 32, 3), Err(GroverError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_verify_requires_key_and_value() -> Result<()> {
        let table = table();
        let search = GroverSearch::new(&table, 73, 3)?;
        assert_eq!(search.verify(3), SearchResult::Found(3));
        assert_eq!(search.verify(2), SearchResult::NotFound);
        assert_eq!(search.verify(7), SearchResult::NotFound);
        Ok(())
    }

    #[test]
    fn test_config_builder() {
        let config = SearchConfig::new().with_seed(9).with_norm_tolerance(1e-8);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.norm_tolerance, 1e-8);
        assert_eq!(SearchConfig::default().norm_tolerance, DEFAULT_NORM_TOLERANCE);
    }

    #[test]
    fn test_result_accessors() {
        assert_eq!(SearchResult::Found(4).key(), Some(4));
        assert!(!SearchResult::NotFound.is_found());
        assert_eq!(SearchResult::Found(4).to_string(), "Found(4)");
    }
}
