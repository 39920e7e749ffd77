// src/simulation/mod.rs

//! Applies circuits to an amplitude state and reads outcomes back out.
//!
//! `SimulationEngine` holds the gate primitives; `MarginalDistribution` is
//! what sampling draws from.

mod results;
pub mod engine;

pub use engine::SimulationEngine;
pub use results::MarginalDistribution;
