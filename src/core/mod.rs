// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod record;
pub mod register;
pub mod state;
pub mod constants;

// Re-export public types for convenient access via `grover_db::core::TypeName`
pub use error::{GroverError, QubitId, Result};
pub use record::Record;
pub use register::{Register, RegisterLayout};
pub use state::AmplitudeState;
pub use constants::{ANCILLA_WIDTH, DEFAULT_NORM_TOLERANCE, MAX_KEY_WIDTH, PRUNE_EPSILON, VALUE_WIDTH};
