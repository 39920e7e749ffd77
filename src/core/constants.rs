//! Fixed widths and numeric tolerances.

/// Width of the value register. Table values live in `[0, 2^32)`.
pub const VALUE_WIDTH: usize = 32;

/// Width of the ancilla register.
pub const ANCILLA_WIDTH: usize = 1;

/// Largest supported key register.
///
/// Each gate costs time linear in the live support, which holds
/// `2^(key_width + 1)` entries, and a search applies about
/// `records * π/4 * 2^(key_width/2)` oracle gates. A full table at this width
/// finishes in seconds in a release build; each extra key bit multiplies
/// that by roughly 5.7.
pub const MAX_KEY_WIDTH: usize = 10;

/// Default allowed deviation of `sum(|a|^2)` from 1.0.
pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-6;

/// Amplitudes with a squared magnitude below this are dropped from the state.
pub const PRUNE_EPSILON: f64 = 1e-15;
