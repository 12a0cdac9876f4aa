//! Deterministic phase generator.
//!
//! Tone phases carry no image information; they only decorrelate tones that
//! overlap in time. They still have to be reproducible, so every draw comes
//! from a PCG32 seeded from the config instead of process-wide state.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Draws a phase uniformly from `[0, 2π)`.
#[inline]
pub fn random_phase(rng: &mut Pcg32) -> f64 {
    rng.gen::<f64>() * TAU
}
