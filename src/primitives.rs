//! Numerical primitives for tabulated distributions.

use rand_core::RngCore;

// Modules.
pub mod interpolation;
pub mod util;

/// Probability distribution that can be sampled.
pub trait Distribution<T> {
    /// Draws a sample from the distribution.
    fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> T;
}
