use rand_core::RngCore;

/// Univariate real function.
///
/// This trait is implemented for all `Fn(f64) -> f64` closures, so numerical
/// routines can accept either closures or dedicated function objects.
pub trait Func {
    fn eval(&self, x: f64) -> f64;
}

impl<F: Fn(f64) -> f64> Func for F {
    #[inline(always)]
    fn eval(&self, x: f64) -> f64 {
        self(x)
    }
}

// Number of explicitly stored bits in the significand of an `f64`.
const SIGNIFICAND_BITS: u32 = 52;

/// Generates a uniformly distributed number within the open interval (0, 1).
///
/// The 52 leftmost bits of a random `u64` fill the significand; the result is
/// then shifted by half a step so that neither 0 nor 1 can be produced.
#[inline(always)]
pub fn gen_open01<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    let scale = 1.0 / (1u64 << SIGNIFICAND_BITS) as f64;
    let r = rng.next_u64() >> (u64::BITS - SIGNIFICAND_BITS);

    (r as f64 + 0.5) * scale
}
