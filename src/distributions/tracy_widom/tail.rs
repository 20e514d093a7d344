use super::Beta;
use crate::primitives::util::{brent_root, SolverError, SolverResult};

use std::fmt;
use tracing::trace;

// Candidate intervals for the correction parameter `u`, tried in order.
const U_BRACKETS: [(f64, f64); 3] = [(-1.0, 1.0), (-5.0, -3.0), (715.0, 725.0)];

// Root search tolerances.
const XTOL: f64 = 2.0e-12;
const RTOL: f64 = 4.0 * f64::EPSILON;
const MAX_ITER: u32 = 100;

// Number of fixed-point updates when inverting a tail.
const INVERSE_ITERATIONS: usize = 3;

// exp(ζ'(-1)) * 2^(1/24)
const TAU_0: f64 = 0.872_371_414_954_127;

/// Side of the distribution covered by an asymptotic tail.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TailSide {
    /// Tail at `x → -∞`, approximating the CDF.
    Left,
    /// Tail at `x → +∞`, approximating the complementary CDF.
    Right,
}

impl fmt::Display for TailSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TailSide::Left => f.write_str("left"),
            TailSide::Right => f.write_str("right"),
        }
    }
}

/// Asymptotic expansion of a Tracy-Widom tail.
///
/// The tail probability at distance `x > 0` from the origin is approximated
/// by:
///
/// ```text
/// f(x) = N exp(-s(a s + b)) / x^c * (1 + (u + v / s) / s)
/// ```
///
/// where `s = x^(3/2)`. Constants `N`, `a`, `b` and `c` follow from the
/// leading-order asymptotics of each ensemble while `u` and `v` are
/// corrections fitted against the tabulated CDF.
///
/// For the left tail, `x` is the reflected abscissa and `f` is the CDF; for the
/// right tail, `f` is the complementary CDF.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TailParams {
    pub n: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub u: f64,
    pub v: f64,
}

impl TailParams {
    /// Leading-order parameters of the tail on the specified side.
    pub(super) fn leading_order(beta: Beta, side: TailSide) -> Self {
        let (n, a, b, c) = match (side, beta) {
            (TailSide::Left, Beta::One) => (
                TAU_0.sqrt() / 2f64.powf(0.25),
                1.0 / 24.0,
                2f64.powf(-0.5) / 3.0,
                1.0 / 16.0,
            ),
            (TailSide::Left, Beta::Two) => (TAU_0, 1.0 / 12.0, 0.0, 1.0 / 8.0),
            (TailSide::Left, Beta::Four) => (
                TAU_0.sqrt() / 2f64.powf(38.0 / 48.0),
                1.0 / 6.0,
                -(2f64.sqrt()) / 3.0,
                1.0 / 16.0,
            ),
            (TailSide::Right, Beta::One) => (0.25 / std::f64::consts::PI.sqrt(), 0.0, 2.0 / 3.0, 0.75),
            (TailSide::Right, Beta::Two) => (1.0 / (16.0 * std::f64::consts::PI), 0.0, 4.0 / 3.0, 1.5),
            (TailSide::Right, Beta::Four) => (1.0 / (512.0 * std::f64::consts::PI), 0.0, 8.0 / 3.0, 3.0),
        };

        Self { n, a, b, c, u: 0.0, v: 0.0 }
    }

    fn with_correction(self, u: f64, v: f64) -> Self {
        Self { u, v, ..self }
    }

    /// Evaluates the tail probability at `x > 0`.
    pub fn eval(&self, x: f64) -> f64 {
        let s = x.powf(1.5);
        if s == f64::INFINITY {
            return 0.0;
        }

        self.n * (-s * (s * self.a + self.b)).exp() / x.powf(self.c)
            * (1.0 + (self.u + self.v / s) / s)
    }

    /// Evaluates the logarithmic derivative `f'(x)/f(x)` of the tail at `x > 0`.
    pub fn log_derivative(&self, x: f64) -> f64 {
        let s = x.powf(1.5);
        let correction = 1.5 * (s * self.u + 2.0 * self.v) / ((s + self.u) * s + self.v);

        -(3.0 * self.a * s * s + 1.5 * self.b * s + self.c + correction) / x
    }

    /// Solves `f(x) = y` for `x`.
    ///
    /// Taking the logarithm of the tail expansion gives:
    ///
    /// ```text
    /// a s² + b s + c ln(x) + ln(y / N) = ln(1 + u / s + v / s²)
    /// ```
    ///
    /// which is solved for `s` as a quadratic (or linear if `a = 0`) equation
    /// with the logarithmic terms frozen, starting from the leading-order
    /// solution and updating the frozen terms a fixed number of times.
    ///
    /// Iterates at which the correction factor `1 + u/s + v/s²` is not
    /// positive are moved to twice the largest root of that factor.
    ///
    /// A non-positive `y` maps to `x = +∞`.
    pub fn inverse(&self, y: f64) -> f64 {
        if y <= 0.0 {
            return f64::INFINITY;
        }
        let log_yn = (y / self.n).ln();
        let solve = |k: f64| {
            let s = if self.a != 0.0 {
                ((self.b * self.b - 4.0 * self.a * k).sqrt() - self.b) / (2.0 * self.a)
            } else {
                -k / self.b
            };

            s.powf(2.0 / 3.0)
        };

        // Largest root in `s` of `s² + u s + v`.
        let discriminant = self.u * self.u - 4.0 * self.v;
        let s_min = if discriminant >= 0.0 {
            (0.5 * (discriminant.sqrt() - self.u)).max(0.0)
        } else {
            0.0
        };
        let guard = |x: f64| {
            if s_min > 0.0 && x.powf(1.5) <= s_min {
                (2.0 * s_min).powf(2.0 / 3.0)
            } else {
                x
            }
        };

        let mut x = guard(solve(log_yn));
        for _ in 0..INVERSE_ITERATIONS {
            let s = x.powf(1.5);
            x = guard(solve(
                self.c * x.ln() + log_yn - (self.u / s + self.v / (s * s)).ln_1p(),
            ));
        }

        x
    }

    /// Fits the corrections `u` and `v` so that the tail and its logarithmic
    /// derivative take the prescribed values `f` and `dlnf` at `x`.
    ///
    /// Matching the logarithmic derivative makes `v` an affine function of
    /// `u`; the remaining equation in `u` is solved with Brent's method over
    /// a few candidate intervals, in order, until one brackets a root.
    ///
    /// Returns the calibrated parameters together with the bracket that
    /// produced the root.
    pub(super) fn calibrate(self, x: f64, f: f64, dlnf: f64) -> SolverResult<(Self, (f64, f64))> {
        let s = x.powf(1.5);
        let xd2 = 2.0 * x * (dlnf - self.log_derivative(x));
        let v_of_u = |u: f64| -s * ((xd2 + 3.0) * u + xd2 * s) / (xd2 + 6.0);
        let mismatch = |u: f64| f / self.with_correction(u, v_of_u(u)).eval(x) - 1.0;

        let mut error = SolverError::NotBracketed {
            lower: U_BRACKETS[0].0,
            upper: U_BRACKETS[0].1,
        };
        for &(lower, upper) in U_BRACKETS.iter() {
            match brent_root(&mismatch, lower, upper, XTOL, RTOL, MAX_ITER) {
                Ok(u) => return Ok((self.with_correction(u, v_of_u(u)), (lower, upper))),
                Err(e) => {
                    trace!(lower, upper, error = %e, "bracket rejected");
                    error = e;
                }
            }
        }

        Err(error)
    }
}
