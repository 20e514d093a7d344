//! Numerical utilities: linear solver, differentiation and root finding.

use crate::num::Func;

mod error;
pub use error::*;

// Tri-diagonal matrix algorithm.
//
// For the sake of efficiency, diagonal terms and RHS are modified in-place.
// All slices have equal length; `a[0]` and `c[m-1]` are not used.
pub(crate) fn solve_tma(a: &[f64], b: &mut [f64], c: &[f64], rhs: &mut [f64], sol: &mut [f64]) {
    let m = a.len();

    // Eliminate the sub-diagonal.
    for i in 1..m {
        let pivot = a[i] / b[i - 1];
        b[i] -= pivot * c[i - 1];
        rhs[i] -= pivot * rhs[i - 1];
    }

    // Solve the remaining upper bi-diagonal system.
    sol[m - 1] = rhs[m - 1] / b[m - 1];
    for i in (0..m - 1).rev() {
        sol[i] = (rhs[i] - c[i] * sol[i + 1]) / b[i];
    }
}

/// Estimates the first derivative of `f` at `x` with Ridders' method.
///
/// Central differences are computed for a sequence of decreasing steps,
/// starting from `h`, and extrapolated to a zero step with a Neville tableau.
/// The extrapolation stops as soon as higher orders no longer improve the
/// estimate.
///
/// Function `f` is only evaluated within `[x - h, x + h]`.
///
/// Returns the derivative together with an estimate of its absolute error.
pub fn ridders_derivative<F: Func>(f: &F, x: f64, h: f64) -> (f64, f64) {
    const TABLEAU_SIZE: usize = 10;
    const STEP_RATIO: f64 = 1.4;
    const STEP_RATIO_SQUARED: f64 = STEP_RATIO * STEP_RATIO;
    // Bail out when the error grows by this factor.
    const SAFE: f64 = 2.0;

    let central = |h: f64| (f.eval(x + h) - f.eval(x - h)) / (2.0 * h);

    let mut a = [[0.0f64; TABLEAU_SIZE]; TABLEAU_SIZE];
    let mut step = h;
    a[0][0] = central(step);

    let mut derivative = a[0][0];
    let mut error = f64::INFINITY;
    for i in 1..TABLEAU_SIZE {
        step /= STEP_RATIO;
        a[0][i] = central(step);

        // Higher-order extrapolations.
        let mut factor = STEP_RATIO_SQUARED;
        for j in 1..=i {
            a[j][i] = (a[j - 1][i] * factor - a[j - 1][i - 1]) / (factor - 1.0);
            factor *= STEP_RATIO_SQUARED;

            let e = (a[j][i] - a[j - 1][i])
                .abs()
                .max((a[j][i] - a[j - 1][i - 1]).abs());
            if e <= error {
                error = e;
                derivative = a[j][i];
            }
        }

        if (a[i][i] - a[i - 1][i - 1]).abs() >= SAFE * error {
            break;
        }
    }

    (derivative, error)
}

/// Estimates the first derivative of `f` at `x` with a five-point central
/// difference of step `h`.
///
/// The truncation error is of order `h⁴`.
#[inline]
pub fn five_point_derivative<F: Func>(f: &F, x: f64, h: f64) -> f64 {
    let d1 = f.eval(x + h) - f.eval(x - h);
    let d2 = f.eval(x + 2.0 * h) - f.eval(x - 2.0 * h);

    (8.0 * d1 - d2) / (12.0 * h)
}

/// Finds a root of `f` within `[lower, upper]` using Brent's method.
///
/// The function must have opposite signs at both ends of the interval,
/// otherwise `SolverError::NotBracketed` is returned. The search stops when
/// the bracket is narrower than `xtol + rtol * |x|`. If convergence is not
/// reached after `max_iter` iterations, `SolverError::NoConvergence` is
/// returned.
pub fn brent_root<F: Func>(
    f: &F,
    lower: f64,
    upper: f64,
    xtol: f64,
    rtol: f64,
    max_iter: u32,
) -> SolverResult<f64> {
    let mut x_pre = lower;
    let mut x_cur = upper;
    let mut f_pre = f.eval(x_pre);
    let mut f_cur = f.eval(x_cur);

    // A NaN at either end does not bracket anything.
    if !(f_pre * f_cur <= 0.0) {
        return Err(SolverError::NotBracketed { lower, upper });
    }
    if f_pre == 0.0 {
        return Ok(x_pre);
    }
    if f_cur == 0.0 {
        return Ok(x_cur);
    }

    // Contrapoint, i.e. the bracket end opposite to the current estimate.
    let mut x_blk = 0.0;
    let mut f_blk = 0.0;
    // Previous and current steps.
    let mut s_pre = 0.0;
    let mut s_cur = 0.0;

    for _ in 0..max_iter {
        if f_pre != 0.0 && f_cur != 0.0 && (f_pre.is_sign_negative() != f_cur.is_sign_negative()) {
            x_blk = x_pre;
            f_blk = f_pre;
            s_pre = x_cur - x_pre;
            s_cur = s_pre;
        }
        if f_blk.abs() < f_cur.abs() {
            x_pre = x_cur;
            x_cur = x_blk;
            x_blk = x_pre;

            f_pre = f_cur;
            f_cur = f_blk;
            f_blk = f_pre;
        }

        let delta = 0.5 * (xtol + rtol * x_cur.abs());
        let s_bisect = 0.5 * (x_blk - x_cur);
        if f_cur == 0.0 || s_bisect.abs() < delta {
            return Ok(x_cur);
        }

        if s_pre.abs() > delta && f_cur.abs() < f_pre.abs() {
            let s_try = if x_pre == x_blk {
                // Secant step.
                -f_cur * (x_cur - x_pre) / (f_cur - f_pre)
            } else {
                // Inverse quadratic interpolation.
                let d_pre = (f_pre - f_cur) / (x_pre - x_cur);
                let d_blk = (f_blk - f_cur) / (x_blk - x_cur);
                -f_cur * (f_blk * d_blk - f_pre * d_pre) / (d_blk * d_pre * (f_blk - f_pre))
            };

            if 2.0 * s_try.abs() < s_pre.abs().min(3.0 * s_bisect.abs() - delta) {
                s_pre = s_cur;
                s_cur = s_try;
            } else {
                s_pre = s_bisect;
                s_cur = s_bisect;
            }
        } else {
            s_pre = s_bisect;
            s_cur = s_bisect;
        }

        x_pre = x_cur;
        f_pre = f_cur;
        if s_cur.abs() > delta {
            x_cur += s_cur;
        } else {
            x_cur += if s_bisect > 0.0 { delta } else { -delta };
        }
        f_cur = f.eval(x_cur);
    }

    Err(SolverError::NoConvergence {
        iteration_count: max_iter,
    })
}
