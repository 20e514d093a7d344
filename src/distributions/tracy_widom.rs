use crate::num::gen_open01;
use crate::primitives::interpolation::{CubicSpline, LinearInterpolator};
use crate::primitives::util::{five_point_derivative, ridders_derivative, SolverError};
use crate::primitives::Distribution;

use rand_core::RngCore;
use std::convert::TryFrom;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

mod table;
mod tail;

pub use tail::{TailParams, TailSide};

// Initial step for the boundary log-derivatives, smaller than the table
// spacing so that the spline is never evaluated outside its domain.
const BOUNDARY_DIFF_STEP: f64 = 3.33e-3;

// Step of the five-point stencil used for the PDF.
const PDF_STEP: f64 = 0.08;

// Abscissae sampled to build the inverse CDF table.
const INVERSE_GRID_START: f64 = -8.0;
const INVERSE_GRID_END: f64 = 4.0;
const INVERSE_GRID_NODES: usize = 2401;

/// Dyson index of a Gaussian ensemble.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Beta {
    /// Gaussian orthogonal ensemble.
    One,
    /// Gaussian unitary ensemble.
    Two,
    /// Gaussian symplectic ensemble.
    Four,
}

impl Beta {
    /// Numerical value of the index.
    pub fn value(self) -> u32 {
        match self {
            Beta::One => 1,
            Beta::Two => 2,
            Beta::Four => 4,
        }
    }
}

impl Default for Beta {
    fn default() -> Self {
        Beta::Two
    }
}

impl TryFrom<u32> for Beta {
    type Error = TracyWidomError;

    fn try_from(beta: u32) -> Result<Self, Self::Error> {
        match beta {
            1 => Ok(Beta::One),
            2 => Ok(Beta::Two),
            4 => Ok(Beta::Four),
            _ => Err(TracyWidomError::BadBeta(beta)),
        }
    }
}

impl fmt::Display for Beta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Error type for Tracy-Widom distribution construction failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TracyWidomError {
    /// The ensemble parameter is not 1, 2 or 4.
    #[error("the ensemble parameter should be 1, 2 or 4, got {0}")]
    BadBeta(u32),
    /// The embedded CDF table is inconsistent with its abscissa grid.
    #[error("the CDF table for beta = {beta} holds {len} bytes instead of {expected}")]
    CorruptTable {
        beta: Beta,
        len: usize,
        expected: usize,
    },
    /// The asymptotic tail could not be matched to the tabulated CDF.
    #[error("could not calibrate the {side} tail for beta = {beta}")]
    CalibrationFailure {
        beta: Beta,
        side: TailSide,
        #[source]
        source: SolverError,
    },
}

/// CDF assembled from the tabulated bulk and the two asymptotic tails.
#[derive(Clone, Debug)]
struct Cdf {
    spline: CubicSpline,
    xlim: (f64, f64),
    left: TailParams,
    right: TailParams,
}

impl Cdf {
    #[inline]
    fn eval(&self, x: f64) -> f64 {
        if x < self.xlim.0 {
            self.left_tail(x)
        } else if x > self.xlim.1 {
            self.right_tail(x)
        } else {
            self.spline.eval(x)
        }
    }

    #[inline]
    fn left_tail(&self, x: f64) -> f64 {
        self.left.eval(-x)
    }

    #[inline]
    fn right_tail(&self, x: f64) -> f64 {
        1.0 - self.right.eval(x)
    }
}

/// The Tracy-Widom distribution.
///
/// This is the limiting distribution of the largest eigenvalue of a Gaussian
/// ensemble with Dyson index `β ∈ {1, 2, 4}`, after centering and scaling.
///
/// Within the tabulated range the CDF is interpolated with a cubic spline.
/// Beyond it, each tail is approximated by its asymptotic expansion, whose
/// correction terms are fitted at construction so that the value and the
/// slope of the CDF are continuous where the models meet. The PDF is the
/// numerical derivative of the CDF. The quantile function interpolates the
/// CDF sampled on a fixed grid and inverts the asymptotic expansions beyond
/// that grid.
///
/// A constructed distribution is immutable and can be shared across threads.
#[derive(Clone, Debug)]
pub struct TracyWidom {
    beta: Beta,
    cdf: Cdf,
    inverse: LinearInterpolator,
    ylim: (f64, f64),
}

impl TracyWidom {
    /// Constructs the Tracy-Widom distribution for `beta` = 1, 2 or 4.
    pub fn new(beta: u32) -> Result<Self, TracyWidomError> {
        Self::with_beta(Beta::try_from(beta)?)
    }

    /// Constructs the Tracy-Widom distribution for the specified ensemble.
    pub fn with_beta(beta: Beta) -> Result<Self, TracyWidomError> {
        let (x, y) = table::decode(beta)?;
        let n = x.len();
        // The outermost samples only serve as guards for the spline.
        let (x_lo, y_lo) = (x[1], y[1]);
        let (x_hi, y_hi) = (x[n - 2], y[n - 2]);
        let spline = CubicSpline::new(x, y);

        // Left tail, in the reflected coordinate.
        let dlnf = boundary_log_derivative(&spline, TailSide::Left, -x_lo);
        let left = calibrate(beta, TailSide::Left, -x_lo, y_lo, dlnf)?;

        // Right tail, fitted to the complementary CDF.
        let dlnf = boundary_log_derivative(&spline, TailSide::Right, x_hi);
        let right = calibrate(beta, TailSide::Right, x_hi, 1.0 - y_hi, dlnf)?;

        let cdf = Cdf {
            spline,
            xlim: (x_lo, x_hi),
            left,
            right,
        };

        // Sample the complete CDF to build the quantile table.
        let dx = (INVERSE_GRID_END - INVERSE_GRID_START) / (INVERSE_GRID_NODES - 1) as f64;
        let mut x: Vec<f64> = (0..INVERSE_GRID_NODES - 1)
            .map(|i| INVERSE_GRID_START + dx * i as f64)
            .collect();
        x.push(INVERSE_GRID_END); // set directly to avoid rounding errors
        let y: Vec<f64> = x.iter().map(|&x| cdf.eval(x)).collect();
        let ylim = (y[0], y[INVERSE_GRID_NODES - 1]);

        debug!(
            beta = beta.value(),
            xlim = ?cdf.xlim,
            ylim = ?ylim,
            "Tracy-Widom distribution constructed"
        );

        Ok(Self {
            beta,
            cdf,
            inverse: LinearInterpolator::new(y, x),
            ylim,
        })
    }

    /// Ensemble of the distribution.
    pub fn beta(&self) -> Beta {
        self.beta
    }

    /// Range of abscissae over which the CDF is interpolated from the table
    /// rather than approximated by its tails.
    pub fn spline_range(&self) -> (f64, f64) {
        self.cdf.xlim
    }

    /// Range of probabilities over which the quantile function is
    /// interpolated rather than computed from the inverted tails.
    pub fn inverse_range(&self) -> (f64, f64) {
        self.ylim
    }

    /// Calibrated expansion of the left tail.
    pub fn left_tail(&self) -> &TailParams {
        &self.cdf.left
    }

    /// Calibrated expansion of the right tail.
    pub fn right_tail(&self) -> &TailParams {
        &self.cdf.right
    }

    /// Cumulative distribution function `P(TW ≤ x)`.
    pub fn cdf(&self, x: f64) -> f64 {
        self.cdf.eval(x)
    }

    /// Probability density function.
    ///
    /// The density is the five-point central difference of the CDF. Round-off
    /// in the far tails is clamped so that the result is never negative.
    pub fn pdf(&self, x: f64) -> f64 {
        let d = five_point_derivative(&|t: f64| self.cdf.eval(t), x, PDF_STEP);

        if d < 0.0 {
            0.0
        } else {
            d
        }
    }

    /// Quantile function, i.e. the inverse of the CDF.
    ///
    /// Only probabilities within (0, 1) are meaningful. Probabilities below the
    /// tabulated range are mapped through the inverted left tail and those
    /// above it through the inverted right tail, so that 0 maps to `-∞` and 1
    /// to `+∞`. Values outside [0, 1] saturate to the same infinities.
    pub fn cdfinv(&self, y: f64) -> f64 {
        if y < self.ylim.0 {
            self.left_inverse(y)
        } else if y > self.ylim.1 {
            self.right_inverse(y)
        } else {
            self.inverse.eval(y)
        }
    }

    /// Evaluates the CDF at each abscissa of `x`.
    pub fn cdf_many(&self, x: &[f64]) -> Vec<f64> {
        let cdf = &self.cdf;

        partition_eval(
            x,
            cdf.xlim,
            |x| cdf.left_tail(x),
            |x| cdf.spline.eval(x),
            |x| cdf.right_tail(x),
        )
    }

    /// Evaluates the PDF at each abscissa of `x`.
    pub fn pdf_many(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&x| self.pdf(x)).collect()
    }

    /// Evaluates the quantile function at each probability of `y`.
    pub fn cdfinv_many(&self, y: &[f64]) -> Vec<f64> {
        partition_eval(
            y,
            self.ylim,
            |y| self.left_inverse(y),
            |y| self.inverse.eval(y),
            |y| self.right_inverse(y),
        )
    }

    #[inline]
    fn left_inverse(&self, y: f64) -> f64 {
        -self.cdf.left.inverse(y)
    }

    #[inline]
    fn right_inverse(&self, y: f64) -> f64 {
        self.cdf.right.inverse(1.0 - y)
    }
}

impl Distribution<f64> for TracyWidom {
    /// Draws a sample by inverse transform sampling.
    #[inline]
    fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> f64 {
        self.cdfinv(gen_open01(rng))
    }
}

/// Logarithmic derivative of the tail probability interpolated by `spline`,
/// at `x` in the coordinate of the tail on the specified side.
///
/// Returns the derivative together with its estimated absolute error.
fn boundary_log_derivative(spline: &CubicSpline, side: TailSide, x: f64) -> (f64, f64) {
    match side {
        TailSide::Left => {
            let ln_cdf = |t: f64| spline.eval(-t).ln();
            ridders_derivative(&ln_cdf, x, BOUNDARY_DIFF_STEP)
        }
        TailSide::Right => {
            let ln_ccdf = |t: f64| (1.0 - spline.eval(t)).ln();
            ridders_derivative(&ln_ccdf, x, BOUNDARY_DIFF_STEP)
        }
    }
}

/// Fits the corrections of a tail to the value and logarithmic derivative of
/// the tabulated CDF at the junction point `x`.
fn calibrate(
    beta: Beta,
    side: TailSide,
    x: f64,
    f: f64,
    (dlnf, dlnf_error): (f64, f64),
) -> Result<TailParams, TracyWidomError> {
    match TailParams::leading_order(beta, side).calibrate(x, f, dlnf) {
        Ok((tail, bracket)) => {
            debug!(
                beta = beta.value(),
                side = %side,
                u = tail.u,
                v = tail.v,
                bracket = ?bracket,
                dlnf,
                dlnf_error,
                "tail calibrated"
            );
            Ok(tail)
        }
        Err(source) => {
            warn!(beta = beta.value(), side = %side, error = %source, "tail calibration failed");
            Err(TracyWidomError::CalibrationFailure { beta, side, source })
        }
    }
}

// Evaluates each element of `input` with `below`, `within` or `above`
// depending on its position relative to `bounds`.
//
// Elements are first sorted into three disjoint index sets, each set is then
// evaluated with its own model and the results are written back in input
// order. NaN elements belong to the `within` set.
fn partition_eval<L, M, R>(
    input: &[f64],
    bounds: (f64, f64),
    below: L,
    within: M,
    above: R,
) -> Vec<f64>
where
    L: Fn(f64) -> f64,
    M: Fn(f64) -> f64,
    R: Fn(f64) -> f64,
{
    let mut below_idx = Vec::new();
    let mut within_idx = Vec::new();
    let mut above_idx = Vec::new();
    for (i, &v) in input.iter().enumerate() {
        if v < bounds.0 {
            below_idx.push(i);
        } else if v > bounds.1 {
            above_idx.push(i);
        } else {
            within_idx.push(i);
        }
    }

    let mut output = vec![0.0; input.len()];
    for &i in &below_idx {
        output[i] = below(input[i]);
    }
    for &i in &within_idx {
        output[i] = within(input[i]);
    }
    for &i in &above_idx {
        output[i] = above(input[i]);
    }

    output
}
