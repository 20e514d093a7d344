//! One-dimensional interpolation over tabulated data.

use super::util::solve_tma;

// Index `i` of the interval `[x[i], x[i+1]]` containing `t`, assuming
// `x[0] <= t <= x[n-1]`. The right end of the table maps to the last interval.
#[inline]
fn interval_index(x: &[f64], t: f64) -> usize {
    let i = x.partition_point(|&xi| xi <= t);

    i.saturating_sub(1).min(x.len() - 2)
}

/// Cubic spline with not-a-knot end conditions.
///
/// The spline interpolates every node and has continuous first and second
/// derivatives. The not-a-knot condition additionally enforces a continuous
/// third derivative at the second and penultimate nodes, so the two outermost
/// intervals at each end share a single cubic.
///
/// Evaluation outside the tabulated range yields `NaN`.
#[derive(Clone, Debug)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    // Second derivatives at the nodes.
    m: Vec<f64>,
}

impl CubicSpline {
    /// Computes the spline through nodes `(x[i], y[i])`.
    ///
    /// The abscissae must be strictly increasing and there must be at least 4
    /// nodes.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        assert_eq!(x.len(), y.len(), "abscissae and ordinates have different lengths");
        let n = x.len();
        assert!(n >= 4, "a not-a-knot spline needs at least 4 nodes");

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

        // Continuity of the first derivative at inner nodes:
        //
        // h[i-1]*m[i-1] + 2(h[i-1] + h[i])*m[i] + h[i]*m[i+1] = rhs[i]
        //
        // for i in 1..n-1.
        let k = n - 2;
        let mut sub = vec![0.0; k];
        let mut diag = vec![0.0; k];
        let mut sup = vec![0.0; k];
        let mut rhs = vec![0.0; k];
        for j in 0..k {
            let i = j + 1;
            sub[j] = h[i - 1];
            diag[j] = 2.0 * (h[i - 1] + h[i]);
            sup[j] = h[i];
            rhs[j] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
        }

        // The not-a-knot conditions express m[0] (resp. m[n-1]) as a linear
        // combination of m[1] and m[2] (resp. m[n-2] and m[n-3]); substituting
        // them in the first and last equations keeps the system tri-diagonal.
        let (h0, h1) = (h[0], h[1]);
        diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
        sup[0] = (h1 * h1 - h0 * h0) / h1;
        let (hl, hp) = (h[n - 2], h[n - 3]);
        sub[k - 1] = (hp * hp - hl * hl) / hp;
        diag[k - 1] = (hp + hl) * (2.0 * hp + hl) / hp;

        let mut m = vec![0.0; n];
        solve_tma(&sub, &mut diag, &sup, &mut rhs, &mut m[1..n - 1]);
        m[0] = ((h0 + h1) * m[1] - h0 * m[2]) / h1;
        m[n - 1] = ((hp + hl) * m[n - 2] - hl * m[n - 3]) / hp;

        Self { x, y, m }
    }

    /// Range `[x[0], x[n-1]]` over which the spline is defined.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Evaluates the spline at `t`.
    pub fn eval(&self, t: f64) -> f64 {
        let (x0, x1) = self.domain();
        if !(t >= x0 && t <= x1) {
            return f64::NAN;
        }
        let i = interval_index(&self.x, t);
        let (x, y, m) = (&self.x, &self.y, &self.m);

        let h = x[i + 1] - x[i];
        let dt = t - x[i];
        let c0 = y[i];
        let c1 = (y[i + 1] - y[i]) / h - h * (2.0 * m[i] + m[i + 1]) / 6.0;
        let c2 = 0.5 * m[i];
        let c3 = (m[i + 1] - m[i]) / (6.0 * h);

        if cfg!(feature = "fma") {
            c3.mul_add(dt, c2).mul_add(dt, c1).mul_add(dt, c0)
        } else {
            ((c3 * dt + c2) * dt + c1) * dt + c0
        }
    }
}

/// Piecewise-linear interpolation.
///
/// The abscissae need only be non-decreasing: consecutive nodes may share the
/// same abscissa, in which case the interpolant jumps there. Evaluation outside
/// the tabulated range yields `NaN`.
#[derive(Clone, Debug)]
pub struct LinearInterpolator {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl LinearInterpolator {
    /// Builds the interpolator through nodes `(x[i], y[i])`.
    ///
    /// There must be at least 2 nodes.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        assert_eq!(x.len(), y.len(), "abscissae and ordinates have different lengths");
        assert!(x.len() >= 2, "linear interpolation needs at least 2 nodes");

        Self { x, y }
    }

    /// Range `[x[0], x[n-1]]` over which the interpolator is defined.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Evaluates the interpolant at `t`.
    pub fn eval(&self, t: f64) -> f64 {
        let (x0, x1) = self.domain();
        if !(t >= x0 && t <= x1) {
            return f64::NAN;
        }
        let i = interval_index(&self.x, t);
        let (x, y) = (&self.x, &self.y);

        let dx = x[i + 1] - x[i];
        if dx > 0.0 {
            y[i] + (t - x[i]) * ((y[i + 1] - y[i]) / dx)
        } else {
            y[i]
        }
    }
}
