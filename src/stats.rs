//! Descriptive statistics and least-squares fitting with numerical
//! stability guarantees.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier (improved Kahan) compensated summation.
//! - **Linear regression**: two-pass centered sums of squares and
//!   cross-products, which avoid the catastrophic cancellation of the
//!   textbook `Σxy − n·x̄·ȳ` form.

use serde::{Deserialize, Serialize};

/// Computes the arithmetic mean using compensated summation.
///
/// # Returns
/// - `None` if `data` is empty or contains any NaN/Inf.
///
/// # Examples
/// ```
/// use u_edgeworth::stats::mean;
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert!((mean(&v).unwrap() - 3.0).abs() < 1e-15);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

/// Least-squares line `y ≈ slope·x + intercept` with Pearson correlation `r`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
}

impl LinearFit {
    /// Sentinel for fits over empty data: `(NaN, NaN, 0.0)`.
    pub fn degenerate() -> Self {
        Self {
            slope: f64::NAN,
            intercept: f64::NAN,
            r: 0.0,
        }
    }

    /// Coefficient of determination R².
    pub fn r_squared(&self) -> f64 {
        self.r * self.r
    }
}

/// Ordinary least-squares regression of `y` on `x`.
///
/// # Returns
/// - `None` if the lengths differ, `n < 2`, any value is non-finite, or
///   `x` is constant.
///
/// # Examples
/// ```
/// use u_edgeworth::stats::linear_regression;
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let y = [3.0, 5.0, 7.0, 9.0];
/// let fit = linear_regression(&x, &y).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
/// assert!((fit.r - 1.0).abs() < 1e-12);
/// ```
pub fn linear_regression(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }
    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx <= 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r = if syy <= 0.0 {
        0.0
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };
    Some(LinearFit {
        slope,
        intercept,
        r,
    })
}
