//! QQ-plot data.
//!
//! Pairs the ordered empirical statistic with ordered approximate quantiles
//! and optionally fits a least-squares line of the former on the latter.
//! A good approximation shows slope near 1, intercept near 0 and `r` near 1.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stats::{linear_regression, LinearFit};

/// Ordered quantile pairs ready for a scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QqPlot {
    /// Approximate (theoretical) quantiles, ascending.
    pub theoretical: Vec<f64>,
    /// Empirical quantiles, ascending.
    pub empirical: Vec<f64>,
    /// Least-squares fit of `empirical` on `theoretical`, when requested.
    pub fit: Option<LinearFit>,
}

impl QqPlot {
    /// Iterates over `(theoretical, empirical)` points.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.theoretical
            .iter()
            .copied()
            .zip(self.empirical.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.theoretical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theoretical.is_empty()
    }
}

/// Builds QQ-plot data from two quantile sequences.
///
/// Both inputs are sorted ascending before pairing. With `fit`, the
/// regression of empirical on theoretical quantiles is attached; inputs
/// that cannot be fitted (empty, constant, or non-finite) carry
/// [`LinearFit::degenerate`].
///
/// # Errors
/// Returns [`Error::InvalidParameter`] if the lengths differ.
///
/// # Examples
/// ```
/// use u_edgeworth::qq::qq_plot;
///
/// let plot = qq_plot(&[3.0, 1.0, 2.0], &[1.1, 2.9, 2.0], true).unwrap();
/// assert_eq!(plot.empirical, vec![1.0, 2.0, 3.0]);
/// assert_eq!(plot.theoretical, vec![1.1, 2.0, 2.9]);
/// let fit = plot.fit.unwrap();
/// assert!(fit.r > 0.99);
///
/// let empty = qq_plot(&[], &[], true).unwrap();
/// assert!(empty.is_empty());
/// assert!(empty.fit.unwrap().slope.is_nan());
/// ```
pub fn qq_plot(empirical: &[f64], approximate: &[f64], fit: bool) -> Result<QqPlot> {
    if empirical.len() != approximate.len() {
        return Err(Error::InvalidParameter(format!(
            "quantile sequences differ in length: {} empirical vs {} approximate",
            empirical.len(),
            approximate.len()
        )));
    }

    let mut theoretical = approximate.to_vec();
    theoretical.sort_by(|a, b| a.total_cmp(b));
    let mut observed = empirical.to_vec();
    observed.sort_by(|a, b| a.total_cmp(b));

    let fit = fit.then(|| {
        linear_regression(&theoretical, &observed).unwrap_or_else(LinearFit::degenerate)
    });

    Ok(QqPlot {
        theoretical,
        empirical: observed,
        fit,
    })
}
