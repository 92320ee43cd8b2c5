//! Shared vocabulary of the Edgeworth / Cornish-Fisher approximations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of correction terms added to the limit law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ApproximationOrder {
    /// The pure limit law; moments and index are ignored.
    Limit,
    /// Limit law plus the `1/√n` skewness term.
    First,
    /// First order plus the `1/n` skewness² and kurtosis terms.
    Second,
}

impl ApproximationOrder {
    pub const ALL: [ApproximationOrder; 3] = [
        ApproximationOrder::Limit,
        ApproximationOrder::First,
        ApproximationOrder::Second,
    ];

    pub fn as_u8(&self) -> u8 {
        match self {
            ApproximationOrder::Limit => 0,
            ApproximationOrder::First => 1,
            ApproximationOrder::Second => 2,
        }
    }
}

impl TryFrom<u8> for ApproximationOrder {
    type Error = Error;

    fn try_from(order: u8) -> Result<Self> {
        match order {
            0 => Ok(ApproximationOrder::Limit),
            1 => Ok(ApproximationOrder::First),
            2 => Ok(ApproximationOrder::Second),
            other => Err(Error::InvalidParameter(format!(
                "approximation order must be 0, 1 or 2, got {other}"
            ))),
        }
    }
}

impl fmt::Display for ApproximationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApproximationOrder::Limit => f.write_str("limit law"),
            ApproximationOrder::First => f.write_str("1st approximation"),
            ApproximationOrder::Second => f.write_str("2nd approximation"),
        }
    }
}

/// Skewness and kurtosis driving the correction terms.
///
/// Unlike [`crate::moments::MomentSet`] these are not validated: a zero
/// skewness is a legitimate way to switch the odd terms off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionMoments {
    pub mu3: f64,
    pub mu4: f64,
}

impl Default for CorrectionMoments {
    fn default() -> Self {
        Self { mu3: 1.0, mu4: 1.0 }
    }
}

/// Sign with `sign(0) = 0`, unlike [`f64::signum`].
pub(crate) fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}

/// Rejects probabilities outside `[0, 1]`. The endpoints are allowed and
/// map to infinite quantiles.
pub(crate) fn check_probabilities(probs: &[f64]) -> Result<()> {
    match probs.iter().position(|p| !(0.0..=1.0).contains(p)) {
        Some(i) => Err(Error::InvalidParameter(format!(
            "probability at index {i} must lie in [0, 1], got {}",
            probs[i]
        ))),
        None => Ok(()),
    }
}

/// Evenly spaced points over `[start, end]`, both ends included.
///
/// # Examples
/// ```
/// use u_edgeworth::approximation::linspace;
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
/// assert!(linspace(0.0, 1.0, 0).is_empty());
/// ```
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
