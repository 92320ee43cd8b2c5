//! Limit laws used by the approximations.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Mean | Variance |
//! |---|---|---|---|
//! | [`Laplace`] | location μ, scale b | μ | 2b² |
//! | [`StudentT`] | degrees of freedom ν | 0 (ν > 1) | ν/(ν−2) (ν > 2) |
//!
//! Quantile functions map `p = 0` and `p = 1` to `−∞` and `+∞` and return
//! NaN for probabilities outside `[0, 1]`, so infinite tails propagate into
//! downstream corrections instead of being clamped.

use crate::error::{Error, Result};
use crate::special;

// ============================================================================
// Laplace Distribution
// ============================================================================

/// Laplace (double exponential) distribution with location μ and scale b.
///
/// # Mathematical Definition
/// - PDF: f(x) = exp(−|x−μ|/b) / (2b)
/// - CDF: ½·exp((x−μ)/b) for x < μ, 1 − ½·exp(−(x−μ)/b) otherwise
/// - Quantile: μ − b·sign(p−½)·ln(1 − 2|p−½|)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Laplace {
    loc: f64,
    scale: f64,
}

impl Laplace {
    /// Creates a new Laplace distribution.
    ///
    /// # Errors
    /// Returns `Err` if `scale ≤ 0` or either parameter is not finite.
    pub fn new(loc: f64, scale: f64) -> Result<Self> {
        if !loc.is_finite() || !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "Laplace requires finite location and scale > 0, got loc={loc}, scale={scale}"
            )));
        }
        Ok(Self { loc, scale })
    }

    pub fn loc(&self) -> f64 {
        self.loc
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn mean(&self) -> f64 {
        self.loc
    }

    pub fn variance(&self) -> f64 {
        2.0 * self.scale * self.scale
    }

    pub fn pdf(&self, x: f64) -> f64 {
        (-(x - self.loc).abs() / self.scale).exp() / (2.0 * self.scale)
    }

    pub fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.loc) / self.scale;
        if z < 0.0 {
            0.5 * z.exp()
        } else {
            1.0 - 0.5 * (-z).exp()
        }
    }

    /// Inverse CDF. `quantile(0) = −∞`, `quantile(1) = +∞`.
    pub fn quantile(&self, p: f64) -> f64 {
        if p.is_nan() || !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        let centered = p - 0.5;
        if centered == 0.0 {
            return self.loc;
        }
        self.loc - self.scale * centered.signum() * (-2.0 * centered.abs()).ln_1p()
    }
}

// ============================================================================
// Student's t Distribution
// ============================================================================

/// Student's t distribution with ν degrees of freedom (ν may be fractional).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentT {
    df: f64,
}

impl StudentT {
    /// Creates a new Student t distribution.
    ///
    /// # Errors
    /// Returns `Err` if `df ≤ 0` or `df` is not finite.
    pub fn new(df: f64) -> Result<Self> {
        if !df.is_finite() || df <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "StudentT requires finite df > 0, got df={df}"
            )));
        }
        Ok(Self { df })
    }

    pub fn df(&self) -> f64 {
        self.df
    }

    pub fn pdf(&self, x: f64) -> f64 {
        special::t_distribution_pdf(x, self.df)
    }

    pub fn cdf(&self, x: f64) -> f64 {
        special::t_distribution_cdf(x, self.df)
    }

    /// Inverse CDF. `quantile(0) = −∞`, `quantile(1) = +∞`.
    pub fn quantile(&self, p: f64) -> f64 {
        special::t_distribution_quantile(p, self.df)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // --- Laplace ---

    #[test]
    fn test_laplace_cdf_known_values() {
        let l = Laplace::new(0.0, 1.0).unwrap();
        assert!((l.cdf(0.0) - 0.5).abs() < 1e-15);
        assert!((l.cdf(1.0) - (1.0 - 0.5 * (-1.0_f64).exp())).abs() < 1e-15);
        assert!((l.cdf(-2.0) - 0.5 * (-2.0_f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn test_laplace_pdf_peak() {
        let l = Laplace::new(1.0, 0.5).unwrap();
        assert!((l.pdf(1.0) - 1.0).abs() < 1e-15);
        assert!((l.pdf(0.0) - l.pdf(2.0)).abs() < 1e-15);
    }

    #[test]
    fn test_laplace_moments() {
        let l = Laplace::new(3.0, 2.0).unwrap();
        assert_eq!(l.mean(), 3.0);
        assert_eq!(l.variance(), 8.0);
    }

    #[test]
    fn test_laplace_quantile_endpoints() {
        let l = Laplace::new(0.0, 0.5).unwrap();
        assert_eq!(l.quantile(0.0), f64::NEG_INFINITY);
        assert_eq!(l.quantile(1.0), f64::INFINITY);
        assert_eq!(l.quantile(0.5), 0.0);
        assert!(l.quantile(1.5).is_nan());
        assert!(l.quantile(f64::NAN).is_nan());
    }

    #[test]
    fn test_laplace_quantile_roundtrip() {
        let l = Laplace::new(-1.0, 0.7).unwrap();
        for &p in &[1e-6, 0.01, 0.25, 0.5, 0.75, 0.99] {
            let back = l.cdf(l.quantile(p));
            assert!((back - p).abs() < 1e-12, "p={p}, back={back}");
        }
    }

    #[test]
    fn test_laplace_invalid() {
        assert!(Laplace::new(0.0, 0.0).is_err());
        assert!(Laplace::new(0.0, -1.0).is_err());
        assert!(Laplace::new(f64::NAN, 1.0).is_err());
    }

    // --- StudentT ---

    #[test]
    fn test_student_symmetry() {
        let t = StudentT::new(2.0).unwrap();
        assert!((t.cdf(1.3) + t.cdf(-1.3) - 1.0).abs() < 1e-12);
        assert!((t.pdf(0.7) - t.pdf(-0.7)).abs() < 1e-15);
    }

    #[test]
    fn test_student_invalid() {
        assert!(StudentT::new(0.0).is_err());
        assert!(StudentT::new(f64::INFINITY).is_err());
    }
}
