//! Laplace-case approximations.
//!
//! When the random index Nn is the maximum of discrete Pareto variates, the
//! normalized sum converges to a Laplace law with scale `1/√(2s)`. This
//! module refines that limit with first- and second-order Edgeworth terms
//! for the CDF and the matching Cornish-Fisher expansion for quantiles.
//!
//! # Formulas
//!
//! With `b = scale/√(2s)`, `F`/`f` the Laplace(loc, b) CDF/PDF and
//! `k = √(2s)`:
//!
//! ```text
//! a1(x)  = (μ₃/6)·(−x² + |x|/k + 1/(2s))
//! a21(x) = (x·μ₄/(48s))·(3 − 2s·x² + 3k|x|)
//!        + (x·μ₃²/(144s))·(20s·x² − 3|x|·x²·k³ − 15k|x| − 15)
//! a22(x) = (x(1−s)/(8s))·(k|x| + 1)
//!
//! G1(x) = F(x) + f(x)·a1(x)/√n
//! G2(x) = G1(x) + f(x)·(a21(x) + a22(x))/n
//! ```
//!
//! Correction terms are evaluated at the raw point `x`, not at the
//! standardized `(x − loc)/b`.

use crate::approximation::{check_probabilities, sign, ApproximationOrder, CorrectionMoments};
use crate::distributions::Laplace;
use crate::error::{Error, Result};

/// Edgeworth (CDF) and Cornish-Fisher (quantile) approximations around a
/// Laplace limit.
///
/// # Examples
/// ```
/// use u_edgeworth::approximation::ApproximationOrder;
/// use u_edgeworth::laplace::LaplaceApproximation;
///
/// let approx = LaplaceApproximation::new(0.0, 1.0)
///     .unwrap()
///     .with_index(2.0, 10)
///     .unwrap()
///     .with_moments(8.0_f64.sqrt(), 12.0);
/// let points = [-1.0, 0.0, 1.0];
/// let pure = approx.cdf(&points, ApproximationOrder::Limit).unwrap();
/// let second = approx.cdf(&points, ApproximationOrder::Second).unwrap();
/// assert_eq!(pure.len(), 3);
/// assert_eq!(second.len(), 3);
/// assert!((pure[1] - 0.5).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaplaceApproximation {
    loc: f64,
    scale: f64,
    s: f64,
    nn: u32,
    moments: CorrectionMoments,
    base: Laplace,
}

impl LaplaceApproximation {
    /// Creates an approximation with `s = 2`, `nn = 10`, `μ₃ = μ₄ = 1`.
    ///
    /// # Errors
    /// Returns `Err` if `scale ≤ 0` or either parameter is not finite.
    pub fn new(loc: f64, scale: f64) -> Result<Self> {
        const DEFAULT_S: f64 = 2.0;
        let base = Laplace::new(loc, scale / (2.0 * DEFAULT_S).sqrt())?;
        Ok(Self {
            loc,
            scale,
            s: DEFAULT_S,
            nn: 10,
            moments: CorrectionMoments::default(),
            base,
        })
    }

    /// Sets the random-index shape `s` and scale `nn`.
    ///
    /// # Errors
    /// Returns `Err` if `s ≤ 0`, `s` is not finite, or `nn == 0`.
    pub fn with_index(self, s: f64, nn: u32) -> Result<Self> {
        if !s.is_finite() || s <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "Laplace case requires s > 0, got s={s}"
            )));
        }
        if nn == 0 {
            return Err(Error::InvalidParameter("Laplace case requires nn ≥ 1".into()));
        }
        let base = Laplace::new(self.loc, self.scale / (2.0 * s).sqrt())?;
        Ok(Self { s, nn, base, ..self })
    }

    /// Sets the skewness `μ₃` and kurtosis `μ₄` of the summands.
    pub fn with_moments(self, mu3: f64, mu4: f64) -> Self {
        Self {
            moments: CorrectionMoments { mu3, mu4 },
            ..self
        }
    }

    pub fn s(&self) -> f64 {
        self.s
    }

    pub fn nn(&self) -> u32 {
        self.nn
    }

    pub fn moments(&self) -> CorrectionMoments {
        self.moments
    }

    /// The limit law Laplace(loc, scale/√(2s)).
    pub fn base(&self) -> &Laplace {
        &self.base
    }

    /// Approximate CDF at a single point.
    pub fn cdf_at(&self, x: f64, order: ApproximationOrder) -> f64 {
        let cdf = self.base.cdf(x);
        if order == ApproximationOrder::Limit {
            return cdf;
        }

        let pdf = self.base.pdf(x);
        let nn = f64::from(self.nn);
        let first = cdf + pdf * (self.a1(x) / nn.sqrt());
        match order {
            ApproximationOrder::Second => first + pdf * ((self.a21(x) + self.a22(x)) / nn),
            _ => first,
        }
    }

    /// Approximate CDF over a grid, one value per point in input order.
    ///
    /// An empty grid yields an empty result.
    pub fn cdf(&self, points: &[f64], order: ApproximationOrder) -> Result<Vec<f64>> {
        Ok(points.iter().map(|&x| self.cdf_at(x, order)).collect())
    }

    /// Second-order Cornish-Fisher quantile at a single probability.
    ///
    /// `p = 0` and `p = 1` return `−∞` and `+∞`: the corrections are of
    /// lower order than the infinite base quantile.
    pub fn quantile_at(&self, p: f64) -> f64 {
        let q = self.base.quantile(p);
        if !q.is_finite() {
            return q;
        }

        let CorrectionMoments { mu3, mu4 } = self.moments;
        let s = self.s;
        let k = (2.0 * s).sqrt();
        let nn = f64::from(self.nn);
        let abs_q = q.abs();

        let a00 = abs_q / k + 1.0 / (2.0 * s) - q * q;
        let a01 = sign(q) * k * a00 * a00;
        let a02 = (sign(q) / k - 2.0 * q) * a00;

        let b01 = (mu3 * mu3 / 36.0) * (a01 - a02);
        let b02 = (q * mu3 * mu3 / (144.0 * s))
            * (20.0 * s * q * q - (2.0 * s).powf(1.5) * abs_q.powi(3) - 15.0 * k * abs_q - 15.0);
        let b03 = (q * mu4 / (48.0 * s)) * (3.0 - 2.0 * s * q * q + 3.0 * k * abs_q);
        let b04 = (q * (1.0 - s) / (8.0 * s)) * (k * abs_q + 1.0);

        q - (mu3 / (6.0 * nn.sqrt())) * a00 + (b01 + b02 + b03 + b04) / nn
    }

    /// Second-order Cornish-Fisher quantiles, one per probability.
    ///
    /// # Errors
    /// Returns `Err` if any probability is outside `[0, 1]` or NaN.
    pub fn quantiles(&self, probs: &[f64]) -> Result<Vec<f64>> {
        check_probabilities(probs)?;
        Ok(probs.iter().map(|&p| self.quantile_at(p)).collect())
    }

    fn a1(&self, x: f64) -> f64 {
        let s = self.s;
        (self.moments.mu3 / 6.0) * (-x * x + x.abs() / (2.0 * s).sqrt() + 1.0 / (2.0 * s))
    }

    fn a21(&self, x: f64) -> f64 {
        let CorrectionMoments { mu3, mu4 } = self.moments;
        let s = self.s;
        let k = (2.0 * s).sqrt();
        let abs_x = x.abs();
        let kurtosis = (x * mu4 / (48.0 * s)) * (3.0 - 2.0 * s * x * x + 3.0 * k * abs_x);
        let skewness = (x * mu3 * mu3 / (144.0 * s))
            * (20.0 * s * x * x
                - (abs_x * x * x * 3.0) * (2.0 * s).powf(1.5)
                - 15.0 * k * abs_x
                - 15.0);
        kurtosis + skewness
    }

    fn a22(&self, x: f64) -> f64 {
        let s = self.s;
        (x * (1.0 - s) / (8.0 * s)) * ((2.0 * s).sqrt() * x.abs() + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chi2_approx() -> LaplaceApproximation {
        LaplaceApproximation::new(0.0, 1.0)
            .unwrap()
            .with_index(2.0, 10)
            .unwrap()
            .with_moments(8.0_f64.sqrt(), 12.0)
    }

    #[test]
    fn test_limit_order_ignores_moments() {
        let a = chi2_approx();
        let b = a.with_moments(-3.0, 40.0).with_index(2.0, 1000).unwrap();
        let points = [-2.0, -0.1, 0.0, 0.3, 5.0];
        let base = Laplace::new(0.0, 0.5).unwrap();
        let pa = a.cdf(&points, ApproximationOrder::Limit).unwrap();
        let pb = b.cdf(&points, ApproximationOrder::Limit).unwrap();
        assert_eq!(pa, pb);
        for (&x, &v) in points.iter().zip(&pa) {
            assert_eq!(v, base.cdf(x));
        }
    }

    #[test]
    fn test_zero_skewness_at_origin() {
        let a = chi2_approx().with_moments(0.0, 12.0);
        let first = a.cdf(&[0.0], ApproximationOrder::First).unwrap();
        assert_eq!(first[0], a.base().cdf(0.0));
    }

    #[test]
    fn test_first_order_value_at_origin() {
        // a1(0) = (μ₃/6)·(1/(2s)), f(0) = 1/(2b) with b = 1/√(2s)
        let a = chi2_approx();
        let mu3 = 8.0_f64.sqrt();
        let expected = 0.5 + (2.0 / 2.0) * ((mu3 / 6.0) * 0.25) / 10.0_f64.sqrt();
        let got = a.cdf_at(0.0, ApproximationOrder::First);
        assert!((got - expected).abs() < 1e-15, "{got} vs {expected}");
    }

    #[test]
    fn test_second_order_terms_vanish_at_origin() {
        let a = chi2_approx();
        let first = a.cdf_at(0.0, ApproximationOrder::First);
        let second = a.cdf_at(0.0, ApproximationOrder::Second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_second_order_hand_computed() {
        // s = 1/2 makes k = √(2s) = 1 and b = scale.
        let a = LaplaceApproximation::new(0.0, 1.0)
            .unwrap()
            .with_index(0.5, 4)
            .unwrap()
            .with_moments(1.0, 2.0);
        let x = 1.0;
        let cdf = 1.0 - 0.5 * (-1.0_f64).exp();
        let pdf = 0.5 * (-1.0_f64).exp();
        let a1 = (1.0 / 6.0) * (-1.0 + 1.0 + 1.0);
        let a21 = (2.0 / 24.0) * (3.0 - 1.0 + 3.0) + (1.0 / 72.0) * (10.0 - 3.0 - 15.0 - 15.0);
        let a22 = (0.5 / 4.0) * 2.0;
        let expected = cdf + pdf * a1 / 2.0 + pdf * (a21 + a22) / 4.0;
        let got = a.cdf_at(x, ApproximationOrder::Second);
        assert!((got - expected).abs() < 1e-14, "{got} vs {expected}");
    }

    #[test]
    fn test_empty_grid() {
        let a = chi2_approx();
        for order in ApproximationOrder::ALL {
            assert!(a.cdf(&[], order).unwrap().is_empty());
        }
        assert!(a.quantiles(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            LaplaceApproximation::new(0.0, 1.0).unwrap().with_index(0.0, 10),
            Err(Error::InvalidParameter(_))
        ));
        assert!(LaplaceApproximation::new(0.0, 1.0)
            .unwrap()
            .with_index(-1.0, 10)
            .is_err());
        assert!(LaplaceApproximation::new(0.0, 1.0)
            .unwrap()
            .with_index(2.0, 0)
            .is_err());
        assert!(LaplaceApproximation::new(0.0, 0.0).is_err());
    }

    #[test]
    fn test_quantile_endpoints_are_infinite() {
        let q = chi2_approx().quantiles(&[0.0, 0.5, 1.0]).unwrap();
        assert_eq!(q[0], f64::NEG_INFINITY);
        assert_eq!(q[2], f64::INFINITY);
        assert!(q[1].is_finite());
    }

    #[test]
    fn test_quantile_at_median() {
        // q = 0: sign(0) = 0 so a01 = a02 = 0 and only the a00 shift remains.
        let a = chi2_approx();
        let mu3 = 8.0_f64.sqrt();
        let expected = -(mu3 / (6.0 * 10.0_f64.sqrt())) * 0.25;
        let got = a.quantile_at(0.5);
        assert!((got - expected).abs() < 1e-15, "{got} vs {expected}");
    }

    #[test]
    fn test_quantile_rejects_bad_probabilities() {
        assert!(matches!(
            chi2_approx().quantiles(&[0.2, -0.1]),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_quantile_without_moments_large_index() {
        // μ₃ = 0 and s = 1 remove every term except the μ₄ one, which
        // fades as nn grows.
        let a = LaplaceApproximation::new(0.0, 1.0)
            .unwrap()
            .with_index(1.0, 1_000_000)
            .unwrap()
            .with_moments(0.0, 1.0);
        for &p in &[0.1, 0.3, 0.7, 0.9] {
            let q = a.quantile_at(p);
            let base = a.base().quantile(p);
            assert!((q - base).abs() < 1e-5, "p={p}: {q} vs {base}");
        }
    }
}
