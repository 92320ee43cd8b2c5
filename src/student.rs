//! Student-case approximations.
//!
//! When the random index Nn is (shifted) negative binomial with parameter
//! `r`, the normalized sum converges to Student's t with `2r` degrees of
//! freedom. The expansions below add `1/√gn` and `1/gn` corrections.
//!
//! # Formulas
//!
//! ```text
//! a1(x)  = μ₃·((r−1)x² − r) / (3(2r−1))
//! a21(x) = x/(36(2r−1)) · 2μ₃²·((r−2)(r−3)x⁴ + 10r(2−r)x² + 15r²) / (2r + x²)
//! a22(x) = x/(36(2r−1)) · (3μ₄·((r−2)x² − 3r) + 9(r−2)(x² + 1))
//!
//! CDF,      gn = r(n−1) − 1:
//!   G1(x) = F(x) + a1·f/√gn
//!   G2(x) = F(x) − a1·f/√gn − f·(a21 + a22)/gn
//!
//! Quantile, gn = r(n−1) + 1:
//!   b0  = (r−1)q² − r
//!   b1  = μ₃·b0 / (3(2r−1))
//!   b21 = −(2r+1)·q·μ₃²·b0² / (18(2r + q²)(2r−1)²)
//!   b22 = 2μ₃²(r−1)·q·b0 / (9(2r−1)²)
//!   b23 = a21(q) + a22(q)
//!   Q2(p) = q + b1/√gn + (b21 + b22 + b23)/gn
//! ```

use crate::approximation::{check_probabilities, ApproximationOrder, CorrectionMoments};
use crate::distributions::StudentT;
use crate::error::{Error, Result};

/// Edgeworth (CDF) and Cornish-Fisher (quantile) approximations around a
/// Student limit with `2r` degrees of freedom.
///
/// # Examples
/// ```
/// use u_edgeworth::approximation::ApproximationOrder;
/// use u_edgeworth::student::StudentApproximation;
///
/// let approx = StudentApproximation::new(1.0)
///     .unwrap()
///     .with_index(10)
///     .unwrap()
///     .with_moments(8.0_f64.sqrt(), 12.0);
/// let cdf = approx.cdf(&[-1.0, 0.0, 1.0], ApproximationOrder::First).unwrap();
/// assert_eq!(cdf.len(), 3);
///
/// // 2r − 1 = 0 is a pole of every correction term
/// assert!(StudentApproximation::new(0.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentApproximation {
    r: f64,
    nn: u32,
    moments: CorrectionMoments,
    base: StudentT,
}

impl StudentApproximation {
    /// Creates an approximation with `nn = 10` and `μ₃ = μ₄ = 1`.
    ///
    /// # Errors
    /// Returns `Err` if `r ≤ 0`, `r` is not finite, or `r = 1/2`.
    pub fn new(r: f64) -> Result<Self> {
        if !r.is_finite() || r <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "Student case requires r > 0, got r={r}"
            )));
        }
        if 2.0 * r - 1.0 == 0.0 {
            return Err(Error::InvalidParameter(
                "Student case is singular at r = 0.5 (division by 2r − 1)".into(),
            ));
        }
        Ok(Self {
            r,
            nn: 10,
            moments: CorrectionMoments::default(),
            base: StudentT::new(2.0 * r)?,
        })
    }

    /// Sets the random-index scale `nn`.
    ///
    /// # Errors
    /// Returns `Err` if `nn == 0`.
    pub fn with_index(self, nn: u32) -> Result<Self> {
        if nn == 0 {
            return Err(Error::InvalidParameter("Student case requires nn ≥ 1".into()));
        }
        Ok(Self { nn, ..self })
    }

    /// Sets the skewness `μ₃` and kurtosis `μ₄` of the summands.
    pub fn with_moments(self, mu3: f64, mu4: f64) -> Self {
        Self {
            moments: CorrectionMoments { mu3, mu4 },
            ..self
        }
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn nn(&self) -> u32 {
        self.nn
    }

    pub fn moments(&self) -> CorrectionMoments {
        self.moments
    }

    /// The limit law t(2r).
    pub fn base(&self) -> &StudentT {
        &self.base
    }

    /// `r(nn − 1) − 1`, the CDF correction normalizer.
    pub fn cdf_gn(&self) -> f64 {
        self.r * (f64::from(self.nn) - 1.0) - 1.0
    }

    /// `r(nn − 1) + 1`, the quantile correction normalizer.
    pub fn quantile_gn(&self) -> f64 {
        self.r * (f64::from(self.nn) - 1.0) + 1.0
    }

    /// Approximate CDF over a grid, one value per point in input order.
    ///
    /// An empty grid yields an empty result before any correction term or
    /// normalizer is evaluated.
    ///
    /// # Errors
    /// For orders above [`ApproximationOrder::Limit`] and a non-empty grid,
    /// returns `Err` if `r(nn − 1) − 1 ≤ 0`.
    pub fn cdf(&self, points: &[f64], order: ApproximationOrder) -> Result<Vec<f64>> {
        if points.is_empty() {
            return Ok(Vec::new());
        }
        if order == ApproximationOrder::Limit {
            return Ok(points.iter().map(|&x| self.base.cdf(x)).collect());
        }
        let gn = self.cdf_gn();
        if gn <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "r(nn − 1) − 1 must be > 0 for correction terms, got {gn} (r={}, nn={})",
                self.r, self.nn
            )));
        }
        Ok(points.iter().map(|&x| self.corrected_cdf(x, order, gn)).collect())
    }

    /// Second-order Cornish-Fisher quantile at a single probability.
    ///
    /// `p = 0` and `p = 1` return `−∞` and `+∞`.
    pub fn quantile_at(&self, p: f64) -> f64 {
        let q = self.base.quantile(p);
        if !q.is_finite() {
            return q;
        }

        let r = self.r;
        let CorrectionMoments { mu3, .. } = self.moments;
        let gn = self.quantile_gn();
        let two_r_m1 = 2.0 * r - 1.0;
        let mu3_sq = mu3 * mu3;

        let b0 = (r - 1.0) * q * q - r;
        let b1 = (mu3 * b0) / (3.0 * two_r_m1);
        let b21 = -((2.0 * r + 1.0) * q * mu3_sq * b0 * b0)
            / (2.0 * (2.0 * r + q * q) * 9.0 * (two_r_m1 * two_r_m1));
        let b22 = (2.0 * mu3_sq * (r - 1.0) * q * b0) / (9.0 * two_r_m1 * two_r_m1);
        let b23 = self.a21(q) + self.a22(q);

        q + b1 / gn.sqrt() + (b21 + b22 + b23) / gn
    }

    /// Second-order Cornish-Fisher quantiles, one per probability.
    ///
    /// # Errors
    /// Returns `Err` if any probability is outside `[0, 1]` or NaN.
    pub fn quantiles(&self, probs: &[f64]) -> Result<Vec<f64>> {
        check_probabilities(probs)?;
        Ok(probs.iter().map(|&p| self.quantile_at(p)).collect())
    }

    fn corrected_cdf(&self, x: f64, order: ApproximationOrder, gn: f64) -> f64 {
        let cdf = self.base.cdf(x);
        let pdf = self.base.pdf(x);
        let skew = self.a1(x) * pdf / gn.sqrt();
        match order {
            ApproximationOrder::Limit => cdf,
            ApproximationOrder::First => cdf + skew,
            ApproximationOrder::Second => cdf - skew - pdf * (self.a21(x) + self.a22(x)) / gn,
        }
    }

    fn a1(&self, x: f64) -> f64 {
        let r = self.r;
        (self.moments.mu3 * ((r - 1.0) * x * x - r)) / (3.0 * (2.0 * r - 1.0))
    }

    fn a21(&self, x: f64) -> f64 {
        let r = self.r;
        let mu3 = self.moments.mu3;
        let x2 = x * x;
        (x / (36.0 * (2.0 * r - 1.0)))
            * ((2.0
                * mu3
                * mu3
                * ((r - 2.0) * (r - 3.0) * x2 * x2 + 10.0 * r * (2.0 - r) * x2 + 15.0 * r * r))
                / (2.0 * r + x2))
    }

    fn a22(&self, x: f64) -> f64 {
        let r = self.r;
        let mu4 = self.moments.mu4;
        let x2 = x * x;
        (x / (36.0 * (2.0 * r - 1.0)))
            * (3.0 * mu4 * ((r - 2.0) * x2 - 3.0 * r) + 9.0 * (r - 2.0) * (x2 + 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chi2_approx(r: f64) -> StudentApproximation {
        StudentApproximation::new(r)
            .unwrap()
            .with_index(10)
            .unwrap()
            .with_moments(8.0_f64.sqrt(), 12.0)
    }

    #[test]
    fn test_rejects_singular_r() {
        assert!(matches!(
            StudentApproximation::new(0.5),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_r() {
        assert!(StudentApproximation::new(0.0).is_err());
        assert!(StudentApproximation::new(-1.0).is_err());
        assert!(StudentApproximation::new(f64::NAN).is_err());
        assert!(StudentApproximation::new(1.0).unwrap().with_index(0).is_err());
    }

    #[test]
    fn test_limit_order_ignores_moments() {
        let a = chi2_approx(1.0);
        let b = a.with_moments(0.0, 3.0).with_index(500).unwrap();
        let points = [-4.0, -1.0, 0.0, 0.5, 7.0];
        let pa = a.cdf(&points, ApproximationOrder::Limit).unwrap();
        let pb = b.cdf(&points, ApproximationOrder::Limit).unwrap();
        assert_eq!(pa, pb);
        let t = StudentT::new(2.0).unwrap();
        for (&x, &v) in points.iter().zip(&pa) {
            assert_eq!(v, t.cdf(x));
        }
    }

    #[test]
    fn test_gn_normalizers_differ() {
        let a = chi2_approx(1.0);
        assert_eq!(a.cdf_gn(), 8.0);
        assert_eq!(a.quantile_gn(), 10.0);
    }

    #[test]
    fn test_non_positive_cdf_gn() {
        // r = 0.1, nn = 10: gn = 0.9 − 1 < 0
        let a = StudentApproximation::new(0.1).unwrap();
        assert!(a.cdf(&[0.0], ApproximationOrder::Limit).is_ok());
        assert!(matches!(
            a.cdf(&[0.0], ApproximationOrder::First),
            Err(Error::InvalidParameter(_))
        ));
        assert!(a.cdf(&[0.0], ApproximationOrder::Second).is_err());
    }

    #[test]
    fn test_empty_grid_skips_normalizer_check() {
        // r = 0.1, nn = 10: gn < 0, but there is nothing to evaluate
        let a = StudentApproximation::new(0.1).unwrap();
        for order in ApproximationOrder::ALL {
            assert!(a.cdf(&[], order).unwrap().is_empty());
        }
    }

    #[test]
    fn test_cdf_hand_computed_r1() {
        // r = 1 → t(2): F(1) = 1/2 + 1/(2√3), f(1) = 3^(−3/2), gn = 8.
        // μ₃² = 8, μ₄ = 12 give a1 = −μ₃/3, a21 = 4, a22 = −4.5.
        let a = chi2_approx(1.0);
        let mu3 = 8.0_f64.sqrt();
        let cdf = 0.5 + 1.0 / (2.0 * 3.0_f64.sqrt());
        let pdf = 3.0_f64.powf(-1.5);
        let a1 = -mu3 / 3.0;
        let skew = a1 * pdf / 8.0_f64.sqrt();

        let first = a.cdf(&[1.0], ApproximationOrder::First).unwrap()[0];
        assert!((first - (cdf + skew)).abs() < 1e-10, "first = {first}");

        let second = a.cdf(&[1.0], ApproximationOrder::Second).unwrap()[0];
        let expected = cdf - skew - pdf * (4.0 - 4.5) / 8.0;
        assert!((second - expected).abs() < 1e-10, "second = {second}, expected {expected}");
    }

    #[test]
    fn test_quantile_hand_computed_r1() {
        // p = 0.75 on t(2): q = √(2/3). With μ₃² = 8, μ₄ = 12:
        // b0 = −1, b1 = −μ₃/3, b21 = −q/2, b22 = 0, b23 = −35q/108.
        let a = chi2_approx(1.0);
        let q = (2.0_f64 / 3.0).sqrt();
        let mu3 = 8.0_f64.sqrt();
        let expected = q + (-mu3 / 3.0) / 10.0_f64.sqrt() + (-q / 2.0 - 35.0 * q / 108.0) / 10.0;
        let got = a.quantile_at(0.75);
        assert!((got - expected).abs() < 1e-9, "{got} vs {expected}");
    }

    #[test]
    fn test_quantile_cdf_inverse_at_limit() {
        // r = 2 with μ₃ = μ₄ = 0 cancels every quantile correction.
        let a = StudentApproximation::new(2.0)
            .unwrap()
            .with_index(10)
            .unwrap()
            .with_moments(0.0, 0.0);
        let probs = [0.001, 0.05, 0.3, 0.5, 0.62, 0.95, 0.999];
        let q = a.quantiles(&probs).unwrap();
        let back = a.cdf(&q, ApproximationOrder::Limit).unwrap();
        for (&p, &b) in probs.iter().zip(&back) {
            assert!((p - b).abs() < 1e-9, "p={p}, back={b}");
        }
    }

    #[test]
    fn test_quantile_endpoints() {
        let q = chi2_approx(1.0).quantiles(&[0.0, 1.0]).unwrap();
        assert_eq!(q, vec![f64::NEG_INFINITY, f64::INFINITY]);
    }

    #[test]
    fn test_empty_grid() {
        let a = chi2_approx(2.0);
        assert!(a.cdf(&[], ApproximationOrder::Second).unwrap().is_empty());
        assert!(a.quantiles(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_quantile_rejects_bad_probabilities() {
        assert!(chi2_approx(1.0).quantiles(&[f64::NAN]).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn output_matches_input_length(
            points in proptest::collection::vec(-20.0_f64..20.0, 0..48),
            order in 0_u8..3,
            r in 1.0_f64..6.0,
        ) {
            let a = StudentApproximation::new(r).unwrap();
            let order = ApproximationOrder::try_from(order).unwrap();
            let out = a.cdf(&points, order).unwrap();
            prop_assert_eq!(out.len(), points.len());
        }

        #[test]
        fn limit_cdf_monotonic(
            r in 0.6_f64..10.0,
            x1 in -15.0_f64..15.0,
            x2 in -15.0_f64..15.0,
        ) {
            let a = StudentApproximation::new(r).unwrap();
            let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
            let v = a.cdf(&[lo, hi], ApproximationOrder::Limit).unwrap();
            prop_assert!(v[0] <= v[1] + 1e-14);
        }

        #[test]
        fn quantiles_finite_inside_unit_interval(p in 0.001_f64..0.999, r in 0.6_f64..5.0) {
            let a = StudentApproximation::new(r).unwrap().with_moments(8.0_f64.sqrt(), 12.0);
            prop_assert!(a.quantile_at(p).is_finite());
        }
    }
}
