//! Empirical distribution of the randomly indexed statistic.
//!
//! Each observation averages `Nn` draws from the base distribution and
//! centers the mean at `mu`. Scaling by the law-specific normalizer and
//! sorting gives the empirical quantiles compared against the
//! approximations.

use rand::Rng;
use rand_distr::{ChiSquared, Distribution};

use crate::approximation::linspace;
use crate::error::{Error, Result};
use crate::moments::{BaseDistribution, MomentSet};
use crate::stats;

/// Per-observation centered means.
///
/// Entry `i` is the mean of `sizes[i]` i.i.d. draws from `base` with the
/// given shape parameter, minus the distribution mean `mu`.
///
/// # Errors
/// - [`Error::DegenerateInput`] if any size is zero.
/// - [`Error::InvalidParameter`] / [`Error::Sampling`] for a bad shape.
///
/// # Examples
/// ```
/// use u_edgeworth::empirical::empirical_means;
/// use u_edgeworth::moments::BaseDistribution;
/// use u_edgeworth::sampling::create_rng;
///
/// let means = empirical_means(&[5, 1, 20], BaseDistribution::ChiSquared, 1.0, &mut create_rng(3)).unwrap();
/// assert_eq!(means.len(), 3);
/// // a centered chi-squared mean is bounded below by −df
/// assert!(means.iter().all(|&m| m >= -1.0));
/// ```
pub fn empirical_means<R: Rng>(
    sizes: &[u32],
    base: BaseDistribution,
    shape: f64,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if let Some(i) = sizes.iter().position(|&n| n == 0) {
        return Err(Error::DegenerateInput(format!(
            "sample size at index {i} is zero, the mean of no draws is undefined"
        )));
    }
    let moments = base.moments(shape)?;

    match base {
        BaseDistribution::ChiSquared => {
            let law = ChiSquared::new(shape).map_err(|e| Error::Sampling(e.to_string()))?;
            centered_means(sizes, &law, moments.mu, rng)
        }
    }
}

fn centered_means<D, R>(sizes: &[u32], law: &D, mu: f64, rng: &mut R) -> Result<Vec<f64>>
where
    D: Distribution<f64>,
    R: Rng,
{
    let mut draws = Vec::new();
    sizes
        .iter()
        .map(|&n| {
            draws.clear();
            draws.extend((0..n).map(|_| law.sample(rng)));
            stats::mean(&draws)
                .map(|m| m - mu)
                .ok_or_else(|| Error::DegenerateInput("non-finite draw in sample".into()))
        })
        .collect()
}

/// Scales the means by `factor` and sorts ascending.
pub fn normalized_statistic(means: &[f64], factor: f64) -> Vec<f64> {
    let mut values: Vec<f64> = means.iter().map(|&m| m * factor).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// Laplace-case statistic: means scaled by `sigma·√nn`, sorted.
pub fn laplace_statistic(means: &[f64], moments: &MomentSet, nn: u32) -> Vec<f64> {
    normalized_statistic(means, moments.sigma * f64::from(nn).sqrt())
}

/// Student-case statistic: means scaled by `sigma·√(r(nn−1) + 1)`, sorted.
pub fn student_statistic(means: &[f64], moments: &MomentSet, r: f64, nn: u32) -> Vec<f64> {
    let gn = r * (f64::from(nn) - 1.0) + 1.0;
    normalized_statistic(means, moments.sigma * gn.sqrt())
}

/// Empirical CDF pairs `(value, level)` with levels evenly spaced over
/// `[0, 1]`. `sorted` must be ascending.
pub fn empirical_cdf(sorted: &[f64]) -> Vec<(f64, f64)> {
    sorted
        .iter()
        .copied()
        .zip(linspace(0.0, 1.0, sorted.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::create_rng;

    #[test]
    fn test_zero_size_is_degenerate() {
        let mut rng = create_rng(1);
        let result = empirical_means(&[3, 0, 2], BaseDistribution::ChiSquared, 1.0, &mut rng);
        assert!(matches!(result, Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn test_empty_sizes() {
        let mut rng = create_rng(1);
        let means = empirical_means(&[], BaseDistribution::ChiSquared, 1.0, &mut rng).unwrap();
        assert!(means.is_empty());
    }

    #[test]
    fn test_invalid_shape() {
        let mut rng = create_rng(1);
        assert!(empirical_means(&[1], BaseDistribution::ChiSquared, 0.0, &mut rng).is_err());
    }

    #[test]
    fn test_means_are_centered() {
        // Large samples: each centered mean is close to zero.
        let mut rng = create_rng(8);
        let means =
            empirical_means(&[50_000; 4], BaseDistribution::ChiSquared, 3.0, &mut rng).unwrap();
        for m in means {
            assert!(m.abs() < 0.1, "centered mean {m}");
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let sizes = [4, 9, 1, 30];
        let a = empirical_means(&sizes, BaseDistribution::ChiSquared, 1.0, &mut create_rng(5));
        let b = empirical_means(&sizes, BaseDistribution::ChiSquared, 1.0, &mut create_rng(5));
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[test]
    fn test_statistics_scale_and_sort() {
        let moments = BaseDistribution::ChiSquared.moments(2.0).unwrap();
        let means = [0.4, -0.2, 0.0];
        // sigma = 1/2, √nn = 2
        assert_eq!(laplace_statistic(&means, &moments, 4), vec![-0.2, 0.0, 0.4]);
        // r(nn − 1) + 1 = 16
        assert_eq!(student_statistic(&means, &moments, 1.0, 16), vec![-0.4, 0.0, 0.8]);
    }

    #[test]
    fn test_empirical_cdf_levels() {
        let pairs = empirical_cdf(&[-1.0, 0.0, 2.0]);
        assert_eq!(pairs, vec![(-1.0, 0.0), (0.0, 0.5), (2.0, 1.0)]);
        assert!(empirical_cdf(&[]).is_empty());
    }
}
