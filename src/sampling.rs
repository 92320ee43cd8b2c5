//! Random index samplers.
//!
//! The random sample size Nn behind each observation of the statistic is
//! drawn from one of two discrete laws:
//!
//! - [`MaxDiscretePareto`]: the maximum of `rv_num` discrete Pareto variates,
//!   which leads to the Laplace limit.
//! - [`ShiftedNegativeBinomial`]: one plus a negative binomial count of
//!   failures, which leads to the Student limit.
//!
//! # Reproducibility
//!
//! Use [`create_rng`] with a fixed seed. The underlying algorithm
//! (SmallRng) is deterministic for a given seed on the same platform.

use rand::Rng;
use rand_distr::{Distribution, Gamma, Poisson};
use tracing::debug;

use crate::error::{Error, Result};

/// Default support size `{1, …, 10 000}` of the max-of-Pareto law.
pub const DEFAULT_INTERVAL_SIZE: u32 = 10_000;

/// Absolute tolerance on probability masses before they count as negative.
const MASS_TOLERANCE: f64 = 1e-12;

/// Creates a fast, seeded random number generator.
///
/// # Examples
/// ```
/// use u_edgeworth::sampling::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Pre-computed weighted sampler for O(log n) repeated sampling.
///
/// Builds a cumulative table from the weights and answers each draw with a
/// binary search.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    cumulative: Vec<f64>,
    total: f64,
}

impl WeightedSampler {
    /// # Returns
    /// - `None` if `weights` is empty or all weights are zero/negative.
    pub fn new(weights: &[f64]) -> Option<Self> {
        if weights.is_empty() {
            return None;
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for &w in weights {
            if w > 0.0 {
                total += w;
            }
            cumulative.push(total);
        }

        if total <= 0.0 || !total.is_finite() {
            return None;
        }

        Some(Self { cumulative, total })
    }

    /// Samples an index according to the weights.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let threshold = rng.random_range(0.0..self.total);
        self.cumulative
            .partition_point(|&c| c <= threshold)
            .min(self.cumulative.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.total
    }
}

// ============================================================================
// Max of discrete Pareto
// ============================================================================

/// Law of the maximum of `rv_num` i.i.d. discrete Pareto variates on
/// `{1, …, interval_size}`.
///
/// # Mathematical Definition
/// With `F(j) = (j / (shape + j))^rv_num` the CDF of the maximum,
///
/// ```text
/// P(N = j) = F(j) − F(j − 1)        for j < interval_size
/// P(N = interval_size) = 1 − Σ_{j < interval_size} P(N = j)
/// ```
///
/// The last bin absorbs the truncated tail so the masses sum to one. The
/// caller picks `interval_size` large enough for that tail to be negligible.
///
/// # Examples
/// ```
/// use u_edgeworth::sampling::{create_rng, MaxDiscretePareto};
/// let law = MaxDiscretePareto::new(2.0, 10, 10_000).unwrap();
/// let sizes = law.sample_n(1_000, &mut create_rng(7));
/// assert_eq!(sizes.len(), 1_000);
/// assert!(sizes.iter().all(|&n| (1..=10_000).contains(&n)));
/// ```
#[derive(Debug, Clone)]
pub struct MaxDiscretePareto {
    shape: f64,
    rv_num: u32,
    pmf: Vec<f64>,
    sampler: WeightedSampler,
}

impl MaxDiscretePareto {
    /// # Errors
    /// Returns `Err` if `shape ≤ 0`, `rv_num == 0`, `interval_size == 0`,
    /// or a computed mass is negative beyond floating-point tolerance.
    pub fn new(shape: f64, rv_num: u32, interval_size: u32) -> Result<Self> {
        if !shape.is_finite() || shape <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "discrete Pareto shape must be > 0, got {shape}"
            )));
        }
        if rv_num == 0 {
            return Err(Error::InvalidParameter("rv_num must be ≥ 1".into()));
        }
        if interval_size == 0 {
            return Err(Error::InvalidParameter("interval_size must be ≥ 1".into()));
        }

        let power = f64::from(rv_num);
        let max_cdf = |j: f64| (j / (shape + j)).powf(power);

        let m = interval_size as usize;
        let mut pmf = Vec::with_capacity(m);
        for j in 1..m {
            let j = j as f64;
            let mass = max_cdf(j) - max_cdf(j - 1.0);
            if mass < -MASS_TOLERANCE {
                return Err(Error::InvalidParameter(format!(
                    "negative probability mass {mass} at j={j} (shape={shape}, rv_num={rv_num})"
                )));
            }
            pmf.push(mass.max(0.0));
        }

        let head: f64 = pmf.iter().sum();
        let tail = 1.0 - head;
        if tail < -MASS_TOLERANCE {
            return Err(Error::InvalidParameter(format!(
                "probability masses exceed one by {} (interval_size={interval_size})",
                -tail
            )));
        }
        pmf.push(tail.max(0.0));
        debug!(shape, rv_num, interval_size, tail_mass = tail, "built max discrete Pareto law");

        let sampler = WeightedSampler::new(&pmf).ok_or_else(|| {
            Error::DegenerateInput("max discrete Pareto law has no positive mass".into())
        })?;

        Ok(Self {
            shape,
            rv_num,
            pmf,
            sampler,
        })
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn rv_num(&self) -> u32 {
        self.rv_num
    }

    pub fn interval_size(&self) -> u32 {
        self.pmf.len() as u32
    }

    /// Probability masses of the values `1..=interval_size`, in order.
    pub fn pmf(&self) -> &[f64] {
        &self.pmf
    }

    /// Draws one sample size in `[1, interval_size]`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> u32 {
        self.sampler.sample(rng) as u32 + 1
    }

    /// Draws `n` i.i.d. sample sizes with replacement.
    pub fn sample_n<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<u32> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

/// Draws `n` sizes from the max of `rv_num` discrete Pareto variates on
/// `{1, …, interval_size}`.
///
/// # Errors
/// See [`MaxDiscretePareto::new`].
pub fn sample_max_discrete_pareto<R: Rng>(
    shape: f64,
    rv_num: u32,
    n: usize,
    interval_size: u32,
    rng: &mut R,
) -> Result<Vec<u32>> {
    Ok(MaxDiscretePareto::new(shape, rv_num, interval_size)?.sample_n(n, rng))
}

// ============================================================================
// Shifted negative binomial
// ============================================================================

/// `1 + NB(r, p)`, where `NB(r, p)` counts failures before the `r`-th
/// success with success probability `p`.
///
/// # Algorithm
/// Gamma–Poisson mixture: `λ ~ Gamma(r, (1−p)/p)`, `K ~ Poisson(λ)`. This
/// supports fractional `r`.
///
/// The mean is `1 + r(1−p)/p`; with `p = 1/nn` that is `r(nn−1) + 1`, the
/// normalizer of the Student-case statistic.
#[derive(Debug, Clone)]
pub struct ShiftedNegativeBinomial {
    r: f64,
    p: f64,
    mixing: Option<Gamma<f64>>,
}

impl ShiftedNegativeBinomial {
    /// # Errors
    /// Returns `Err` if `r ≤ 0` or `p ∉ (0, 1]`.
    pub fn new(r: f64, p: f64) -> Result<Self> {
        if !r.is_finite() || r <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "negative binomial r must be > 0, got {r}"
            )));
        }
        if !(p > 0.0 && p <= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "negative binomial p must lie in (0, 1], got {p}"
            )));
        }
        let mixing = if p < 1.0 {
            let gamma = Gamma::new(r, (1.0 - p) / p).map_err(|e| Error::Sampling(e.to_string()))?;
            Some(gamma)
        } else {
            None
        };
        Ok(Self { r, p, mixing })
    }

    /// Parameterization used by the Student workflow: `p = 1/nn`.
    ///
    /// # Errors
    /// Returns `Err` if `r ≤ 0` or `nn == 0`.
    pub fn for_index(r: f64, nn: u32) -> Result<Self> {
        if nn == 0 {
            return Err(Error::InvalidParameter("nn must be ≥ 1".into()));
        }
        Self::new(r, 1.0 / f64::from(nn))
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn mean(&self) -> f64 {
        1.0 + self.r * (1.0 - self.p) / self.p
    }

    /// Draws one sample size, always ≥ 1.
    ///
    /// # Errors
    /// Returns `Err` if the mixed Poisson rate is too large to sample.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Result<u32> {
        let Some(gamma) = &self.mixing else {
            return Ok(1);
        };
        let lambda = gamma.sample(rng);
        if lambda <= 0.0 {
            return Ok(1);
        }
        let poisson = Poisson::new(lambda).map_err(|e| Error::Sampling(e.to_string()))?;
        let failures: f64 = poisson.sample(rng);
        Ok(1 + failures as u32)
    }

    /// Draws `n` i.i.d. sample sizes.
    ///
    /// # Errors
    /// See [`ShiftedNegativeBinomial::sample`].
    pub fn sample_n<R: Rng>(&self, n: usize, rng: &mut R) -> Result<Vec<u32>> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
