//! End-to-end comparison runs.
//!
//! A run draws random sample sizes from the law selected by
//! [`LimitLaw`], simulates the normalized statistic from the configured base
//! distribution, and sets it against the approximations: as CDF curves over
//! an `x` grid ([`cdf_comparison`]) or as QQ-plot data ([`qq_comparison`]).
//!
//! # Configuration
//!
//! [`WorkflowConfig`] is plain serde data. Every field has a default, so a
//! JSON document only needs to name what it changes:
//!
//! ```
//! use u_edgeworth::workflow::{LimitLaw, WorkflowConfig};
//!
//! let config = WorkflowConfig::from_json(
//!     r#"{ "nn": 20, "law": { "kind": "student", "r": 2.0 } }"#,
//! ).unwrap();
//! assert_eq!(config.nn, 20);
//! assert_eq!(config.law, LimitLaw::Student { r: 2.0 });
//! assert_eq!(config.distribution_name, "chi2");
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::approximation::{linspace, ApproximationOrder};
use crate::empirical::{empirical_cdf, empirical_means, laplace_statistic, student_statistic};
use crate::error::{Error, Result};
use crate::laplace::LaplaceApproximation;
use crate::moments::{BaseDistribution, MomentSet};
use crate::qq::{qq_plot, QqPlot};
use crate::sampling::{MaxDiscretePareto, ShiftedNegativeBinomial, DEFAULT_INTERVAL_SIZE};
use crate::student::StudentApproximation;

/// Limit law of the statistic together with its random-index parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LimitLaw {
    /// Sizes from the max of `nn` discrete Pareto(`s`) variates on
    /// `{1, …, interval_size}`; Laplace limit.
    Laplace {
        s: f64,
        #[serde(default = "default_interval_size")]
        interval_size: u32,
    },
    /// Sizes from `1 + NB(r, 1/nn)`; Student t(2r) limit.
    Student { r: f64 },
}

fn default_interval_size() -> u32 {
    DEFAULT_INTERVAL_SIZE
}

impl Default for LimitLaw {
    fn default() -> Self {
        LimitLaw::Laplace {
            s: 2.0,
            interval_size: DEFAULT_INTERVAL_SIZE,
        }
    }
}

/// Parameters of a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Registry name of the base distribution, e.g. `"chi2"`.
    pub distribution_name: String,
    /// Shape parameter of the base distribution (degrees of freedom for χ²).
    pub shape_param: f64,
    /// Number of simulated values of the statistic.
    pub observation_count: usize,
    /// Number of `x` grid points for CDF curves.
    pub point_count: usize,
    /// Index scale `nn`.
    pub nn: u32,
    pub law: LimitLaw,
    /// Inclusive `x` range of the CDF grid.
    pub x_range: (f64, f64),
    /// Seed for [`crate::sampling::create_rng`].
    pub seed: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            distribution_name: BaseDistribution::ChiSquared.name().to_string(),
            shape_param: 1.0,
            observation_count: 10_000,
            point_count: 10_000,
            nn: 10,
            law: LimitLaw::default(),
            x_range: (-10.0, 10.0),
            seed: 42,
        }
    }
}

impl WorkflowConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// [`Error::Config`] for malformed JSON, otherwise whatever
    /// [`WorkflowConfig::validate`] reports.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every parameter before any sampling starts.
    ///
    /// # Errors
    /// - [`Error::UnsupportedDistribution`] for an unknown distribution name.
    /// - [`Error::InvalidParameter`] for zero counts, `nn == 0`, a bad shape,
    ///   an empty or non-finite `x` range, or bad law parameters.
    pub fn validate(&self) -> Result<()> {
        self.base()?.moments(self.shape_param)?;
        if self.observation_count == 0 {
            return Err(Error::InvalidParameter("observation_count must be ≥ 1".into()));
        }
        if self.point_count == 0 {
            return Err(Error::InvalidParameter("point_count must be ≥ 1".into()));
        }
        if self.nn == 0 {
            return Err(Error::InvalidParameter("nn must be ≥ 1".into()));
        }
        let (lo, hi) = self.x_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(Error::InvalidParameter(format!(
                "x_range must be finite with start < end, got ({lo}, {hi})"
            )));
        }
        match self.law {
            LimitLaw::Laplace { s, interval_size } => {
                if !s.is_finite() || s <= 0.0 {
                    return Err(Error::InvalidParameter(format!("s must be > 0, got {s}")));
                }
                if interval_size == 0 {
                    return Err(Error::InvalidParameter("interval_size must be ≥ 1".into()));
                }
            }
            LimitLaw::Student { r } => {
                if !r.is_finite() || r <= 0.0 || 2.0 * r - 1.0 == 0.0 {
                    return Err(Error::InvalidParameter(format!(
                        "r must be > 0 and != 0.5, got {r}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// The parsed base distribution.
    ///
    /// # Errors
    /// [`Error::UnsupportedDistribution`] for an unknown name.
    pub fn base(&self) -> Result<BaseDistribution> {
        self.distribution_name.parse()
    }
}

/// Empirical and approximate CDF curves of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdfComparison {
    /// `(value, level)` pairs of the sorted statistic.
    pub empirical: Vec<(f64, f64)>,
    /// Grid the approximate curves are evaluated on.
    pub grid: Vec<f64>,
    pub pure: Vec<f64>,
    pub first: Vec<f64>,
    pub second: Vec<f64>,
}

impl CdfComparison {
    /// Approximate curve of the given order as `(x, F(x))` pairs.
    pub fn curve(&self, order: ApproximationOrder) -> Vec<(f64, f64)> {
        let values = match order {
            ApproximationOrder::Limit => &self.pure,
            ApproximationOrder::First => &self.first,
            ApproximationOrder::Second => &self.second,
        };
        self.grid.iter().copied().zip(values.iter().copied()).collect()
    }

    /// Largest vertical gap between the empirical step function and the
    /// curve of the given order, over the grid.
    pub fn max_deviation(&self, order: ApproximationOrder) -> f64 {
        let n = self.empirical.len() as f64;
        let values: Vec<f64> = self.empirical.iter().map(|&(v, _)| v).collect();
        self.curve(order)
            .into_iter()
            .map(|(x, fx)| {
                let below = values.partition_point(|&v| v <= x) as f64;
                (below / n - fx).abs()
            })
            .fold(0.0, f64::max)
    }
}

/// Runs a CDF comparison.
///
/// # Errors
/// Configuration errors from [`WorkflowConfig::validate`], sampling errors,
/// and, for the Student law, `r(nn − 1) − 1 ≤ 0`.
///
/// # Examples
/// ```
/// use u_edgeworth::sampling::create_rng;
/// use u_edgeworth::workflow::{cdf_comparison, LimitLaw, WorkflowConfig};
///
/// let config = WorkflowConfig {
///     observation_count: 500,
///     point_count: 101,
///     law: LimitLaw::Laplace { s: 2.0, interval_size: 1_000 },
///     ..WorkflowConfig::default()
/// };
/// let run = cdf_comparison(&config, &mut create_rng(config.seed)).unwrap();
/// assert_eq!(run.empirical.len(), 500);
/// assert_eq!(run.second.len(), 101);
/// ```
pub fn cdf_comparison<R: Rng>(config: &WorkflowConfig, rng: &mut R) -> Result<CdfComparison> {
    config.validate()?;
    info!(
        distribution = %config.distribution_name,
        shape = config.shape_param,
        nn = config.nn,
        observations = config.observation_count,
        points = config.point_count,
        "starting CDF comparison"
    );

    let approximation = Approximation::from_config(config)?;
    let (lo, hi) = config.x_range;
    let grid = linspace(lo, hi, config.point_count);
    let pure = approximation.cdf(&grid, ApproximationOrder::Limit)?;
    let first = approximation.cdf(&grid, ApproximationOrder::First)?;
    let second = approximation.cdf(&grid, ApproximationOrder::Second)?;

    let statistic = simulate_statistic(config, rng)?;
    Ok(CdfComparison {
        empirical: empirical_cdf(&statistic),
        grid,
        pure,
        first,
        second,
    })
}

/// Runs a QQ comparison of the simulated statistic against second-order
/// quantile approximations at plotting positions `(i + 0.5)/n`.
///
/// # Errors
/// Configuration errors from [`WorkflowConfig::validate`] and sampling
/// errors.
pub fn qq_comparison<R: Rng>(config: &WorkflowConfig, rng: &mut R) -> Result<QqPlot> {
    config.validate()?;
    info!(
        distribution = %config.distribution_name,
        shape = config.shape_param,
        nn = config.nn,
        observations = config.observation_count,
        "starting QQ comparison"
    );

    let approximation = Approximation::from_config(config)?;
    let n = config.observation_count;
    let probs: Vec<f64> = (0..n).map(|i| (i as f64 + 0.5) / n as f64).collect();
    let approximate = approximation.quantiles(&probs)?;

    let statistic = simulate_statistic(config, rng)?;
    qq_plot(&statistic, &approximate, true)
}

fn simulate_statistic<R: Rng>(config: &WorkflowConfig, rng: &mut R) -> Result<Vec<f64>> {
    let base = config.base()?;
    let moments: MomentSet = base.moments(config.shape_param)?;
    let n = config.observation_count;

    let sizes = match config.law {
        LimitLaw::Laplace { s, interval_size } => {
            MaxDiscretePareto::new(s, config.nn, interval_size)?.sample_n(n, rng)
        }
        LimitLaw::Student { r } => {
            ShiftedNegativeBinomial::for_index(r, config.nn)?.sample_n(n, rng)?
        }
    };
    debug!(
        total_draws = sizes.iter().map(|&s| u64::from(s)).sum::<u64>(),
        largest = sizes.iter().copied().max().unwrap_or(0),
        "sampled random sizes"
    );

    let means = empirical_means(&sizes, base, config.shape_param, rng)?;
    Ok(match config.law {
        LimitLaw::Laplace { .. } => laplace_statistic(&means, &moments, config.nn),
        LimitLaw::Student { r } => student_statistic(&means, &moments, r, config.nn),
    })
}

/// The approximation family matching a [`LimitLaw`].
enum Approximation {
    Laplace(LaplaceApproximation),
    Student(StudentApproximation),
}

impl Approximation {
    fn from_config(config: &WorkflowConfig) -> Result<Self> {
        let moments = config.base()?.moments(config.shape_param)?;
        Ok(match config.law {
            LimitLaw::Laplace { s, .. } => Approximation::Laplace(
                LaplaceApproximation::new(0.0, 1.0)?
                    .with_index(s, config.nn)?
                    .with_moments(moments.mu3, moments.mu4),
            ),
            LimitLaw::Student { r } => Approximation::Student(
                StudentApproximation::new(r)?
                    .with_index(config.nn)?
                    .with_moments(moments.mu3, moments.mu4),
            ),
        })
    }

    fn cdf(&self, points: &[f64], order: ApproximationOrder) -> Result<Vec<f64>> {
        match self {
            Approximation::Laplace(a) => a.cdf(points, order),
            Approximation::Student(a) => a.cdf(points, order),
        }
    }

    fn quantiles(&self, probs: &[f64]) -> Result<Vec<f64>> {
        match self {
            Approximation::Laplace(a) => a.quantiles(probs),
            Approximation::Student(a) => a.quantiles(probs),
        }
    }
}
