//! # u-edgeworth
//!
//! Edgeworth and Cornish-Fisher approximations for randomly indexed sums.
//!
//! The statistic of interest is a normalized mean whose sample size `Nn` is
//! itself random. Depending on the law of `Nn` the statistic converges to a
//! Laplace law (max of discrete Pareto sizes) or a Student t law (negative
//! binomial sizes). This crate refines both limits with first- and
//! second-order correction terms driven by the skewness `μ₃` and kurtosis
//! `μ₄` of the summands, and compares the refined curves against a
//! simulated statistic.
//!
//! ## Modules
//!
//! - [`approximation`]: approximation orders and shared helpers
//! - [`laplace`]: Laplace-case CDF and quantile approximations
//! - [`student`]: Student-case CDF and quantile approximations
//! - [`distributions`]: Laplace and Student t limit laws
//! - [`special`]: gamma, incomplete beta and Student t special functions
//! - [`moments`]: base-distribution moment registry
//! - [`sampling`]: random index samplers
//! - [`empirical`]: simulated statistic and empirical CDF
//! - [`qq`]: QQ-plot data with a least-squares fit
//! - [`stats`]: compensated mean and linear regression
//! - [`workflow`]: configurable end-to-end comparison runs
//! - [`error`]: crate error type
//!
//! ## Design Philosophy
//!
//! - **Closed forms first**: every correction term is evaluated directly,
//!   with no numerical differentiation or series truncation beyond order two
//! - **Validated construction**: parameters are checked once, when an
//!   approximation or sampler is built
//! - **Property-based testing**: mathematical invariants verified via proptest

pub mod approximation;
pub mod distributions;
pub mod empirical;
pub mod error;
pub mod laplace;
pub mod moments;
pub mod qq;
pub mod sampling;
pub mod special;
pub mod stats;
pub mod student;
pub mod workflow;

pub use error::{Error, Result};
