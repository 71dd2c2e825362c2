//! tabula-stats - Statistical functions for analysis reports
//!
//! This crate provides the numeric primitives behind significance-test
//! reports and chart summaries:
//!
//! - **Descriptive**: mean, variance, standard deviation, quartiles, 95% CI
//! - **Special functions**: log-gamma and the regularized incomplete beta
//! - **Hypothesis tests**: independent and paired t-tests
//! - **Regression**: least-squares line, Pearson's r
//! - **Normal curve**: pdf overlays scaled to observed counts
//!
//! # Numerical quality
//!
//! The incomplete beta function is evaluated with a bounded continued
//! fraction. When it fails to converge the best estimate is still returned,
//! flagged through [`IncompleteBeta::converged`], so callers can report an
//! approximate p-value instead of losing the result.

pub mod descriptive;
pub mod error;
pub mod hypothesis;
pub mod normal;
pub mod regression;
pub mod special;

pub use descriptive::*;
pub use error::{StatsError, StatsResult};
pub use hypothesis::*;
pub use normal::*;
pub use regression::*;
pub use special::*;
