//! Normal distribution overlays for histograms

use std::f64::consts::PI;

use crate::descriptive::{mean, stdev};
use crate::error::{StatsError, StatsResult};

/// Probability density of N(mu, sigma²) at x
pub fn normal_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    (-0.5 * z * z).exp() / (sigma * (2.0 * PI).sqrt())
}

/// Normal curve heights at each bin start, scaled so they sum to `total`
///
/// Mean and standard deviation come from `values`. Needs at least two
/// values with some spread.
pub fn normal_curve(values: &[f64], bin_starts: &[f64], total: f64) -> StatsResult<Vec<f64>> {
    if values.len() < 2 {
        return Err(StatsError::DegenerateSample {
            needed: 2,
            got: values.len(),
        });
    }
    let mu = mean(values)?;
    let sigma = stdev(values)?;
    if sigma == 0.0 {
        return Err(StatsError::InadequateVariability);
    }

    let heights: Vec<f64> = bin_starts
        .iter()
        .map(|&x| normal_pdf(x, mu, sigma))
        .collect();
    let sum: f64 = heights.iter().sum();
    if sum == 0.0 {
        return Ok(heights);
    }
    let multiplier = total / sum;
    Ok(heights.into_iter().map(|h| h * multiplier).collect())
}
