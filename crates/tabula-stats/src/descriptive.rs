//! Descriptive statistics for samples
//!
//! Provides the estimators used throughout reports and charts:
//! - Mean, N-1 variance and standard deviation (plus N-denominator variants)
//! - Sum of squares
//! - Median and quartiles
//! - 95% confidence interval of the mean

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Standard normal multiplier for a 95% confidence interval
const CI95_Z: f64 = 1.96;

/// Arithmetic mean
pub fn mean(values: &[f64]) -> StatsResult<f64> {
    if values.is_empty() {
        return Err(StatsError::EmptySample);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sum of squared values (Σxᵢ²)
pub fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|x| x * x).sum()
}

/// Variance using N-1 in the denominator (estimates population variance)
pub fn variance(values: &[f64]) -> StatsResult<f64> {
    let n = values.len();
    if n < 2 {
        return Err(StatsError::DegenerateSample { needed: 2, got: n });
    }
    let mn = mean(values)?;
    let deviations: Vec<f64> = values.iter().map(|x| x - mn).collect();
    Ok(sum_of_squares(&deviations) / (n - 1) as f64)
}

/// Standard deviation using N-1 in the denominator
pub fn stdev(values: &[f64]) -> StatsResult<f64> {
    Ok(variance(values)?.sqrt())
}

/// Variance using N in the denominator (describes the sample only)
pub fn sample_variance(values: &[f64]) -> StatsResult<f64> {
    let n = values.len();
    if n < 2 {
        return Err(StatsError::DegenerateSample { needed: 2, got: n });
    }
    let mn = mean(values)?;
    let deviations: Vec<f64> = values.iter().map(|x| x - mn).collect();
    Ok(sum_of_squares(&deviations) / n as f64)
}

/// Standard deviation using N in the denominator
pub fn sample_stdev(values: &[f64]) -> StatsResult<f64> {
    Ok(sample_variance(values)?.sqrt())
}

/// Sorted copy of the input, leaving the caller's order untouched
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Minimum and maximum, or `None` for an empty slice
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Median (average of the two middle values for even counts)
pub fn median(values: &[f64]) -> StatsResult<f64> {
    if values.is_empty() {
        return Err(StatsError::EmptySample);
    }
    Ok(median_of_sorted(&sorted_copy(values)))
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Lower and upper quartiles
///
/// Uses the depth method from Wild & Seber: depth = (floor(n/2) + 1) / 2,
/// counted from the left for the lower quartile and from the right for the
/// upper. A fractional depth averages the two neighbouring order statistics.
pub fn quartiles(values: &[f64]) -> StatsResult<(f64, f64)> {
    if values.is_empty() {
        return Err(StatsError::EmptySample);
    }
    Ok(quartiles_of_sorted(&sorted_copy(values)))
}

/// Quartiles of an already sorted, non-empty slice
pub(crate) fn quartiles_of_sorted(sorted: &[f64]) -> (f64, f64) {
    let n = sorted.len();
    if n == 1 {
        return (sorted[0], sorted[0]);
    }
    let depth = ((n / 2) as f64 + 1.0) / 2.0;
    let ldepth = depth as usize;
    if depth.fract() == 0.0 {
        (sorted[ldepth - 1], sorted[n - ldepth])
    } else {
        let udepth = ldepth + 1;
        let lq = (sorted[ldepth - 1] + sorted[udepth - 1]) / 2.0;
        let uq = (sorted[n - ldepth] + sorted[n - udepth]) / 2.0;
        (lq, uq)
    }
}

/// Five-number box summary: quartiles bracketing the median
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuartileSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl QuartileSummary {
    /// Summarize a sample
    pub fn from_data(values: &[f64]) -> StatsResult<Self> {
        if values.is_empty() {
            return Err(StatsError::EmptySample);
        }
        let sorted = sorted_copy(values);
        let (q1, q3) = quartiles_of_sorted(&sorted);
        Ok(Self {
            min: sorted[0],
            q1,
            median: median_of_sorted(&sorted),
            q3,
            max: sorted[sorted.len() - 1],
        })
    }

    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// 95% confidence interval of the mean from summary values
pub fn confidence_interval_95(mean: f64, sd: f64, n: usize) -> (f64, f64) {
    if n < 30 {
        tracing::debug!(n, "confidence interval uses the sample sd with n < 30");
    }
    let se = sd / (n as f64).sqrt();
    let diff = CI95_Z * se;
    (mean - diff, mean + diff)
}

/// Descriptive statistics reported for each sample of a test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleDescriptives {
    /// Sample label
    pub label: String,
    /// Number of values
    pub n: usize,
    pub mean: f64,
    /// Standard deviation (N-1)
    pub sd: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// Lower and upper bounds of the 95% confidence interval
    pub ci95: (f64, f64),
}

impl SampleDescriptives {
    /// Describe a labelled sample. Needs at least two values for the sd.
    pub fn from_data(label: impl Into<String>, values: &[f64]) -> StatsResult<Self> {
        let label = label.into();
        if values.len() < 2 {
            return Err(StatsError::TooFewSamples {
                label,
                needed: 2,
                got: values.len(),
            });
        }
        let mean = mean(values)?;
        let sd = stdev(values)?;
        let summary = QuartileSummary::from_data(values)?;
        Ok(Self {
            label,
            n: values.len(),
            mean,
            sd,
            min: summary.min,
            max: summary.max,
            median: summary.median,
            ci95: confidence_interval_95(mean, sd, values.len()),
        })
    }
}
