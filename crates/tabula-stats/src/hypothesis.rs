//! Student's t-tests for independent and paired samples

use serde::{Deserialize, Serialize};

use crate::descriptive::{mean, variance, SampleDescriptives};
use crate::error::{StatsError, StatsResult};
use crate::special::t_two_tailed_p;

/// Labelled sample of numeric values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub label: String,
    pub values: Vec<f64>,
}

impl Sample {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, needed: usize) -> StatsResult<()> {
        if self.values.len() < needed {
            return Err(StatsError::TooFewSamples {
                label: self.label.clone(),
                needed,
                got: self.values.len(),
            });
        }
        Ok(())
    }
}

/// Outcome of a t-test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// The t statistic
    pub statistic: f64,
    /// Degrees of freedom
    pub df: usize,
    /// Two-tailed probability
    pub p_value: f64,
    /// False when the p-value came from an unconverged continued fraction
    pub p_value_converged: bool,
    /// Descriptives for sample A then sample B
    pub descriptives: Vec<SampleDescriptives>,
    /// Paired differences (b - a), only for paired tests
    pub differences: Option<Vec<f64>>,
}

/// Two-sample t-test using the pooled variance
pub fn t_test_independent(sample_a: &Sample, sample_b: &Sample) -> StatsResult<TestResult> {
    sample_a.require(2)?;
    sample_b.require(2)?;

    let n_a = sample_a.len() as f64;
    let n_b = sample_b.len() as f64;
    let mean_a = mean(&sample_a.values)?;
    let mean_b = mean(&sample_b.values)?;
    let var_a = variance(&sample_a.values)?;
    let var_b = variance(&sample_b.values)?;

    let df = sample_a.len() + sample_b.len() - 2;
    let pooled = ((n_a - 1.0) * var_a + (n_b - 1.0) * var_b) / df as f64;
    let se = (pooled * (1.0 / n_a + 1.0 / n_b)).sqrt();
    if !(se > 0.0) {
        return Err(StatsError::InadequateVariability);
    }
    let t = (mean_a - mean_b) / se;
    let p = t_two_tailed_p(t, df as f64)?;

    Ok(TestResult {
        statistic: t,
        df,
        p_value: p.value,
        p_value_converged: p.converged,
        descriptives: vec![
            SampleDescriptives::from_data(sample_a.label.clone(), &sample_a.values)?,
            SampleDescriptives::from_data(sample_b.label.clone(), &sample_b.values)?,
        ],
        differences: None,
    })
}

/// t-test on two related samples
///
/// The standard error comes from both variances less twice their
/// covariance, so the samples must be paired element for element.
pub fn t_test_paired(sample_a: &Sample, sample_b: &Sample) -> StatsResult<TestResult> {
    if sample_a.len() != sample_b.len() {
        return Err(StatsError::UnequalLength {
            left: sample_a.len(),
            right: sample_b.len(),
        });
    }
    sample_a.require(2)?;
    sample_b.require(2)?;

    let n = sample_a.len();
    let mean_a = mean(&sample_a.values)?;
    let mean_b = mean(&sample_b.values)?;
    let var_a = variance(&sample_a.values)?;
    let var_b = variance(&sample_b.values)?;

    let df = n - 1;
    let mut cov = 0.0;
    let mut differences = Vec::with_capacity(n);
    for (a, b) in sample_a.values.iter().zip(&sample_b.values) {
        differences.push(b - a);
        cov += (a - mean_a) * (b - mean_b);
    }
    cov /= df as f64;

    let sd = ((var_a + var_b - 2.0 * cov) / n as f64).sqrt();
    if !(sd > 0.0) {
        return Err(StatsError::InadequateVariability);
    }
    let t = (mean_a - mean_b) / sd;
    let p = t_two_tailed_p(t, df as f64)?;

    Ok(TestResult {
        statistic: t,
        df,
        p_value: p.value,
        p_value_converged: p.converged,
        descriptives: vec![
            SampleDescriptives::from_data(sample_a.label.clone(), &sample_a.values)?,
            SampleDescriptives::from_data(sample_b.label.clone(), &sample_b.values)?,
        ],
        differences: Some(differences),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(label: &str, values: &[f64]) -> Sample {
        Sample::new(label, values.to_vec())
    }

    #[test]
    fn test_independent_reference() {
        let a = sample("A", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = sample("B", &[2.0, 4.0, 6.0, 8.0, 10.0]);
        let result = t_test_independent(&a, &b).unwrap();
        assert!((result.statistic - -1.8973665961010275).abs() < 1e-9);
        assert!((result.p_value - 0.09434977241038596).abs() < 1e-6);
        assert_eq!(result.df, 8);
        assert!(result.p_value_converged);
        assert!(result.differences.is_none());
    }

    #[test]
    fn test_independent_too_few() {
        let a = sample("A", &[1.0]);
        let b = sample("B", &[2.0, 4.0]);
        let err = t_test_independent(&a, &b).unwrap_err();
        assert_eq!(
            err,
            StatsError::TooFewSamples {
                label: "A".to_string(),
                needed: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_independent_no_variability() {
        let a = sample("A", &[3.0, 3.0, 3.0]);
        let b = sample("B", &[3.0, 3.0]);
        assert_eq!(
            t_test_independent(&a, &b),
            Err(StatsError::InadequateVariability)
        );
    }

    #[test]
    fn test_identical_means_give_p_of_one() {
        let a = sample("A", &[1.0, 2.0, 3.0]);
        let b = sample("B", &[3.0, 2.0, 1.0]);
        let result = t_test_independent(&a, &b).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_paired_reference() {
        let a = sample("Before", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = sample("After", &[2.0, 4.0, 6.0, 8.0, 11.0]);
        let result = t_test_paired(&a, &b).unwrap();
        assert!((result.statistic - -3.7199244398022175).abs() < 1e-9);
        assert!((result.p_value - 0.02047587441826501).abs() < 1e-6);
        assert_eq!(result.df, 4);
        assert_eq!(result.differences, Some(vec![1.0, 2.0, 3.0, 4.0, 6.0]));
    }

    #[test]
    fn test_paired_unequal_length() {
        let a = sample("A", &[1.0, 2.0, 3.0]);
        let b = sample("B", &[1.0, 2.0]);
        assert_eq!(
            t_test_paired(&a, &b),
            Err(StatsError::UnequalLength { left: 3, right: 2 })
        );
    }

    #[test]
    fn test_paired_constant_shift() {
        // Every difference identical so the spread of differences is zero
        let a = sample("A", &[1.0, 2.0, 3.0, 4.0]);
        let b = sample("B", &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!(t_test_paired(&a, &b), Err(StatsError::InadequateVariability));
    }
}
