//! Least-squares regression and correlation

use serde::{Deserialize, Serialize};

use crate::descriptive::{mean, min_max, sample_stdev, sum_of_squares};
use crate::error::{StatsError, StatsResult};
use crate::special::t_two_tailed_p;

/// Keeps the t transform finite when |r| reaches 1
const TINY: f64 = 1.0e-20;

/// Fitted regression line with correlation details
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient
    pub r: f64,
    /// Two-tailed p-value for r
    pub p_value: f64,
    /// False when the p-value is an unconverged estimate
    pub p_value_converged: bool,
    /// Standard error of the estimate
    pub std_err: f64,
}

impl Regression {
    /// Predicted y for a given x
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Regression line endpoints spanning the observed x range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionLine {
    pub regression: Regression,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

fn sum_of_products(xs: &[f64], ys: &[f64]) -> f64 {
    xs.iter().zip(ys).map(|(x, y)| x * y).sum()
}

fn square_of_sums(values: &[f64]) -> f64 {
    let sum: f64 = values.iter().sum();
    sum * sum
}

fn check_paired(xs: &[f64], ys: &[f64]) -> StatsResult<()> {
    if xs.len() != ys.len() {
        return Err(StatsError::UnequalLength {
            left: xs.len(),
            right: ys.len(),
        });
    }
    Ok(())
}

/// Whether every value is the same
///
/// n·Σx² − (Σx)² is not reliably zero for repeated values like 0.1.
fn is_constant(values: &[f64]) -> bool {
    min_max(values).is_some_and(|(lo, hi)| lo == hi)
}

/// Least-squares linear regression of ys on xs
///
/// Fails with [`StatsError::SingularRegression`] when every x is identical.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> StatsResult<Regression> {
    check_paired(xs, ys)?;
    let n = xs.len();
    if n < 3 {
        return Err(StatsError::DegenerateSample { needed: 3, got: n });
    }
    let nf = n as f64;
    let x_mean = mean(xs)?;
    let y_mean = mean(ys)?;

    let x_den = nf * sum_of_squares(xs) - square_of_sums(xs);
    if is_constant(xs) || x_den <= 0.0 {
        return Err(StatsError::SingularRegression);
    }
    let y_den = nf * sum_of_squares(ys) - square_of_sums(ys);
    let r_num = nf * sum_of_products(xs, ys) - xs.iter().sum::<f64>() * ys.iter().sum::<f64>();
    let slope = r_num / x_den;
    let intercept = y_mean - slope * x_mean;

    // A constant y gives a flat line with no defined correlation
    let (r, p_value, p_value_converged) = if is_constant(ys) || y_den <= 0.0 {
        (0.0, 1.0, true)
    } else {
        let r = (r_num / (x_den * y_den).sqrt()).clamp(-1.0, 1.0);
        let df = nf - 2.0;
        let t = r * (df / ((1.0 - r + TINY) * (1.0 + r + TINY))).sqrt();
        let p = t_two_tailed_p(t, df)?;
        (r, p.value, p.converged)
    };
    let std_err = (1.0 - r * r).max(0.0).sqrt() * sample_stdev(ys)?;

    Ok(Regression {
        slope,
        intercept,
        r,
        p_value,
        p_value_converged,
        std_err,
    })
}

/// Regression plus the line's endpoints at the minimum and maximum x
pub fn regression_line(xs: &[f64], ys: &[f64]) -> StatsResult<RegressionLine> {
    let regression = linear_regression(xs, ys)?;
    let (x0, x1) = min_max(xs).ok_or(StatsError::EmptySample)?;
    Ok(RegressionLine {
        regression,
        x0,
        y0: regression.predict(x0),
        x1,
        y1: regression.predict(x1),
    })
}

/// Pearson's correlation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub r: f64,
    pub p_value: f64,
    pub p_value_converged: bool,
    /// Degrees of freedom (n - 2)
    pub df: usize,
}

/// Pearson's r with its two-tailed p-value
pub fn pearson_r(xs: &[f64], ys: &[f64]) -> StatsResult<Correlation> {
    check_paired(xs, ys)?;
    let n = xs.len();
    if n < 3 {
        return Err(StatsError::DegenerateSample { needed: 3, got: n });
    }
    if is_constant(xs) || is_constant(ys) {
        return Err(StatsError::InadequateVariability);
    }
    let nf = n as f64;
    let r_num = nf * sum_of_products(xs, ys) - xs.iter().sum::<f64>() * ys.iter().sum::<f64>();
    let r_den = ((nf * sum_of_squares(xs) - square_of_sums(xs))
        * (nf * sum_of_squares(ys) - square_of_sums(ys)))
        .sqrt();
    if r_den.is_nan() || r_den <= 0.0 {
        return Err(StatsError::InadequateVariability);
    }
    let r = (r_num / r_den).clamp(-1.0, 1.0);
    let df = n - 2;
    let t = r * (df as f64 / ((1.0 - r + TINY) * (1.0 + r + TINY))).sqrt();
    let p = t_two_tailed_p(t, df as f64)?;
    Ok(Correlation {
        r,
        p_value: p.value,
        p_value_converged: p.converged,
        df,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_regression_basic() {
        let xs = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = vec![2.0, 4.0, 5.0, 4.0, 5.0];
        let reg = linear_regression(&xs, &ys).unwrap();
        assert!((reg.slope - 0.6).abs() < 1e-10);
        assert!((reg.intercept - 2.2).abs() < 1e-10);
        assert!((reg.r - 0.7745966692).abs() < 1e-9);
        assert!(reg.p_value > 0.0 && reg.p_value < 1.0);
    }

    #[test]
    fn test_linear_regression_perfect_fit() {
        let xs = vec![1.0, 2.0, 3.0, 4.0];
        let ys = vec![3.0, 5.0, 7.0, 9.0];
        let reg = linear_regression(&xs, &ys).unwrap();
        assert!((reg.slope - 2.0).abs() < 1e-10);
        assert!((reg.intercept - 1.0).abs() < 1e-10);
        assert!((reg.r - 1.0).abs() < 1e-10);
        assert!(reg.p_value < 1e-6);
    }

    #[test]
    fn test_linear_regression_singular() {
        let xs = vec![2.0, 2.0, 2.0];
        let ys = vec![1.0, 2.0, 3.0];
        assert_eq!(
            linear_regression(&xs, &ys),
            Err(StatsError::SingularRegression)
        );
    }

    #[test]
    fn test_linear_regression_singular_inexact_x() {
        let singular = Err(StatsError::SingularRegression);
        let ys: Vec<f64> = (0..7).map(f64::from).collect();
        assert_eq!(linear_regression(&[0.1; 7], &ys), singular);
        let ys: Vec<f64> = (0..10).map(f64::from).collect();
        assert_eq!(linear_regression(&[0.1; 10], &ys), singular);
        for x in [0.7, 2.3, 0.01] {
            assert_eq!(linear_regression(&[x; 5], &[1.0, 2.0, 3.0, 4.0, 5.0]), singular);
        }
    }

    #[test]
    fn test_linear_regression_constant_inexact_y() {
        let reg = linear_regression(&[1.0, 2.0, 3.0, 4.0, 5.0], &[0.7; 5]).unwrap();
        assert_eq!(reg.r, 0.0);
        assert_eq!(reg.p_value, 1.0);
        assert!(reg.slope.abs() < 1e-12);
    }

    #[test]
    fn test_linear_regression_unequal() {
        let err = linear_regression(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, StatsError::UnequalLength { left: 3, right: 2 });
    }

    #[test]
    fn test_regression_line_endpoints() {
        let xs = vec![5.0, 1.0, 3.0];
        let ys = vec![10.0, 2.0, 6.0];
        let line = regression_line(&xs, &ys).unwrap();
        assert_eq!(line.x0, 1.0);
        assert_eq!(line.x1, 5.0);
        assert!((line.y0 - 2.0).abs() < 1e-10);
        assert!((line.y1 - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_pearson_r() {
        let xs = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = vec![2.0, 4.0, 5.0, 4.0, 5.0];
        let corr = pearson_r(&xs, &ys).unwrap();
        assert!((corr.r - 0.7745966692).abs() < 1e-9);
        assert_eq!(corr.df, 3);
    }

    #[test]
    fn test_pearson_r_constant_variable() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![4.0, 4.0, 4.0];
        assert_eq!(pearson_r(&xs, &ys), Err(StatsError::InadequateVariability));
    }

    #[test]
    fn test_pearson_r_constant_inexact_values() {
        let ys = [1.0, 2.0, 3.0, 4.0, 5.0];
        let flat = Err(StatsError::InadequateVariability);
        assert_eq!(pearson_r(&[0.7; 5], &ys), flat);
        assert_eq!(pearson_r(&ys, &[0.1; 5]), flat);
    }
}
