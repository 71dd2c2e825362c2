//! Histogram binning
//!
//! Bins are chosen once from the combined values of every chart in the set,
//! repaired for saw-toothing, and then reused unchanged for each chart so
//! the histograms can be compared side by side.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tabula_stats::{min_max, normal_curve, StatsError};

use crate::boxplot::label_for;
use crate::config::{ChartConfig, SawtoothCheck, SawtoothConfig};
use crate::error::{ChartError, ChartResult};
use crate::labels::{format_number, histogram_decimal_places, round_to};
use crate::limits::{GroupDimension, LimitExceeded, Limited};
use crate::types::{GroupValue, ValueLabels, VariableRoles};

/// Bin count and outer limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinSpec {
    pub n_bins: usize,
    pub lower: f64,
    pub upper: f64,
}

impl BinSpec {
    pub fn width(&self) -> f64 {
        (self.upper - self.lower) / self.n_bins as f64
    }
}

/// Choose human-friendly bins for values between `min` and `max`
///
/// Widths are 2, 5 or 10 times a power of ten. The lower limit is snapped to
/// a whole multiple of the width unless the bins already fit the range
/// exactly, and a bin is added when the maximum would not be covered.
pub fn nice_bins(
    min: f64,
    max: f64,
    n_distinct: usize,
    target_bins: usize,
) -> ChartResult<BinSpec> {
    let (min, max) = if min > max { (max, min) } else { (min, max) };
    if !min.is_finite() || !max.is_finite() {
        return Err(StatsError::InvalidDomain {
            parameter: "range",
            value: max - min,
        }
        .into());
    }
    let range = if max - min == 0.0 { 1.0 } else { max - min };

    let min_n_bins = match n_distinct {
        n if n >= 10 => 10,
        n if n <= 4 => 4,
        n => n,
    };

    let init_width = range / target_bins.max(1) as f64;
    if init_width == 0.0 {
        return Err(StatsError::InvalidDomain {
            parameter: "range",
            value: range,
        }
        .into());
    }
    let mut norm_width = init_width;
    while norm_width <= 1.0 {
        norm_width *= 10.0;
    }
    while norm_width > 10.0 {
        norm_width /= 10.0;
    }
    let denorm_ratio = init_width / norm_width;

    let better_norm = if norm_width <= 5.0 { 5.0 } else { 10.0 };
    let mut width = better_norm * denorm_ratio;
    let mut n_bins = (range / width).ceil() as usize;

    if n_bins < min_n_bins {
        norm_width /= 2.0;
        let better_norm = if norm_width <= 2.0 {
            2.0
        } else if norm_width <= 5.0 {
            5.0
        } else {
            10.0
        };
        width = better_norm * denorm_ratio;
        n_bins = (range / width).ceil() as usize;
    }

    let mut lower = min;
    let mut upper = max;
    if width * n_bins as f64 != range {
        lower = (lower / width).floor() * width;
        // rounding can snap just above the minimum
        if lower > min {
            lower -= width;
            n_bins += 1;
        }
        upper = lower + n_bins as f64 * width;
    }
    if max > upper {
        upper += width;
        n_bins += 1;
    }

    Ok(BinSpec { n_bins, lower, upper })
}

/// Bin counts over equal-width bins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub counts: Vec<u64>,
    /// Lower limit of the first bin
    pub start: f64,
    pub width: f64,
    /// Values that fell outside every bin
    pub extra_points: usize,
}

impl Histogram {
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Count `values` into `n_bins` bins
///
/// With `limits` the bins span exactly `(lower, upper)`. Without them the
/// bins are centred so the smallest and largest values are both covered. A
/// value up to and including the upper limit counts in the last bin.
pub fn histogram(
    values: &[f64],
    n_bins: usize,
    limits: Option<(f64, f64)>,
) -> ChartResult<Histogram> {
    let n_bins = n_bins.max(1);
    let (lower, upper, width) = match limits {
        Some((lower, upper)) => (lower, upper, (upper - lower) / n_bins as f64),
        None => {
            let (lo, hi) = min_max(values).ok_or(StatsError::EmptySample)?;
            let est_width = (hi - lo) / n_bins as f64 + 1e-6;
            let width = (hi - lo + est_width) / n_bins as f64;
            let start = lo - width / 2.0;
            (start, start + width * n_bins as f64, width)
        }
    };

    let mut counts = vec![0u64; n_bins];
    let mut extra_points = 0;
    for &value in values {
        if !value.is_finite() || value - lower < 0.0 {
            extra_points += 1;
        } else {
            let mut idx = ((value - lower) / width) as usize;
            // limits rebuilt from start and width can fall an ulp short
            if idx >= n_bins && value <= upper + width * 1e-9 {
                idx = n_bins - 1;
            }
            match counts.get_mut(idx) {
                Some(count) => *count += 1,
                None => extra_points += 1,
            }
        }
    }

    Ok(Histogram {
        counts,
        start: lower,
        width,
        extra_points,
    })
}

/// Whether only every `period`-th bin (from `offset`) has any values
///
/// The last bin is left out: it also holds the maximum, which lands off
/// period whenever the data sit on a grid matching the bin width.
pub fn is_saw_toothed(counts: &[u64], check: SawtoothCheck) -> bool {
    if check.period == 0 || counts.len() <= check.period {
        return false;
    }
    let body = &counts[..counts.len() - 1];
    let total: u64 = body.iter().sum();
    let on_period: u64 = body.iter().skip(check.offset).step_by(check.period).sum();
    total > 0 && total == on_period
}

/// Shrink the bin count until no saw-tooth pattern remains
///
/// Each pass tries the configured checks in order and divides the bin count
/// by the period of the first match. Stops at `min_bins`.
pub fn fix_sawtoothing(
    values: &[f64],
    hist: Histogram,
    config: &SawtoothConfig,
) -> ChartResult<Histogram> {
    let mut hist = hist;
    while hist.n_bins() > config.min_bins {
        let Some(check) = config
            .checks
            .iter()
            .find(|check| is_saw_toothed(&hist.counts, **check))
        else {
            break;
        };
        let old_bins = hist.n_bins();
        let new_bins = (old_bins + check.period - 1) / check.period;
        if new_bins >= old_bins {
            break;
        }
        debug!(
            old_bins,
            new_bins,
            period = check.period,
            offset = check.offset,
            "Repairing saw-toothed histogram"
        );
        hist = histogram(values, new_bins, None)?;
    }
    Ok(hist)
}

/// Bins shared by every chart in a histogram set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramSpec {
    pub bin_start: f64,
    pub bin_width: f64,
    pub bin_count: usize,
    /// Decimal places for bin labels
    pub decimal_places: usize,
}

impl HistogramSpec {
    fn from_histogram(hist: &Histogram, max_dp: usize) -> Self {
        Self {
            bin_start: hist.start,
            bin_width: hist.width,
            bin_count: hist.n_bins(),
            decimal_places: histogram_decimal_places(hist.start, hist.width, max_dp),
        }
    }

    fn limits(&self) -> (f64, f64) {
        (
            self.bin_start,
            self.bin_start + self.bin_width * self.bin_count as f64,
        )
    }

    /// Rounded bin starts, bin labels and the final bin end
    ///
    /// Each bin starts where the previous rounded bin ended, so labels join
    /// up without gaps.
    pub fn bin_labels(&self) -> (Vec<f64>, Vec<String>, f64) {
        let dp = self.decimal_places;
        let mut starts = Vec::with_capacity(self.bin_count);
        let mut labels = Vec::with_capacity(self.bin_count);
        let mut start = self.bin_start;
        let mut end = round_to(start, dp);
        for i in 0..self.bin_count {
            let bin_start = round_to(start, dp);
            end = round_to(start + self.bin_width, dp);
            start = end;
            starts.push(bin_start);
            let op = if i + 1 == self.bin_count { "<=" } else { "<" };
            labels.push(format!(
                "{} to {} {}",
                format_number(bin_start, dp),
                op,
                format_number(end, dp)
            ));
        }
        (starts, labels, end)
    }
}

/// Values for one chart of a histogram set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartValues {
    pub chart_val: GroupValue,
    pub values: Vec<f64>,
}

impl ChartValues {
    pub fn new(chart_val: impl Into<GroupValue>, values: Vec<f64>) -> Self {
        Self {
            chart_val: chart_val.into(),
            values,
        }
    }

    /// A lone chart with no chart variable
    pub fn single(values: Vec<f64>) -> Self {
        Self::new(GroupValue::PLACEHOLDER, values)
    }
}

/// One histogram, ready to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramChart {
    pub chart_val: GroupValue,
    /// "{chart variable}: {value label}" when there are several charts
    pub chart_label: Option<String>,
    /// Values counted
    pub chart_n: u64,
    pub bin_labels: Vec<String>,
    pub y_vals: Vec<u64>,
    /// Empty unless a normal curve was requested
    pub normal_y_vals: Vec<f64>,
    pub min_val: f64,
    pub max_val: f64,
    pub extra_points: usize,
}

/// A set of histograms sharing bins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramOutputBundle {
    pub overall_title: String,
    pub spec: HistogramSpec,
    pub charts: Vec<HistogramChart>,
}

/// Builds histogram sets
#[derive(Debug, Clone, Default)]
pub struct HistogramBinner {
    config: ChartConfig,
}

impl HistogramBinner {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Shared bins for the combined values
    pub fn shared_spec(&self, combined: &[f64]) -> ChartResult<(HistogramSpec, Histogram)> {
        let cfg = &self.config.histogram;
        let (lo, hi) = min_max(combined).ok_or(StatsError::EmptySample)?;
        let mut distinct: Vec<f64> = combined.to_vec();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup();

        let bins = nice_bins(lo, hi, distinct.len(), cfg.target_bins)?;
        let hist = histogram(combined, bins.n_bins, Some((bins.lower, bins.upper)))?;
        let hist = fix_sawtoothing(combined, hist, &cfg.sawtooth)?;
        Ok((HistogramSpec::from_histogram(&hist, cfg.max_decimal_places), hist))
    }

    /// Bin every chart with bins chosen from all of them together
    ///
    /// Non-finite values are skipped. Every chart needs at least
    /// `histogram.min_values` values.
    pub fn build(
        &self,
        charts: &[ChartValues],
        roles: &VariableRoles,
        labels: &ValueLabels,
        include_normal: bool,
    ) -> ChartResult<Limited<HistogramOutputBundle>> {
        let min_values = self.config.histogram.min_values;
        let multichart = roles.chart_name.is_some() && charts.len() > 1;

        let charts: Vec<(&GroupValue, Vec<f64>)> = charts
            .iter()
            .map(|c| {
                let finite = c.values.iter().copied().filter(|v| v.is_finite()).collect();
                (&c.chart_val, finite)
            })
            .collect();
        for (chart_val, values) in &charts {
            if values.len() < min_values {
                return Err(ChartError::InsufficientData {
                    chart: chart_val.to_string(),
                    needed: min_values,
                    got: values.len(),
                });
            }
        }

        let exceeded: Vec<LimitExceeded> = LimitExceeded::check(
            GroupDimension::Charts,
            charts.len(),
            self.config.limits.max_charts,
        )
        .into_iter()
        .collect();

        let combined: Vec<f64> = charts.iter().flat_map(|(_, v)| v.iter().copied()).collect();
        let (spec, combined_hist) = self.shared_spec(&combined)?;
        let (bin_starts, bin_labels, max_val) = spec.bin_labels();

        let mut out = Vec::with_capacity(charts.len());
        for (chart_val, values) in &charts {
            let hist = if charts.len() == 1 {
                combined_hist.clone()
            } else {
                histogram(values, spec.bin_count, Some(spec.limits()))?
            };
            let chart_n = hist.total();
            let normal_y_vals = if include_normal {
                normal_curve(values, &bin_starts, chart_n as f64)?
            } else {
                Vec::new()
            };
            let chart_label = match (&roles.chart_name, multichart) {
                (Some(name), true) => {
                    Some(format!("{}: {}", name, label_for(&labels.charts, chart_val)))
                }
                _ => None,
            };
            out.push(HistogramChart {
                chart_val: (*chart_val).clone(),
                chart_label,
                chart_n,
                bin_labels: bin_labels.clone(),
                y_vals: hist.counts,
                normal_y_vals,
                min_val: spec.bin_start,
                max_val,
                extra_points: hist.extra_points,
            });
        }

        Ok(Limited::new(
            HistogramOutputBundle {
                overall_title: histogram_title(roles),
                spec,
                charts: out,
            },
            exceeded,
        ))
    }
}

fn histogram_title(roles: &VariableRoles) -> String {
    let mut bits = Vec::new();
    if let Some(measure) = &roles.measure_name {
        bits.push(measure.clone());
    }
    if let Some(chart) = &roles.chart_name {
        bits.push(format!("By {}", chart));
    }
    bits.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_bins_whole_numbers() {
        let bins = nice_bins(1.0, 100.0, 100, 20).unwrap();
        assert_eq!(bins.n_bins, 20);
        assert_eq!(bins.lower, 0.0);
        assert_eq!(bins.upper, 100.0);
        assert_eq!(bins.width(), 5.0);
    }

    #[test]
    fn test_nice_bins_swaps_reversed_limits() {
        assert_eq!(
            nice_bins(100.0, 1.0, 100, 20).unwrap(),
            nice_bins(1.0, 100.0, 100, 20).unwrap()
        );
    }

    #[test]
    fn test_nice_bins_adds_bin_for_max() {
        let bins = nice_bins(0.2, 1.2, 3, 20).unwrap();
        assert!(bins.upper >= 1.2);
        assert!(bins.lower <= 0.2);
    }

    #[test]
    fn test_nice_bins_lower_never_above_min() {
        for i in 0..400 {
            let min = 7.0 + i as f64 * 0.05;
            for span in [0.35, 1.2, 4.05] {
                let max = min + span;
                let bins = nice_bins(min, max, 8, 20).unwrap();
                assert!(bins.lower <= min, "lower {} above min {}", bins.lower, min);
                assert!(bins.upper >= max, "upper {} below max {}", bins.upper, max);
            }
        }
    }

    #[test]
    fn test_nice_bins_rejects_infinite_range() {
        assert!(nice_bins(0.0, f64::INFINITY, 2, 20).is_err());
    }

    #[test]
    fn test_histogram_with_limits() {
        let values = vec![0.0, 1.0, 2.5, 9.9, 10.0];
        let hist = histogram(&values, 5, Some((0.0, 10.0))).unwrap();
        assert_eq!(hist.counts, vec![2, 1, 0, 0, 2]);
        assert_eq!(hist.start, 0.0);
        assert_eq!(hist.width, 2.0);
        assert_eq!(hist.extra_points, 0);
    }

    #[test]
    fn test_histogram_counts_outside_values() {
        let values = vec![-1.0, 5.0, 12.0, f64::NAN];
        let hist = histogram(&values, 5, Some((0.0, 10.0))).unwrap();
        assert_eq!(hist.total(), 1);
        assert_eq!(hist.extra_points, 3);
    }

    #[test]
    fn test_histogram_without_limits_covers_all() {
        let values = vec![3.0, 4.0, 5.0, 6.0, 7.0];
        let hist = histogram(&values, 4, None).unwrap();
        assert_eq!(hist.total(), 5);
        assert_eq!(hist.extra_points, 0);
        assert!(hist.start < 3.0);
    }

    #[test]
    fn test_histogram_value_just_below_upper() {
        let upper = 0.3;
        let values = vec![0.0, 0.1, upper - f64::EPSILON / 4.0, upper];
        let hist = histogram(&values, 3, Some((0.0, upper))).unwrap();
        assert_eq!(hist.extra_points, 0);
        assert_eq!(hist.total(), 4);
    }

    #[test]
    fn test_histogram_empty_without_limits() {
        assert!(histogram(&[], 4, None).is_err());
    }

    #[test]
    fn test_saw_tooth_detection() {
        let every_other = vec![4, 0, 3, 0, 5, 0];
        assert!(is_saw_toothed(&every_other, SawtoothCheck { period: 2, offset: 0 }));
        assert!(!is_saw_toothed(&every_other, SawtoothCheck { period: 2, offset: 1 }));
        assert!(!is_saw_toothed(&[1, 1, 1, 1], SawtoothCheck { period: 2, offset: 0 }));
        assert!(!is_saw_toothed(&[1, 1], SawtoothCheck { period: 0, offset: 0 }));
    }

    #[test]
    fn test_saw_tooth_ignores_top_bin() {
        // the maximum of integer data fills the last half-unit bin
        let values: Vec<f64> = (0..10).flat_map(|i| vec![i as f64; 3]).collect();
        let hist = histogram(&values, 18, Some((0.0, 9.0))).unwrap();
        assert_eq!(hist.counts[16..], [3, 3]);
        assert!(is_saw_toothed(&hist.counts, SawtoothCheck { period: 2, offset: 0 }));

        let fixed = fix_sawtoothing(&values, hist, &SawtoothConfig::default()).unwrap();
        assert_eq!(fixed.n_bins(), 9);
        assert_eq!(fixed.total() as usize, values.len());
    }

    #[test]
    fn test_saw_tooth_needs_values_below_top_bin() {
        assert!(!is_saw_toothed(&[0, 0, 0, 5], SawtoothCheck { period: 2, offset: 0 }));
    }

    #[test]
    fn test_fix_sawtoothing_reduces_bins() {
        // integers binned at half-unit widths only fill every other bin
        let values: Vec<f64> = (0..10).flat_map(|i| vec![i as f64; 3]).collect();
        let hist = histogram(&values, 20, Some((0.0, 10.0))).unwrap();
        assert!(is_saw_toothed(&hist.counts, SawtoothCheck { period: 2, offset: 0 }));

        let fixed = fix_sawtoothing(&values, hist, &SawtoothConfig::default()).unwrap();
        assert!(fixed.n_bins() < 20);
        assert_eq!(fixed.total() as usize + fixed.extra_points, values.len());
    }

    #[test]
    fn test_fix_sawtoothing_leaves_smooth_data() {
        let values: Vec<f64> = (0..40).map(|i| i as f64 / 4.0).collect();
        let hist = histogram(&values, 10, Some((0.0, 10.0))).unwrap();
        let fixed = fix_sawtoothing(&values, hist.clone(), &SawtoothConfig::default()).unwrap();
        assert_eq!(fixed, hist);
    }

    #[test]
    fn test_bin_labels_chain() {
        let spec = HistogramSpec {
            bin_start: 0.0,
            bin_width: 0.5,
            bin_count: 3,
            decimal_places: 1,
        };
        let (starts, labels, end) = spec.bin_labels();
        assert_eq!(starts, vec![0.0, 0.5, 1.0]);
        assert_eq!(
            labels,
            vec!["0.0 to < 0.5", "0.5 to < 1.0", "1.0 to <= 1.5"]
        );
        assert_eq!(end, 1.5);
    }

    #[test]
    fn test_title() {
        let roles = VariableRoles::default().with_measure("Age").with_chart("Country");
        assert_eq!(histogram_title(&roles), "Age By Country");
        assert_eq!(histogram_title(&VariableRoles::default().with_measure("Age")), "Age");
    }

    #[test]
    fn test_build_single_chart() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        let roles = VariableRoles::default().with_measure("Score");
        let out = HistogramBinner::default()
            .build(&[ChartValues::single(values)], &roles, &ValueLabels::default(), false)
            .unwrap()
            .proceed();
        let chart = &out.charts[0];
        assert_eq!(chart.chart_n, 100);
        assert_eq!(chart.chart_label, None);
        assert_eq!(chart.y_vals.len(), out.spec.bin_count);
        assert_eq!(chart.bin_labels.len(), out.spec.bin_count);
        assert!(chart.normal_y_vals.is_empty());
        assert_eq!(out.overall_title, "Score");
    }

    #[test]
    fn test_build_too_few_values() {
        let err = HistogramBinner::default()
            .build(
                &[ChartValues::single(vec![1.0, 2.0])],
                &VariableRoles::default(),
                &ValueLabels::default(),
                false,
            )
            .unwrap_err();
        assert!(matches!(err, ChartError::InsufficientData { needed: 5, got: 2, .. }));
    }
}
