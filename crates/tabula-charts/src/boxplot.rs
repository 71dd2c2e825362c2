//! Boxplot summaries
//!
//! Every (series, category) combination gets a [`BoxplotSummary`], even when
//! it has no values, so renderers can leave a gap in the right place. Axis
//! extremes are gathered across all boxes in a [`BoxplotBuildContext`] that
//! is threaded through each call and handed back, keeping the state scoped
//! to a single request.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use tabula_stats::{sorted_copy, QuartileSummary, StatsResult};

use crate::axis::AxisRange;
use crate::config::ChartConfig;
use crate::error::{ChartError, ChartResult};
use crate::labels::{best_decimal_places, format_number, split_label_lines, LabelLines};
use crate::limits::{GroupDimension, LimitExceeded, Limited};
use crate::sorting::SortMode;
use crate::types::{GroupValue, MeasureRow, ValueLabels, VariableRoles};

/// How whiskers are placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WhiskerPolicy {
    /// Whiskers at the sample minimum and maximum
    #[serde(rename = "min_max")]
    MinMax,
    /// Most extreme values within 1.5 IQR of the box; the rest are outliers
    #[default]
    #[serde(rename = "iqr_1_5")]
    Iqr1_5,
    /// As `Iqr1_5` but values beyond the whiskers are not displayed
    #[serde(rename = "hide_outliers")]
    HideOutliers,
}

/// Statistics of a box with data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub lwhisker: f64,
    /// Lower quartile
    pub lbox: f64,
    pub median: f64,
    /// Upper quartile
    pub ubox: f64,
    pub uwhisker: f64,
    /// Values beyond the whiskers (only under [`WhiskerPolicy::Iqr1_5`])
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Summarize a non-empty sample
    pub fn from_values(
        values: &[f64],
        policy: WhiskerPolicy,
        iqr_multiplier: f64,
    ) -> StatsResult<Self> {
        let summary = QuartileSummary::from_data(values)?;
        let (lbox, ubox) = (summary.q1, summary.q3);

        let (lwhisker, uwhisker) = match policy {
            WhiskerPolicy::MinMax => (summary.min, summary.max),
            WhiskerPolicy::Iqr1_5 | WhiskerPolicy::HideOutliers => {
                let sorted = sorted_copy(values);
                let iqr = summary.iqr();
                let raw_lower = lbox - iqr_multiplier * iqr;
                let raw_upper = ubox + iqr_multiplier * iqr;
                (
                    lower_whisker(raw_lower, lbox, &sorted),
                    upper_whisker(raw_upper, ubox, &sorted),
                )
            }
        };

        let outliers = match policy {
            WhiskerPolicy::Iqr1_5 => values
                .iter()
                .copied()
                .filter(|&v| v < lwhisker || v > uwhisker)
                .collect(),
            WhiskerPolicy::MinMax | WhiskerPolicy::HideOutliers => Vec::new(),
        };

        Ok(Self {
            lwhisker,
            lbox,
            median: summary.median,
            ubox,
            uwhisker,
            outliers,
        })
    }
}

/// Lowest observed value at or above the raw bound, never above the box
fn lower_whisker(raw: f64, lbox: f64, sorted: &[f64]) -> f64 {
    let whisker = sorted.iter().copied().find(|&v| v >= raw).unwrap_or(raw);
    whisker.min(lbox)
}

/// Highest observed value at or below the raw bound, never below the box
fn upper_whisker(raw: f64, ubox: f64, sorted: &[f64]) -> f64 {
    let whisker = sorted.iter().rev().copied().find(|&v| v <= raw).unwrap_or(raw);
    whisker.max(ubox)
}

/// One box, displayed or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxplotSummary {
    pub category: GroupValue,
    /// 1-based position on the x axis
    pub position: usize,
    /// Values summarised
    pub n_vals: usize,
    /// `None` when the combination had no values
    pub stats: Option<BoxStats>,
    /// "category, series" label for tooltips
    pub box_label: Option<String>,
}

impl BoxplotSummary {
    pub fn display(&self) -> bool {
        self.stats.is_some()
    }
}

/// Request-scoped accumulator shared by every box of one boxplot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxplotBuildContext {
    y_display: Option<(f64, f64)>,
    n_chart: usize,
    any_missing_boxes: bool,
    any_displayed_boxes: bool,
}

impl BoxplotBuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summarize one (series, category) sample and fold it into the context
    pub fn summarize(
        mut self,
        values: &[f64],
        policy: WhiskerPolicy,
        iqr_multiplier: f64,
    ) -> StatsResult<(Self, Option<BoxStats>)> {
        self.n_chart += values.len();
        if values.is_empty() {
            self.any_missing_boxes = true;
            return Ok((self, None));
        }

        let stats = BoxStats::from_values(values, policy, iqr_multiplier)?;
        let (lo, hi) = match policy {
            WhiskerPolicy::HideOutliers => (stats.lwhisker, stats.uwhisker),
            WhiskerPolicy::MinMax | WhiskerPolicy::Iqr1_5 => values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        };
        self.y_display = Some(match self.y_display {
            Some((cur_lo, cur_hi)) => (cur_lo.min(lo), cur_hi.max(hi)),
            None => (lo, hi),
        });
        self.any_displayed_boxes = true;
        Ok((self, Some(stats)))
    }

    /// Smallest and largest displayed values so far
    pub fn y_display(&self) -> Option<(f64, f64)> {
        self.y_display
    }

    pub fn n_chart(&self) -> usize {
        self.n_chart
    }

    pub fn any_missing_boxes(&self) -> bool {
        self.any_missing_boxes
    }

    pub fn any_displayed_boxes(&self) -> bool {
        self.any_displayed_boxes
    }
}

/// One series of boxes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxplotSeries {
    pub series_val: GroupValue,
    /// Present only when a series variable is in use
    pub legend_label: Option<String>,
    pub boxes: Vec<BoxplotSummary>,
}

/// Category tick on the x axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxisLabel {
    pub position: usize,
    pub label: String,
    pub lines: LabelLines,
}

/// Everything a renderer needs to draw a boxplot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxplotOutputBundle {
    pub overall_title: String,
    pub series: Vec<BoxplotSeries>,
    pub x_axis: Vec<XAxisLabel>,
    /// 0.5 to n_categories + 0.5
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    /// Total values summarised across all boxes
    pub n_chart: usize,
    pub any_missing_boxes: bool,
    pub max_x_label_len: usize,
    pub max_label_lines: usize,
}

/// Builds boxplots from raw values
#[derive(Debug, Clone, Default)]
pub struct BoxplotSummarizer {
    config: ChartConfig,
}

impl BoxplotSummarizer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Summarize every (series, category) combination
    ///
    /// Series and categories are the ones observed anywhere in `rows`.
    /// Categories follow their natural order, or label order for
    /// [`SortMode::Label`]; measure-based modes keep the natural order.
    pub fn build(
        &self,
        rows: &[MeasureRow],
        roles: &VariableRoles,
        labels: &ValueLabels,
        sort: SortMode,
        rotate: bool,
    ) -> ChartResult<Limited<BoxplotOutputBundle>> {
        let mut samples: BTreeMap<(&GroupValue, &GroupValue), Vec<f64>> = BTreeMap::new();
        let mut series_vals: BTreeSet<&GroupValue> = BTreeSet::new();
        let mut category_vals: BTreeSet<&GroupValue> = BTreeSet::new();
        for row in rows {
            series_vals.insert(&row.series);
            category_vals.insert(&row.category);
            samples
                .entry((&row.series, &row.category))
                .or_default()
                .push(row.value);
        }

        let limits = &self.config.limits;
        let mut exceeded = Vec::new();
        if roles.series_name.is_some() {
            exceeded.extend(LimitExceeded::check(
                GroupDimension::BoxplotSeries,
                series_vals.len(),
                limits.max_boxplot_series,
            ));
        }
        exceeded.extend(LimitExceeded::check(
            GroupDimension::BoxplotsPerSeries,
            category_vals.len(),
            limits.max_boxplots_per_series,
        ));

        let categories = self.category_axis(category_vals, roles, labels, sort, rotate);
        let policy = self.config.boxplot.whisker_policy;
        let multiplier = self.config.boxplot.iqr_multiplier;

        let mut ctx = BoxplotBuildContext::new();
        let mut series_out = Vec::with_capacity(series_vals.len());
        for series_val in series_vals {
            let legend_label = roles
                .series_name
                .as_ref()
                .map(|_| label_for(&labels.series, series_val));
            let mut boxes = Vec::with_capacity(categories.len());
            for (category, axis_label) in &categories {
                let values = samples
                    .get(&(series_val, *category))
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let (next, stats) = ctx.summarize(values, policy, multiplier)?;
                ctx = next;
                let box_label = stats
                    .as_ref()
                    .map(|_| {
                        let mut bits = Vec::new();
                        if roles.category_name.is_some() {
                            bits.push(axis_label.label.clone());
                        }
                        if let Some(legend) = &legend_label {
                            bits.push(legend.clone());
                        }
                        bits.join(", ")
                    })
                    .filter(|label| !label.is_empty());
                boxes.push(BoxplotSummary {
                    category: (*category).clone(),
                    position: axis_label.position,
                    n_vals: values.len(),
                    stats,
                    box_label,
                });
            }
            series_out.push(BoxplotSeries {
                series_val: series_val.clone(),
                legend_label,
                boxes,
            });
        }

        let Some((y_lo, y_hi)) = ctx.y_display() else {
            return Err(ChartError::TooFewBoxplots);
        };
        let y_range = AxisRange::optimal(y_lo, y_hi, &self.config.axis);
        let x_axis: Vec<XAxisLabel> = categories.into_iter().map(|(_, label)| label).collect();

        let bundle = BoxplotOutputBundle {
            overall_title: boxplot_title(roles),
            x_range: AxisRange::new(0.5, x_axis.len() as f64 + 0.5),
            y_range,
            n_chart: ctx.n_chart(),
            any_missing_boxes: ctx.any_missing_boxes(),
            max_x_label_len: x_axis.iter().map(|l| l.lines.width).max().unwrap_or(0),
            max_label_lines: x_axis.iter().map(|l| l.lines.n_lines()).max().unwrap_or(0),
            series: series_out,
            x_axis,
        };
        Ok(Limited::new(bundle, exceeded))
    }

    fn category_axis<'a>(
        &self,
        category_vals: BTreeSet<&'a GroupValue>,
        roles: &VariableRoles,
        labels: &ValueLabels,
        sort: SortMode,
        rotate: bool,
    ) -> Vec<(&'a GroupValue, XAxisLabel)> {
        let numbers: Vec<f64> = category_vals.iter().filter_map(|c| c.as_number()).collect();
        let dp = best_decimal_places(&numbers, self.config.labels.max_decimal_places);

        let mut categories: Vec<(&GroupValue, String)> = category_vals
            .into_iter()
            .map(|c| {
                let label = if roles.category_name.is_some() {
                    labels
                        .categories
                        .get(c)
                        .cloned()
                        .unwrap_or_else(|| display_value(c, dp))
                } else {
                    String::new()
                };
                (c, label)
            })
            .collect();
        if sort == SortMode::Label {
            categories.sort_by(|a, b| a.1.cmp(&b.1));
        }

        categories
            .into_iter()
            .enumerate()
            .map(|(i, (c, label))| {
                let lines = split_label_lines(&label, self.config.labels.line_width, rotate);
                (
                    c,
                    XAxisLabel {
                        position: i + 1,
                        label,
                        lines,
                    },
                )
            })
            .collect()
    }
}

/// Label for a value, falling back to the value itself
pub(crate) fn label_for(map: &BTreeMap<GroupValue, String>, value: &GroupValue) -> String {
    map.get(value).cloned().unwrap_or_else(|| value.to_string())
}

/// Numbers shown with `dp` places, text as is
pub(crate) fn display_value(value: &GroupValue, dp: usize) -> String {
    match value {
        GroupValue::Number(n) => format_number(*n, dp),
        GroupValue::Text(s) => s.clone(),
    }
}

fn boxplot_title(roles: &VariableRoles) -> String {
    let mut bits = Vec::new();
    if let Some(measure) = &roles.measure_name {
        bits.push(measure.clone());
    }
    if let Some(category) = &roles.category_name {
        bits.push(format!("By {}", category));
    }
    if let Some(series) = &roles.series_name {
        bits.push(format!("By {}", series));
    }
    bits.join(" ")
}
