//! Renderer-ready output for bar, line, area and pie charts
//!
//! Takes completed [`ChartBundle`]s and attaches everything a renderer
//! needs: labels, legend entries, percentages and layout metadata.

use serde::{Deserialize, Serialize};

use crate::boxplot::{display_value, label_for};
use crate::config::ChartConfig;
use crate::error::ChartResult;
use crate::grouping::{ChartKind, GroupedDataCompleter};
use crate::labels::{best_decimal_places, format_number, round_to, split_label_lines, LabelLines};
use crate::limits::Limited;
use crate::sorting::SortMode;
use crate::types::{ChartBundle, ChartCounts, GroupValue, GroupedRow, ValueLabels, VariableRoles};

/// What the y values show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataShow {
    /// Record counts
    #[default]
    Frequency,
    /// Share of the series total
    Percentage,
    /// An aggregate such as a mean
    Aggregate,
}

impl DataShow {
    /// Percentages only make sense for counts
    pub fn shows_percentage(self) -> bool {
        !matches!(self, DataShow::Aggregate)
    }
}

/// Options for one chart request
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub data_show: DataShow,
    pub sort: SortMode,
    /// Axis labels are rotated rather than wrapped
    pub rotate: bool,
}

/// One point on a category axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayPoint {
    pub category: GroupValue,
    pub x_label: String,
    pub x_label_lines: LabelLines,
    /// Value plotted: the measure, or its percentage of the series total
    pub y: f64,
    /// Raw measure at full precision
    pub measure: f64,
    /// Measure rounded for display
    pub measure_label: String,
    /// `None` for aggregates
    pub percentage: Option<f64>,
    /// "{x label}, {legend label}" in multi-series charts
    pub item_label: Option<String>,
}

/// One series of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesOutput {
    pub series_val: GroupValue,
    /// Present only in multi-series charts
    pub legend_label: Option<String>,
    pub points: Vec<DisplayPoint>,
}

/// One chart of an output set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOutput {
    pub chart_val: GroupValue,
    /// "{chart variable}: {value label}" when there are several charts
    pub chart_label: Option<String>,
    pub chart_n: u64,
    pub series: Vec<SeriesOutput>,
}

/// A set of charts and their shared layout metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOutputBundle {
    pub overall_title: String,
    pub overall_legend_label: Option<String>,
    /// Widest x label, for chart height
    pub max_x_label_len: usize,
    /// Widest y value, for the left axis offset
    pub max_y_label_len: usize,
    /// Most lines in any x label
    pub max_label_lines: usize,
    pub charts: Vec<ChartOutput>,
}

/// Title naming the measure and every grouping variable in use
pub fn overall_title(roles: &VariableRoles) -> String {
    let mut bits = Vec::new();
    if let Some(measure) = &roles.measure_name {
        bits.push(format!("Avg {}", measure));
    }
    if let Some(category) = &roles.category_name {
        if roles.measure_name.is_some() {
            bits.push(format!("By {}", category));
        } else {
            bits.push(category.clone());
        }
    }
    if let Some(series) = &roles.series_name {
        bits.push(format!("By {}", series));
    }
    if let Some(chart) = &roles.chart_name {
        bits.push(format!("By {}", chart));
    }
    bits.join(" ")
}

/// Assembles [`ChartOutputBundle`]s
#[derive(Debug, Clone, Default)]
pub struct ChartOutputBuilder {
    config: ChartConfig,
}

impl ChartOutputBuilder {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Group, complete and assemble rows in one go
    pub fn from_rows(
        &self,
        rows: &[GroupedRow],
        chart_ns: &ChartCounts,
        roles: &VariableRoles,
        labels: &ValueLabels,
        request: ChartRequest,
    ) -> ChartResult<Limited<ChartOutputBundle>> {
        GroupedDataCompleter::new(self.config.limits.clone())
            .build(rows, chart_ns, roles, request.kind)?
            .and_then(|charts| self.assemble(charts, roles, labels, request).map(Limited::within))
    }

    /// Assemble completed chart bundles
    pub fn assemble(
        &self,
        charts: Vec<ChartBundle>,
        roles: &VariableRoles,
        labels: &ValueLabels,
        request: ChartRequest,
    ) -> ChartResult<ChartOutputBundle> {
        let label_cfg = &self.config.labels;
        let dp_y = match request.data_show {
            DataShow::Frequency => 0,
            DataShow::Percentage | DataShow::Aggregate => label_cfg.report_decimal_places,
        };

        // x values repeat across charts and series
        let x_numbers: Vec<f64> = charts
            .iter()
            .flat_map(|c| c.series.iter())
            .flat_map(|s| s.xy_pairs.iter())
            .filter_map(|xy| xy.category.as_number())
            .collect();
        let dp_x = best_decimal_places(&x_numbers, label_cfg.max_decimal_places);

        let multichart = charts.len() > 1;
        let mut max_x_label_len = 0;
        let mut max_y_label_len = 0;
        let mut max_label_lines = 0;

        let mut out = Vec::with_capacity(charts.len());
        for chart in charts {
            let multiseries = chart.is_multiseries();
            request.sort.check_multiseries(multiseries)?;

            let chart_label = match (&roles.chart_name, multichart) {
                (Some(name), true) => Some(format!(
                    "{}: {}",
                    name,
                    label_for(&labels.charts, &chart.chart_val)
                )),
                _ => None,
            };

            let mut series_out = Vec::with_capacity(chart.series.len());
            for series in chart.series {
                let legend_label =
                    multiseries.then(|| label_for(&labels.series, &series.series_val));
                let total: f64 = series.xy_pairs.iter().map(|xy| xy.measure).sum();

                let mut points: Vec<DisplayPoint> = series
                    .xy_pairs
                    .into_iter()
                    .map(|xy| {
                        let x_label = labels
                            .categories
                            .get(&xy.category)
                            .cloned()
                            .unwrap_or_else(|| display_value(&xy.category, dp_x));
                        let x_label_lines =
                            split_label_lines(&x_label, label_cfg.line_width, request.rotate);
                        let perc = if total == 0.0 { 0.0 } else { 100.0 * xy.measure / total };
                        let y = match request.data_show {
                            DataShow::Percentage => perc,
                            DataShow::Frequency | DataShow::Aggregate => xy.measure,
                        };
                        let item_label = legend_label
                            .as_ref()
                            .map(|legend| format!("{}, {}", x_label, legend));
                        DisplayPoint {
                            category: xy.category,
                            x_label_lines,
                            y,
                            measure: xy.measure,
                            measure_label: format_number(xy.measure, dp_y),
                            percentage: request.data_show.shows_percentage().then_some(perc),
                            item_label,
                            x_label,
                        }
                    })
                    .collect();
                request.sort.sort(&mut points, |p| p.measure, |p| p.x_label.as_str());

                for point in &points {
                    max_x_label_len = max_x_label_len.max(point.x_label_lines.width);
                    max_label_lines = max_label_lines.max(point.x_label_lines.n_lines());
                    max_y_label_len =
                        max_y_label_len.max(format_number(round_to(point.y, 0), 0).len());
                }

                series_out.push(SeriesOutput {
                    series_val: series.series_val,
                    legend_label,
                    points,
                });
            }

            out.push(ChartOutput {
                chart_val: chart.chart_val,
                chart_label,
                chart_n: chart.chart_n,
                series: series_out,
            });
        }

        Ok(ChartOutputBundle {
            overall_title: overall_title(roles),
            overall_legend_label: roles.series_name.clone(),
            max_x_label_len,
            max_y_label_len,
            max_label_lines,
            charts: out,
        })
    }
}
