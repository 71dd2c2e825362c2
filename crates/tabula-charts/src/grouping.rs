//! Grouped data completion
//!
//! Aggregated rows arrive sparse: a GROUP BY only returns the combinations
//! that actually occur. Charts need every series in a chart to share one
//! category axis, so missing (series, category) combinations are filled in
//! with a zero measure.
//!
//! Two passes:
//! 1. [`GroupedDataCompleter::prestructure`] walks the sorted rows once,
//!    opening a new chart or series whenever the value changes
//! 2. [`GroupedDataCompleter::complete`] zero-fills each series against the
//!    union of categories seen in its chart

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::LimitsConfig;
use crate::error::{ChartError, ChartResult};
use crate::limits::{GroupDimension, LimitExceeded, Limited};
use crate::types::{
    ChartBundle, ChartCounts, GroupValue, GroupedRow, SeriesBundle, VariableRoles, XyPair,
};

/// Chart type, which decides the category limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Bar,
    ClusteredBar,
    Line,
    Area,
    Pie,
}

/// Builds complete chart bundles from sorted grouped rows
#[derive(Debug, Clone, Default)]
pub struct GroupedDataCompleter {
    limits: LimitsConfig,
}

impl GroupedDataCompleter {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Group sorted rows into charts and series without filling gaps
    ///
    /// Rows must be sorted by chart, then series, then category. A chart or
    /// series value that reappears after another value has started fails
    /// with [`ChartError::UnsortedRows`].
    pub fn prestructure(
        &self,
        rows: &[GroupedRow],
        chart_ns: &ChartCounts,
        roles: &VariableRoles,
    ) -> ChartResult<Vec<ChartBundle>> {
        let mut charts: Vec<ChartBundle> = Vec::new();
        let mut seen_charts: HashSet<&GroupValue> = HashSet::new();
        let mut seen_series: HashSet<&GroupValue> = HashSet::new();

        for row in rows {
            self.check_label_lengths(row, roles)?;

            let same_chart = charts.last().is_some_and(|c| c.chart_val == row.chart);
            if !same_chart {
                if !seen_charts.insert(&row.chart) {
                    return Err(ChartError::UnsortedRows {
                        chart: row.chart.to_string(),
                    });
                }
                let chart_n = *chart_ns
                    .get(&row.chart)
                    .ok_or_else(|| ChartError::MissingChartCount {
                        chart: row.chart.to_string(),
                    })?;
                seen_series.clear();
                seen_series.insert(&row.series);
                charts.push(ChartBundle {
                    chart_val: row.chart.clone(),
                    chart_n,
                    series: vec![SeriesBundle {
                        series_val: row.series.clone(),
                        xy_pairs: vec![XyPair::new(row.category.clone(), row.measure)],
                    }],
                });
                continue;
            }

            let Some(chart) = charts.last_mut() else {
                continue;
            };
            match chart.series.last_mut() {
                Some(series) if series.series_val == row.series => {
                    series
                        .xy_pairs
                        .push(XyPair::new(row.category.clone(), row.measure));
                }
                _ => {
                    if !seen_series.insert(&row.series) {
                        return Err(ChartError::UnsortedRows {
                            chart: row.chart.to_string(),
                        });
                    }
                    chart.series.push(SeriesBundle {
                        series_val: row.series.clone(),
                        xy_pairs: vec![XyPair::new(row.category.clone(), row.measure)],
                    });
                }
            }
        }

        Ok(charts)
    }

    /// Zero-fill every series against its chart's category axis
    ///
    /// The axis is the union of categories across the chart's series, in
    /// natural value order. Repeated categories within one series are
    /// summed.
    pub fn complete(&self, charts: Vec<ChartBundle>) -> Vec<ChartBundle> {
        charts.into_iter().map(complete_chart).collect()
    }

    /// Prestructure, complete and check group limits
    pub fn build(
        &self,
        rows: &[GroupedRow],
        chart_ns: &ChartCounts,
        roles: &VariableRoles,
        kind: ChartKind,
    ) -> ChartResult<Limited<Vec<ChartBundle>>> {
        let charts = self.complete(self.prestructure(rows, chart_ns, roles)?);
        let exceeded = self.check_limits(&charts, kind);
        Ok(Limited::new(charts, exceeded))
    }

    /// Every soft limit breached by completed charts
    pub fn check_limits(&self, charts: &[ChartBundle], kind: ChartKind) -> Vec<LimitExceeded> {
        let mut exceeded: Vec<LimitExceeded> =
            LimitExceeded::check(GroupDimension::Charts, charts.len(), self.limits.max_charts)
                .into_iter()
                .collect();

        let (category_dimension, category_limit) = match kind {
            ChartKind::ClusteredBar => (GroupDimension::Clusters, self.limits.max_clusters),
            ChartKind::Pie => (GroupDimension::PieSlices, self.limits.max_pie_slices),
            _ => (GroupDimension::Categories, self.limits.max_categories),
        };

        for chart in charts {
            let context = chart.chart_val.to_string();
            if let Some(breach) = LimitExceeded::check(
                GroupDimension::Series,
                chart.series.len(),
                self.limits.max_series,
            ) {
                exceeded.push(breach.with_context(context.clone()));
            }
            if let Some(breach) =
                LimitExceeded::check(category_dimension, chart.n_categories(), category_limit)
            {
                exceeded.push(breach.with_context(context));
            }
        }
        exceeded
    }

    fn check_label_lengths(&self, row: &GroupedRow, roles: &VariableRoles) -> ChartResult<()> {
        let fields = [
            (&row.chart, roles.chart_name.as_deref().unwrap_or("chart")),
            (&row.series, roles.series_name.as_deref().unwrap_or("series")),
            (&row.category, roles.category_name.as_deref().unwrap_or("category")),
        ];
        for (value, field) in fields {
            if let Some(len) = value.text_len() {
                if len > self.limits.max_label_len {
                    return Err(ChartError::CategoryTooLong {
                        field: field.to_string(),
                        len,
                        max: self.limits.max_label_len,
                    });
                }
            }
        }
        Ok(())
    }
}

fn complete_chart(chart: ChartBundle) -> ChartBundle {
    let categories: BTreeSet<GroupValue> = chart
        .series
        .iter()
        .flat_map(|s| s.xy_pairs.iter().map(|xy| xy.category.clone()))
        .collect();

    let series = chart
        .series
        .into_iter()
        .map(|series| {
            let mut measures: BTreeMap<GroupValue, f64> = BTreeMap::new();
            for xy in series.xy_pairs {
                *measures.entry(xy.category).or_insert(0.0) += xy.measure;
            }
            let xy_pairs = categories
                .iter()
                .map(|category| match measures.get(category) {
                    Some(&measure) => XyPair::new(category.clone(), measure),
                    None => {
                        tracing::debug!(
                            chart = %chart.chart_val,
                            series = %series.series_val,
                            category = %category,
                            "zero-filling missing category"
                        );
                        XyPair::new(category.clone(), 0.0)
                    }
                })
                .collect();
            SeriesBundle {
                series_val: series.series_val,
                xy_pairs,
            }
        })
        .collect();

    ChartBundle {
        chart_val: chart.chart_val,
        chart_n: chart.chart_n,
        series,
    }
}
