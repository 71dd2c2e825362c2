//! Core data types for chart-data synthesis

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A grouping value as returned by the data source
///
/// Numbers order before text. Numbers compare with `total_cmp`, so the type
/// can key ordered maps and sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupValue {
    Number(f64),
    Text(String),
}

impl GroupValue {
    /// Stands in for an unused chart or series dimension
    pub const PLACEHOLDER: GroupValue = GroupValue::Number(1.0);

    pub fn as_number(&self) -> Option<f64> {
        match self {
            GroupValue::Number(n) => Some(*n),
            GroupValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            GroupValue::Number(_) => None,
            GroupValue::Text(s) => Some(s),
        }
    }

    /// Length of a text value in characters; numbers have no label length
    pub fn text_len(&self) -> Option<usize> {
        self.as_text().map(|s| s.chars().count())
    }
}

impl PartialEq for GroupValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupValue {}

impl PartialOrd for GroupValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupValue::Number(a), GroupValue::Number(b)) => a.total_cmp(b),
            (GroupValue::Number(_), GroupValue::Text(_)) => Ordering::Less,
            (GroupValue::Text(_), GroupValue::Number(_)) => Ordering::Greater,
            (GroupValue::Text(a), GroupValue::Text(b)) => a.cmp(b),
        }
    }
}

impl Hash for GroupValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            GroupValue::Number(n) => {
                0u8.hash(state);
                n.to_bits().hash(state);
            }
            GroupValue::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Number(n) => write!(f, "{}", n),
            GroupValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for GroupValue {
    fn from(n: f64) -> Self {
        GroupValue::Number(n)
    }
}

impl From<i32> for GroupValue {
    fn from(n: i32) -> Self {
        GroupValue::Number(n as f64)
    }
}

impl From<i64> for GroupValue {
    fn from(n: i64) -> Self {
        GroupValue::Number(n as f64)
    }
}

impl From<&str> for GroupValue {
    fn from(s: &str) -> Self {
        GroupValue::Text(s.to_string())
    }
}

impl From<String> for GroupValue {
    fn from(s: String) -> Self {
        GroupValue::Text(s)
    }
}

/// One aggregated query row: chart, series, category and measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedRow {
    pub chart: GroupValue,
    pub series: GroupValue,
    pub category: GroupValue,
    pub measure: f64,
}

impl GroupedRow {
    pub fn new(
        chart: impl Into<GroupValue>,
        series: impl Into<GroupValue>,
        category: impl Into<GroupValue>,
        measure: f64,
    ) -> Self {
        Self {
            chart: chart.into(),
            series: series.into(),
            category: category.into(),
            measure,
        }
    }
}

/// One raw (unaggregated) value with its series and category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureRow {
    pub series: GroupValue,
    pub category: GroupValue,
    pub value: f64,
}

impl MeasureRow {
    pub fn new(series: impl Into<GroupValue>, category: impl Into<GroupValue>, value: f64) -> Self {
        Self {
            series: series.into(),
            category: category.into(),
            value,
        }
    }
}

/// Category and its measure within a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XyPair {
    pub category: GroupValue,
    pub measure: f64,
}

impl XyPair {
    pub fn new(category: impl Into<GroupValue>, measure: f64) -> Self {
        Self {
            category: category.into(),
            measure,
        }
    }
}

/// A series and its points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesBundle {
    pub series_val: GroupValue,
    pub xy_pairs: Vec<XyPair>,
}

/// A chart, its record count and its series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBundle {
    pub chart_val: GroupValue,
    /// Records behind the chart
    pub chart_n: u64,
    pub series: Vec<SeriesBundle>,
}

impl ChartBundle {
    /// Number of categories on the (completed) category axis
    pub fn n_categories(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.xy_pairs.len())
            .max()
            .unwrap_or(0)
    }

    pub fn is_multiseries(&self) -> bool {
        self.series.len() > 1
    }
}

/// Record count per chart value
pub type ChartCounts = BTreeMap<GroupValue, u64>;

/// Display names of the variables in each role
///
/// An absent name means the role is unused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableRoles {
    /// Averaged or binned variable
    pub measure_name: Option<String>,
    pub category_name: Option<String>,
    pub series_name: Option<String>,
    pub chart_name: Option<String>,
}

impl VariableRoles {
    pub fn with_measure(mut self, name: impl Into<String>) -> Self {
        self.measure_name = Some(name.into());
        self
    }

    pub fn with_category(mut self, name: impl Into<String>) -> Self {
        self.category_name = Some(name.into());
        self
    }

    pub fn with_series(mut self, name: impl Into<String>) -> Self {
        self.series_name = Some(name.into());
        self
    }

    pub fn with_chart(mut self, name: impl Into<String>) -> Self {
        self.chart_name = Some(name.into());
        self
    }
}

/// Caller-supplied value labels per role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueLabels {
    pub categories: BTreeMap<GroupValue, String>,
    pub series: BTreeMap<GroupValue, String>,
    pub charts: BTreeMap<GroupValue, String>,
}
