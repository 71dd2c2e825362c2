//! Category ordering within a series

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// How categories are ordered along the axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Natural order of the category values
    #[default]
    Category,
    /// Alphabetical by displayed label
    Label,
    /// Measure ascending
    Increasing,
    /// Measure descending
    Decreasing,
}

impl SortMode {
    /// Whether the ordering depends on the measure of one series
    pub fn is_measure_based(self) -> bool {
        matches!(self, SortMode::Increasing | SortMode::Decreasing)
    }

    /// Reject measure-based orderings for charts sharing a category axis
    ///
    /// Sorting by measure happens within one series, so every series in a
    /// multi-series chart would end up with a different axis.
    pub fn check_multiseries(self, multiseries: bool) -> ChartResult<()> {
        if multiseries && self.is_measure_based() {
            return Err(ChartError::InvalidSortForMultiseries {
                mode: self.to_string(),
            });
        }
        Ok(())
    }

    /// Stable in-place sort of `items`
    pub fn sort<T>(
        self,
        items: &mut [T],
        measure: impl Fn(&T) -> f64,
        label: impl Fn(&T) -> &str,
    ) {
        match self {
            SortMode::Category => {}
            SortMode::Label => items.sort_by(|a, b| label(a).cmp(label(b))),
            SortMode::Increasing => items.sort_by(|a, b| measure(a).total_cmp(&measure(b))),
            SortMode::Decreasing => items.sort_by(|a, b| measure(b).total_cmp(&measure(a))),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortMode::Category => "category",
            SortMode::Label => "label",
            SortMode::Increasing => "increasing value",
            SortMode::Decreasing => "decreasing value",
        };
        f.write_str(name)
    }
}
