//! Error types for tabula-charts
//!
//! Covers failures while turning query rows into chart structures:
//! - Malformed or oversized input rows
//! - Too little data to draw a chart
//! - Hard limits on the number of groups
//! - Configuration problems

use thiserror::Error;

use tabula_stats::StatsError;

use crate::limits::GroupDimension;

/// Main error type for chart-data synthesis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// Statistical computation failed
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// A chart, series or category label is too long to render
    #[error("Value in '{field}' is {len} characters long (max: {max})")]
    CategoryTooLong {
        field: String,
        len: usize,
        max: usize,
    },

    /// Rows reference a chart with no record count
    #[error("No record count supplied for chart '{chart}'")]
    MissingChartCount { chart: String },

    /// Rows are not grouped by chart then series
    #[error("Rows for chart '{chart}' are not contiguous; sort by chart, series, then category")]
    UnsortedRows { chart: String },

    /// A histogram sub-collection is too small
    #[error("Chart '{chart}' needs at least {needed} values, got {got}")]
    InsufficientData {
        chart: String,
        needed: usize,
        got: usize,
    },

    /// No box in a boxplot had any values
    #[error("Too few boxplots to display: every category is empty")]
    TooFewBoxplots,

    /// A group count exceeded its limit and the caller enforced it
    #[error("Too many {dimension}: {count} (max: {limit})")]
    TooManyGroups {
        dimension: GroupDimension,
        count: usize,
        limit: usize,
    },

    /// Measure-based sorting requested for a multi-series chart
    #[error("Sorting by {mode} is not possible for multi-series charts; sort by category or label")]
    InvalidSortForMultiseries { mode: String },

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),
}

/// Result type alias for chart operations
pub type ChartResult<T> = Result<T, ChartError>;
