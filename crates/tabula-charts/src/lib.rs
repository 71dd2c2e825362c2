//! tabula-charts - Chart-data synthesis for analysis reports
//!
//! This crate turns already-fetched query rows into renderer-ready chart
//! structures. It never talks to a database or emits markup.
//!
//! # Key Components
//!
//! - **Grouping**: sparse (chart, series, category, measure) rows completed
//!   into a full cross product per chart
//! - **Output**: titles, legend and axis labels, percentages, layout metadata
//! - **Boxplot**: quartiles, whisker policies and outliers per box
//! - **Histogram**: shared nice bins, saw-tooth repair, normal overlays
//! - **Axis**: padded axis ranges for boxplots and scatterplots
//!
//! # Soft limits
//!
//! Oversized requests are not errors. Builders return [`Limited`] values
//! recording every breached limit; callers either [`Limited::proceed`] or
//! [`Limited::enforce`].

pub mod axis;
pub mod boxplot;
pub mod config;
pub mod error;
pub mod grouping;
pub mod histogram;
pub mod labels;
pub mod limits;
pub mod output;
pub mod sorting;
pub mod types;

pub use axis::*;
pub use boxplot::{
    BoxStats, BoxplotBuildContext, BoxplotOutputBundle, BoxplotSeries, BoxplotSummarizer,
    BoxplotSummary, WhiskerPolicy, XAxisLabel,
};
pub use config::*;
pub use error::{ChartError, ChartResult};
pub use grouping::*;
pub use histogram::*;
pub use labels::*;
pub use limits::*;
pub use output::*;
pub use sorting::*;
pub use types::*;
