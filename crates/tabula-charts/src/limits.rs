//! Soft limits on the number of groups in a chart
//!
//! Exceeding a limit is not an error by itself. Operations that can run over
//! a limit return [`Limited`], which carries the full data together with
//! every [`LimitExceeded`] found. The caller then either keeps the data with
//! [`Limited::proceed`] or turns the first breach into
//! [`ChartError::TooManyGroups`] with [`Limited::enforce`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Grouping dimension a limit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupDimension {
    Charts,
    Series,
    Categories,
    Clusters,
    PieSlices,
    BoxplotSeries,
    BoxplotsPerSeries,
}

impl fmt::Display for GroupDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupDimension::Charts => "charts",
            GroupDimension::Series => "series",
            GroupDimension::Categories => "categories",
            GroupDimension::Clusters => "clusters",
            GroupDimension::PieSlices => "pie slices",
            GroupDimension::BoxplotSeries => "boxplot series",
            GroupDimension::BoxplotsPerSeries => "boxplots per series",
        };
        f.write_str(name)
    }
}

/// One breached limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitExceeded {
    pub dimension: GroupDimension,
    /// Observed number of groups
    pub count: usize,
    /// Configured maximum
    pub limit: usize,
    /// Chart or series the count was taken from, if any
    pub context: Option<String>,
}

impl LimitExceeded {
    /// Returns a breach when `count` is above `limit`
    pub fn check(dimension: GroupDimension, count: usize, limit: usize) -> Option<Self> {
        (count > limit).then(|| Self {
            dimension,
            count,
            limit,
            context: None,
        })
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl From<LimitExceeded> for ChartError {
    fn from(exceeded: LimitExceeded) -> Self {
        ChartError::TooManyGroups {
            dimension: exceeded.dimension,
            count: exceeded.count,
            limit: exceeded.limit,
        }
    }
}

/// Data produced under soft limits
#[derive(Debug, Clone, PartialEq)]
pub struct Limited<T> {
    data: T,
    exceeded: Vec<LimitExceeded>,
}

impl<T> Limited<T> {
    /// Data with no breached limits
    pub fn within(data: T) -> Self {
        Self {
            data,
            exceeded: Vec::new(),
        }
    }

    pub fn new(data: T, exceeded: Vec<LimitExceeded>) -> Self {
        Self { data, exceeded }
    }

    pub fn is_within_limits(&self) -> bool {
        self.exceeded.is_empty()
    }

    /// Limits that were breached, in the order they were found
    pub fn exceeded(&self) -> &[LimitExceeded] {
        &self.exceeded
    }

    /// Inspect the data without deciding
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Keep the data regardless of any breached limit
    pub fn proceed(self) -> T {
        for breach in &self.exceeded {
            tracing::warn!(
                dimension = %breach.dimension,
                count = breach.count,
                limit = breach.limit,
                context = breach.context.as_deref().unwrap_or(""),
                "proceeding past group limit"
            );
        }
        self.data
    }

    /// Treat limits as hard: fail on the first breach
    pub fn enforce(self) -> ChartResult<T> {
        match self.exceeded.into_iter().next() {
            Some(breach) => Err(breach.into()),
            None => Ok(self.data),
        }
    }

    /// Transform the data, keeping the recorded breaches
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Limited<U> {
        Limited {
            data: f(self.data),
            exceeded: self.exceeded,
        }
    }

    /// Transform the data with a function that may itself breach limits
    pub fn and_then<U>(
        self,
        f: impl FnOnce(T) -> ChartResult<Limited<U>>,
    ) -> ChartResult<Limited<U>> {
        let mut exceeded = self.exceeded;
        let next = f(self.data)?;
        exceeded.extend(next.exceeded);
        Ok(Limited {
            data: next.data,
            exceeded,
        })
    }
}
