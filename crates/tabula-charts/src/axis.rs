//! Axis ranges for boxplots and scatterplots
//!
//! A zero-based axis squashes tightly clustered values into an unreadable
//! sliver, so ranges start just below the data unless the data already sits
//! close to zero.

use serde::{Deserialize, Serialize};

use tabula_stats::min_max;

use crate::config::AxisConfig;

/// Displayed range of an axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Padded range for observed extremes
    ///
    /// Four scenarios:
    /// 1. min == max: give the axis some range (0 becomes -1..1)
    /// 2. both non-negative: snap min to 0 when the gap below the data is
    ///    small relative to the range, otherwise pad just below min; pad max
    /// 3. both non-positive: the mirror image of (2)
    /// 4. spanning zero: pad both ends outwards
    pub fn optimal(observed_min: f64, observed_max: f64, config: &AxisConfig) -> Self {
        let pad = config.pad_fraction;
        let (mut min, mut max) = (observed_min, observed_max);

        if min == max {
            let value = min;
            if value < 0.0 {
                min = (1.0 + pad) * value;
                max = 0.0;
            } else if value == 0.0 {
                min = -1.0;
                max = 1.0;
            } else {
                min = 0.0;
                max = (1.0 + pad) * value;
            }
        } else if min >= 0.0 && max >= 0.0 {
            let gap = min;
            let range = max - min;
            if gap / range < config.snap_ratio {
                min = 0.0;
            } else {
                min -= (pad * gap).min(pad * range);
            }
            max += (pad * max).min(pad * range);
        } else if min <= 0.0 && max <= 0.0 {
            let gap = max.abs();
            let range = (max - min).abs();
            if gap / range < config.snap_ratio {
                max = 0.0;
            } else {
                max += (pad * gap).min(pad * range);
            }
            min -= (pad * min.abs()).min(pad * range);
        } else {
            max *= 1.0 + pad;
            min *= 1.0 + pad;
        }

        Self { min, max }
    }

    /// Padded range covering every value, or `None` for no values
    pub fn for_values(values: &[f64], config: &AxisConfig) -> Option<Self> {
        min_max(values).map(|(lo, hi)| Self::optimal(lo, hi, config))
    }
}

/// Padded range using the default padding rules
pub fn optimal_min_max(observed_min: f64, observed_max: f64) -> AxisRange {
    AxisRange::optimal(observed_min, observed_max, &AxisConfig::default())
}
