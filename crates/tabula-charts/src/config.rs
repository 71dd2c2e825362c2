//! Configuration for tabula-charts
//!
//! Centralized settings for group limits, label formatting, histogram
//! binning, whisker policy and axis padding.

use serde::{Deserialize, Serialize};

use crate::boxplot::WhiskerPolicy;
use crate::error::{ChartError, ChartResult};

/// Chart-building configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Soft limits on group counts
    pub limits: LimitsConfig,
    /// Label formatting
    pub labels: LabelsConfig,
    /// Histogram binning
    pub histogram: HistogramConfig,
    /// Boxplot whiskers
    pub boxplot: BoxplotConfig,
    /// Axis padding for boxplots and scatterplots
    pub axis: AxisConfig,
}

/// Group limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Charts in one output set
    pub max_charts: usize,
    /// Series in one chart
    pub max_series: usize,
    /// Categories in a general chart
    pub max_categories: usize,
    /// Clusters in a clustered bar chart
    pub max_clusters: usize,
    /// Slices in a pie chart
    pub max_pie_slices: usize,
    /// Series in a boxplot
    pub max_boxplot_series: usize,
    /// Boxes per boxplot series
    pub max_boxplots_per_series: usize,
    /// Longest chart, series or category label
    pub max_label_len: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_charts: 16,
            max_series: 30,
            max_categories: 100,
            max_clusters: 150,
            max_pie_slices: 30,
            max_boxplot_series: 8,
            max_boxplots_per_series: 20,
            max_label_len: 90,
        }
    }
}

/// Label formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    /// Upper bound for inferred decimal places
    pub max_decimal_places: usize,
    /// Decimal places for non-frequency measures
    pub report_decimal_places: usize,
    /// Characters per line when wrapping axis labels
    pub line_width: usize,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            max_decimal_places: 6,
            report_decimal_places: 1,
            line_width: 17,
        }
    }
}

/// Histogram binning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// Bin count aimed for before rounding to nice widths
    pub target_bins: usize,
    /// Fewest values a sub-histogram may have
    pub min_values: usize,
    /// Upper bound for bin label decimal places
    pub max_decimal_places: usize,
    /// Saw-tooth repair
    pub sawtooth: SawtoothConfig,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            target_bins: 20,
            min_values: 5,
            max_decimal_places: 6,
            sawtooth: SawtoothConfig::default(),
        }
    }
}

/// Saw-tooth detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SawtoothConfig {
    /// Repair stops once the bin count is at or below this
    pub min_bins: usize,
    /// Patterns tried in order on each pass
    pub checks: Vec<SawtoothCheck>,
}

impl Default for SawtoothConfig {
    fn default() -> Self {
        Self {
            min_bins: 5,
            checks: vec![
                SawtoothCheck { period: 5, offset: 0 },
                SawtoothCheck { period: 2, offset: 0 },
                SawtoothCheck { period: 2, offset: 1 },
            ],
        }
    }
}

/// Only every `period`-th bin starting at `offset` has values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SawtoothCheck {
    pub period: usize,
    pub offset: usize,
}

/// Boxplot settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxplotConfig {
    pub whisker_policy: WhiskerPolicy,
    /// IQR multiple for the raw whisker bounds
    pub iqr_multiplier: f64,
}

impl Default for BoxplotConfig {
    fn default() -> Self {
        Self {
            whisker_policy: WhiskerPolicy::default(),
            iqr_multiplier: 1.5,
        }
    }
}

/// Axis range padding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    /// Snap to zero when gap / range is below this
    pub snap_ratio: f64,
    /// Fraction of the range used as padding
    pub pad_fraction: f64,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            snap_ratio: 0.6,
            pad_fraction: 0.1,
        }
    }
}

impl ChartConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    #[cfg(feature = "toml-config")]
    pub fn from_toml(toml_str: &str) -> ChartResult<Self> {
        toml::from_str(toml_str).map_err(|e| ChartError::ConfigParse(e.to_string()))
    }

    /// Serialize configuration to TOML
    #[cfg(feature = "toml-config")]
    pub fn to_toml(&self) -> ChartResult<String> {
        toml::to_string_pretty(self).map_err(|e| ChartError::ConfigParse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> ChartResult<Self> {
        serde_json::from_str(json_str).map_err(|e| ChartError::ConfigParse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ChartError::ConfigParse(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> ChartResult<()> {
        let limits = [
            ("max_charts", self.limits.max_charts),
            ("max_series", self.limits.max_series),
            ("max_categories", self.limits.max_categories),
            ("max_clusters", self.limits.max_clusters),
            ("max_pie_slices", self.limits.max_pie_slices),
            ("max_boxplot_series", self.limits.max_boxplot_series),
            ("max_boxplots_per_series", self.limits.max_boxplots_per_series),
            ("max_label_len", self.limits.max_label_len),
        ];
        if let Some((name, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(ChartError::InvalidConfig(format!("{} must be positive", name)));
        }

        if self.labels.line_width == 0 {
            return Err(ChartError::InvalidConfig(
                "line_width must be positive".to_string(),
            ));
        }

        if self.histogram.target_bins == 0 {
            return Err(ChartError::InvalidConfig(
                "target_bins must be positive".to_string(),
            ));
        }

        let sawtooth = &self.histogram.sawtooth;
        if sawtooth.checks.is_empty() {
            return Err(ChartError::InvalidConfig(
                "sawtooth.checks must not be empty".to_string(),
            ));
        }
        for check in &sawtooth.checks {
            if check.period < 2 {
                return Err(ChartError::InvalidConfig(format!(
                    "sawtooth period must be at least 2, got {}",
                    check.period
                )));
            }
            if check.offset >= check.period {
                return Err(ChartError::InvalidConfig(format!(
                    "sawtooth offset {} must be below its period {}",
                    check.offset, check.period
                )));
            }
        }

        if !(self.boxplot.iqr_multiplier > 0.0) {
            return Err(ChartError::InvalidConfig(
                "iqr_multiplier must be positive".to_string(),
            ));
        }

        if !(self.axis.pad_fraction > 0.0 && self.axis.pad_fraction < 1.0) {
            return Err(ChartError::InvalidConfig(
                "pad_fraction must be between 0.0 and 1.0".to_string(),
            ));
        }

        if !(self.axis.snap_ratio >= 0.0) {
            return Err(ChartError::InvalidConfig(
                "snap_ratio must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChartConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.limits.max_charts, 16);
        assert_eq!(config.histogram.sawtooth.checks.len(), 3);
        assert_eq!(config.boxplot.whisker_policy, WhiskerPolicy::Iqr1_5);
    }

    #[test]
    fn test_json_serialization() {
        let config = ChartConfig::default();
        let json = config.to_json().unwrap();
        let parsed = ChartConfig::from_json(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ChartConfig::from_json(r#"{"limits": {"max_series": 12}}"#).unwrap();
        assert_eq!(config.limits.max_series, 12);
        assert_eq!(config.limits.max_charts, 16);
        assert_eq!(config.axis.pad_fraction, 0.1);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_loading() {
        let toml_str = r#"
[boxplot]
whisker_policy = "hide_outliers"

[histogram.sawtooth]
min_bins = 8
checks = [{ period = 3, offset = 0 }]
"#;
        let config = ChartConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.boxplot.whisker_policy, WhiskerPolicy::HideOutliers);
        assert_eq!(config.boxplot.iqr_multiplier, 1.5);
        assert_eq!(config.histogram.sawtooth.min_bins, 8);
        assert_eq!(
            config.histogram.sawtooth.checks,
            vec![SawtoothCheck { period: 3, offset: 0 }]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            ChartConfig::from_json("{not json"),
            Err(ChartError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let mut config = ChartConfig::default();
        config.limits.max_categories = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_categories"));
    }

    #[test]
    fn test_invalid_sawtooth_checks() {
        let mut config = ChartConfig::default();
        config.histogram.sawtooth.checks = vec![SawtoothCheck { period: 2, offset: 2 }];
        assert!(config.validate().is_err());

        config.histogram.sawtooth.checks = vec![SawtoothCheck { period: 1, offset: 0 }];
        assert!(config.validate().is_err());

        config.histogram.sawtooth.checks.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_padding() {
        let mut config = ChartConfig::default();
        config.axis.pad_fraction = 1.5;
        assert!(config.validate().is_err());
        config.axis.pad_fraction = 0.1;
        config.boxplot.iqr_multiplier = 0.0;
        assert!(config.validate().is_err());
    }
}
