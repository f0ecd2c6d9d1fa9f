//! Runtime configuration for the analysis tools.
//!
//! Every field has a default matching the file names and thresholds used on
//! the bench, so the tools run without a config file. A JSON file only needs
//! to contain the fields it overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::GasClass;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathConfig,
    pub baseline: BaselineConfig,
    pub relabel: RelabelConfig,
    pub training: TrainingConfig,
}

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub baseline_log: PathBuf,
    pub baseline_plot: PathBuf,
    pub smoke_log: PathBuf,
    pub cleaned_csv: PathBuf,
    pub verified_plot: PathBuf,
    pub dashboard_csv: PathBuf,
    pub dashboard_plot: PathBuf,
    pub training_plot: PathBuf,
    /// Training sources in iteration order.
    pub sources: Vec<SourceConfig>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            baseline_log: PathBuf::from("alcohol.txt"),
            baseline_plot: PathBuf::from("baseline_diagnostics.png"),
            smoke_log: PathBuf::from("somke.txt"),
            cleaned_csv: PathBuf::from("cleaned_labeled_smoke_data.csv"),
            verified_plot: PathBuf::from("final_verified_plot.png"),
            dashboard_csv: PathBuf::from("MQ7_PM25_data.csv"),
            dashboard_plot: PathBuf::from("sensor_data_visualization.png"),
            training_plot: PathBuf::from("training_process.png"),
            sources: default_sources(),
        }
    }
}

/// One labeled CSV feeding the trainer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub path: PathBuf,
}

impl SourceConfig {
    pub fn new(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
        }
    }

    /// Class that a `Label == 1` row of this source is promoted to.
    /// `None` means the source is treated as background data and every row
    /// becomes [`GasClass::Normal`].
    pub fn flagged_class(&self) -> Option<GasClass> {
        match self.name.as_str() {
            "MQ7" => Some(GasClass::Smoke),
            "MQ4" => Some(GasClass::Gas),
            "Alcohol" => Some(GasClass::Alcohol),
            "MQ136" => Some(GasClass::Sulfide),
            _ => None,
        }
    }
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new("Normal", "normaml_data.csv"),
        SourceConfig::new("MQ7", "MQ7_MQ135_PM25.csv"),
        SourceConfig::new("MQ4", "MQ4_data.csv"),
        SourceConfig::new("Alcohol", "alcohol_data.csv"),
        SourceConfig::new("MQ136", "MQ136_data.csv"),
        SourceConfig::new("Env", "TepHum_data.csv"),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    /// Token that follows the `]` of every received-data line.
    pub marker: String,
    /// Fraction of the lowest readings averaged into the baseline.
    pub quantile: f64,
    pub histogram_bins: usize,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            marker: "收←◆".to_string(),
            quantile: 0.1,
            histogram_bins: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelabelConfig {
    /// MQ4 must exceed this for the probe to count as attached.
    pub contact_gas_min: f64,
    /// PM2.5 must exceed this for the probe to count as attached.
    pub contact_pm_min: f64,
    /// MQ7 above this marks an alarm.
    pub alarm_threshold: f64,
}

impl Default for RelabelConfig {
    fn default() -> Self {
        Self {
            contact_gas_min: 200.0,
            contact_pm_min: 50.0,
            alarm_threshold: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub rounds: usize,
    pub test_fraction: f64,
    pub seed: u64,
    pub report_every: usize,
    /// `None` grows every tree until its leaves are pure.
    pub max_depth: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            rounds: 50,
            test_fraction: 0.2,
            seed: 42,
            report_every: 5,
            max_depth: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Config {
    /// Load configuration from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bench_constants() {
        let config = Config::default();
        assert_eq!(config.relabel.contact_gas_min, 200.0);
        assert_eq!(config.relabel.contact_pm_min, 50.0);
        assert_eq!(config.relabel.alarm_threshold, 1000.0);
        assert_eq!(config.training.rounds, 50);
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.training.max_depth, None);
        assert_eq!(config.paths.sources.len(), 6);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "relabel": { "alarm_threshold": 800.0 } }"#).unwrap();
        assert_eq!(config.relabel.alarm_threshold, 800.0);
        assert_eq!(config.relabel.contact_gas_min, 200.0);
        assert_eq!(config.baseline.marker, "收←◆");
        assert_eq!(
            config.paths.cleaned_csv,
            PathBuf::from("cleaned_labeled_smoke_data.csv")
        );
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.training.test_fraction, 0.2);
    }

    #[test]
    fn only_known_sources_are_promoted() {
        assert_eq!(
            SourceConfig::new("MQ7", "a.csv").flagged_class(),
            Some(GasClass::Smoke)
        );
        assert_eq!(
            SourceConfig::new("MQ136", "a.csv").flagged_class(),
            Some(GasClass::Sulfide)
        );
        assert_eq!(SourceConfig::new("Env", "a.csv").flagged_class(), None);
    }
}
