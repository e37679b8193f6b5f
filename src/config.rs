//! Report Configuration Module
//! Named, overridable parameters for the data source, filters, adjustment and charts.

use crate::data::Disposition;
use crate::stats::{Adjustment, AdjustmentPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Optional override file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "conviction_report.json";

pub const DEFAULT_SOURCE_URL: &str = "https://raw.githubusercontent.com/phillydao/phillydao-public-data/master/docs/data/court_outcomes/daily_court_outcomes.csv";
pub const DEFAULT_TARGET_YEAR: i32 = 2019;
pub const DEFAULT_OUTLIER_CASE_COUNT: u64 = 36;
pub const DEFAULT_YEAR_CUTOFF: i32 = 2019;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Source column names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub date: String,
    pub disposition: String,
    pub count: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "date_value".to_string(),
            disposition: "dispoType".to_string(),
            count: "Aggravated.Assault.Gun".to_string(),
        }
    }
}

/// Source labels for the two dispositions in scope.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispositionLabels {
    pub guilty: String,
    pub not_guilty: String,
}

impl Default for DispositionLabels {
    fn default() -> Self {
        Self {
            guilty: "Guilty".to_string(),
            not_guilty: "Not Guilty/Acquittal".to_string(),
        }
    }
}

impl DispositionLabels {
    pub fn label(&self, disposition: Disposition) -> &str {
        match disposition {
            Disposition::Guilty => &self.guilty,
            Disposition::NotGuiltyAcquittal => &self.not_guilty,
        }
    }

    /// Map a raw source label onto a disposition, `None` when out of scope.
    pub fn classify(&self, raw: &str) -> Option<Disposition> {
        if raw == self.guilty {
            Some(Disposition::Guilty)
        } else if raw == self.not_guilty {
            Some(Disposition::NotGuiltyAcquittal)
        } else {
            None
        }
    }
}

/// Chart appearance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub x_label: String,
    pub y_label: String,
    pub caption: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            x_label: "Year".to_string(),
            y_label: "Percent of Aggravated Assault/Gun Trials".to_string(),
            caption: "Source: District Attorney's Office public court outcomes data".to_string(),
        }
    }
}

/// One chart to produce.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantConfig {
    /// File stem for the outputs.
    pub name: String,
    pub title: String,
    pub policy: AdjustmentPolicy,
}

/// Full report configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// `http(s)://` URL or local CSV path.
    pub source: String,
    pub columns: ColumnNames,
    pub labels: DispositionLabels,
    pub year_start: Option<i32>,
    pub year_cutoff: i32,
    pub target_year: i32,
    pub outlier_case_count: u64,
    pub output_dir: PathBuf,
    pub chart: ChartStyle,
    pub variants: Vec<VariantConfig>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let base_title = "Aggravated Assault/Gun Trial Outcomes by Year";
        Self {
            source: DEFAULT_SOURCE_URL.to_string(),
            columns: ColumnNames::default(),
            labels: DispositionLabels::default(),
            year_start: None,
            year_cutoff: DEFAULT_YEAR_CUTOFF,
            target_year: DEFAULT_TARGET_YEAR,
            outlier_case_count: DEFAULT_OUTLIER_CASE_COUNT,
            output_dir: PathBuf::from("output"),
            chart: ChartStyle::default(),
            variants: vec![
                VariantConfig {
                    name: "observed".to_string(),
                    title: base_title.to_string(),
                    policy: AdjustmentPolicy::None,
                },
                VariantConfig {
                    name: "removed".to_string(),
                    title: format!("{base_title} (Outlier Trials Removed)"),
                    policy: AdjustmentPolicy::Remove,
                },
                VariantConfig {
                    name: "reassigned".to_string(),
                    title: format!("{base_title} (Outlier Cases Counted as Guilty)"),
                    policy: AdjustmentPolicy::Reassign,
                },
            ],
        }
    }
}

impl ReportConfig {
    /// Load overrides from `path`; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Use the override file in `dir` when present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            log::info!("Loading configuration from {}", path.display());
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve a named policy into the concrete adjustment it applies.
    pub fn adjustment_for(&self, policy: AdjustmentPolicy) -> Option<Adjustment> {
        policy.resolve(self.target_year, self.outlier_case_count)
    }
}
