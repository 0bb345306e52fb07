//! Run configuration.
//!
//! A [`Config`] is built once at start-up from built-in defaults, an optional
//! JSON file and command-line overrides, then passed explicitly to the
//! aggregation and reporting stages.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Every option the pipeline recognises.
///
/// Stored on disk as a JSON object; any omitted key falls back to its default:
/// ```json
/// {
///   "companies_file_path": "data/company_master.csv",
///   "target_year": "2016",
///   "top_n": 10
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub companies_file_path: PathBuf,
    pub zipcode_file_path: PathBuf,
    pub output_plot_path: PathBuf,
    pub target_year: String,
    pub top_n: usize,

    pub zip_column: String,
    pub district_column: String,
    pub date_column: String,
    pub address_column: String,

    /// Open the rendered chart in a viewer when a display is attached.
    pub show_plot: bool,
    /// Where to export the ranked table, if anywhere.
    pub csv_output_path: Option<PathBuf>,
    pub chart_title: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            companies_file_path: PathBuf::from("data/company_master.csv"),
            zipcode_file_path: PathBuf::from("data/zipcode.csv"),
            output_plot_path: PathBuf::from("plots/registrations_2015_by_district.png"),
            target_year: "2015".to_string(),
            top_n: 15,
            zip_column: "ZipCode".to_string(),
            district_column: "District".to_string(),
            date_column: "CompanyRegistrationdate_date".to_string(),
            address_column: "Registered_Office_Address".to_string(),
            show_plot: true,
            csv_output_path: None,
            chart_title: None,
        }
    }
}

impl Config {
    /// Loads a config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.top_n == 0 {
            return Err(PipelineError::InvalidConfig(
                "top_n must be at least 1".to_string(),
            ));
        }
        if self.target_year.chars().count() != 4 {
            return Err(PipelineError::InvalidConfig(format!(
                "target_year must be 4 characters, got '{}'",
                self.target_year
            )));
        }
        Ok(())
    }

    /// The chart title, falling back to one derived from `top_n` and the year.
    pub fn title(&self) -> String {
        self.chart_title.clone().unwrap_or_else(|| {
            format!(
                "Top {} Districts by Company Registrations ({})",
                self.top_n, self.target_year
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_match_original_constants() {
        let config = Config::default();
        assert_eq!(config.target_year, "2015");
        assert_eq!(config.top_n, 15);
        assert_eq!(config.zip_column, "ZipCode");
        assert_eq!(config.address_column, "Registered_Office_Address");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_title() {
        let config = Config::default();
        assert_eq!(
            config.title(),
            "Top 15 Districts by Company Registrations (2015)"
        );
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "target_year": "2016", "top_n": 5 }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.target_year, "2016");
        assert_eq!(config.top_n, 5);
        assert_eq!(config.zipcode_file_path, PathBuf::from("data/zipcode.csv"));
        assert!(config.show_plot);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_top_n() {
        let config = Config {
            top_n: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_year_length() {
        let config = Config {
            target_year: "15".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
