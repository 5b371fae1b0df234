//! Dashboard configuration.
//!
//! Loaded from a TOML file (default `sealevel.toml`). Every field has a
//! default, so a missing file yields a working configuration. A handful of
//! `SEALEVEL_*` environment variables (optionally from `.env`) override the
//! file; the lookup is injected so tests never touch the process environment.

use crate::logging::LogLevel;
use crate::model::{DashboardError, SelectionState, ALL, DEFAULT_YEAR_CUTOFF};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "sealevel.toml";

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV or spreadsheet path.
    pub path: PathBuf,
    /// Rows with a later year are placeholders and never aggregated.
    pub year_cutoff: i32,
    /// Abort the load on the first malformed row instead of isolating it.
    pub strict: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/sea_levels_with_years.csv"),
            year_cutoff: DEFAULT_YEAR_CUTOFF,
            strict: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardSection {
    pub title: String,
    pub output_dir: PathBuf,
    /// Enables the data-source picker alongside the region picker.
    pub source_filter: bool,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            title: "Rising Waters: A Closer Look at Sea Level Changes".to_string(),
            output_dir: PathBuf::from("dist"),
            source_filter: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub region: String,
    pub source: String,
    /// Initial cross-filter region for the volatility chart.
    pub active_measure: Option<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            region: crate::model::ALL.to_string(),
            source: crate::model::ALL.to_string(),
            active_measure: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl LoggingConfig {
    /// Parsed level; unknown spellings fall back to `Info`.
    pub fn min_level(&self) -> LogLevel {
        self.level.parse().unwrap_or(LogLevel::Info)
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataConfig,
    pub dashboard: DashboardSection,
    pub selection: SelectionConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl DashboardConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, DashboardError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(DashboardError::Io(e)),
        }
    }

    /// Applies `SEALEVEL_*` overrides. `lookup` is normally `std::env::var`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("SEALEVEL_DATA") {
            self.data.path = PathBuf::from(path);
        }
        if let Some(region) = lookup("SEALEVEL_REGION") {
            self.selection.region = region;
        }
        if let Some(source) = lookup("SEALEVEL_SOURCE") {
            self.selection.source = source;
        }
        if let Some(measure) = lookup("SEALEVEL_MEASURE") {
            self.selection.active_measure = Some(measure);
        }
        if let Some(dir) = lookup("SEALEVEL_OUTPUT_DIR") {
            self.dashboard.output_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup("SEALEVEL_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// The sidebar state this configuration asks for. The source picker is
    /// forced to `All` unless source filtering is enabled.
    pub fn selection_state(&self) -> SelectionState {
        let source = if self.dashboard.source_filter {
            self.selection.source.as_str()
        } else {
            ALL
        };
        SelectionState::new(&self.selection.region, source)
    }
}

/// Loads `.env`, resolves the config path, reads the file, and applies the
/// process environment on top.
pub fn load_from_env(explicit_path: Option<&str>) -> Result<(DashboardConfig, PathBuf), DashboardError> {
    dotenv::dotenv().ok();

    let path = explicit_path
        .map(PathBuf::from)
        .or_else(|| std::env::var("SEALEVEL_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = DashboardConfig::load(&path)?;
    config.apply_overrides(|key| std::env::var(key).ok());
    Ok((config, path))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Choice;
    use std::collections::HashMap;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = DashboardConfig::from_toml_str("").expect("empty TOML is valid");
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.data.year_cutoff, 2024);
        assert!(!config.data.strict);
        assert!(!config.dashboard.source_filter);
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let config = DashboardConfig::from_toml_str(
            r#"
            [data]
            path = "sea.xlsx"

            [selection]
            region = "Baltic Sea"
            "#,
        )
        .unwrap();
        assert_eq!(config.data.path, PathBuf::from("sea.xlsx"));
        assert_eq!(config.data.year_cutoff, 2024);
        assert_eq!(config.selection.region, "Baltic Sea");
        assert_eq!(config.selection.source, "All");
        assert_eq!(config.dashboard.output_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_malformed_document_is_config_error() {
        let result = DashboardConfig::from_toml_str("[data\npath = 3");
        assert!(matches!(result, Err(DashboardError::Config(_))), "got {:?}", result);
    }

    #[test]
    fn test_wrong_field_type_is_config_error() {
        let result = DashboardConfig::from_toml_str("[data]\nyear_cutoff = \"soon\"");
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = DashboardConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let env: HashMap<&str, &str> = [
            ("SEALEVEL_DATA", "other.csv"),
            ("SEALEVEL_REGION", "Indian Ocean"),
            ("SEALEVEL_MEASURE", "Yellow Sea"),
            ("SEALEVEL_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = DashboardConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.data.path, PathBuf::from("other.csv"));
        assert_eq!(config.selection.region, "Indian Ocean");
        assert_eq!(config.selection.active_measure.as_deref(), Some("Yellow Sea"));
        assert_eq!(config.logging.min_level(), LogLevel::Debug);
        assert_eq!(config.selection.source, "All", "unset keys leave values alone");
    }

    #[test]
    fn test_source_choice_ignored_when_source_filter_disabled() {
        let mut config = DashboardConfig::default();
        config.selection.source = "Jason.1".to_string();
        assert_eq!(config.selection_state().source, Choice::All);

        config.dashboard.source_filter = true;
        assert_eq!(
            config.selection_state().source,
            Choice::Only("Jason.1".to_string())
        );
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let logging = LoggingConfig {
            level: "chatty".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(logging.min_level(), LogLevel::Info);
    }
}
