use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SHEET_SIEVE_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "sheet-sieve.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    #[default]
    Single,
    Merged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Rows of the raw sheet shown before a header is chosen.
    pub raw_preview_rows: usize,
    /// Rows shown for the named table and for filter results.
    pub table_preview_rows: usize,
    pub default_export_name: String,
    pub default_header_mode: HeaderMode,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            raw_preview_rows: 10,
            table_preview_rows: 200,
            default_export_name: "filtered.xlsx".to_string(),
            default_header_mode: HeaderMode::Single,
        }
    }
}

/// Read a config file; missing keys take their defaults.
pub fn load_config_from_path(path: &Path) -> Result<ViewerConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Resolve the config: the explicit path, else `$SHEET_SIEVE_CONFIG`, else
/// `sheet-sieve.json` in the working directory, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<ViewerConfig> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .or_else(|| {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            local.exists().then_some(local)
        });

    match path {
        Some(path) => {
            let config = load_config_from_path(&path)?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(ViewerConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{ "raw_preview_rows": 25, "default_header_mode": "merged" }"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.raw_preview_rows, 25);
        assert_eq!(config.default_header_mode, HeaderMode::Merged);
        assert_eq!(config.table_preview_rows, 200);
        assert_eq!(config.default_export_name, "filtered.xlsx");
    }

    #[test]
    fn test_malformed_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_config_from_path(&path).is_err());
    }
}
