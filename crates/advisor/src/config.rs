//! Service configuration

use advisor_lib::EngineConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an optional configuration file
pub const CONFIG_FILE_ENV: &str = "ADVISOR_CONFIG";

/// Node advisor service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// HTTP port for the API, health and metrics
    #[serde(default = "default_port")]
    pub port: u16,

    /// Inventory and metrics snapshot
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Analysis history document
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,

    /// Instance catalog override; the built-in table is used when unset
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_port() -> u16 {
    8080
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/snapshot.json")
}

fn default_history_path() -> PathBuf {
    PathBuf::from("data/analysis_history.json")
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            snapshot_path: default_snapshot_path(),
            history_path: default_history_path(),
            catalog_path: None,
            engine: EngineConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load from the file named by `ADVISOR_CONFIG` and `ADVISOR_*` variables
    ///
    /// Nested keys use a double underscore, e.g. `ADVISOR_ENGINE__HEADROOM_PERCENT`.
    pub fn load() -> Result<Self> {
        let file = std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from);
        Self::load_from(file.as_deref())
    }

    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("ADVISOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read advisor configuration")?;

        config
            .try_deserialize()
            .context("Invalid advisor configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();

        assert_eq!(config.port, 8080);
        assert_eq!(config.history_path, PathBuf::from("data/analysis_history.json"));
        assert!(config.catalog_path.is_none());
        assert_eq!(config.engine.history_limit, 10);
    }

    #[test]
    fn test_load_from_file_with_partial_engine() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "port": 9191,
                "snapshot_path": "/var/lib/advisor/snapshot.json",
                "engine": {{ "headroom_percent": 30.0, "history_best_effort": false }}
            }}"#
        )
        .unwrap();

        let config = ServiceConfig::load_from(Some(file.path())).unwrap();

        assert_eq!(config.port, 9191);
        assert_eq!(
            config.snapshot_path,
            PathBuf::from("/var/lib/advisor/snapshot.json")
        );
        assert_eq!(config.engine.headroom_percent, 30.0);
        assert!(!config.engine.history_best_effort);
        assert_eq!(config.engine.hours_per_month, 730.0);
        assert_eq!(config.engine.thresholds.heavily_oversized.avg_max, 25.0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = ServiceConfig::load_from(Some(Path::new("/nonexistent/advisor.json")));
        assert!(result.is_err());
    }
}
