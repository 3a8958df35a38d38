use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::forecast::validate_horizon;
use crate::models::ForecastMethod;

const CONFIG_FILE: &str = "config.json";
const DB_FILE: &str = "salescast.db";

/// Environment variable that overrides the database location.
pub(crate) const DB_ENV: &str = "SALESCAST_DB";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) db_path: Option<PathBuf>,
    pub(crate) default_horizon: u32,
    pub(crate) default_method: ForecastMethod,
    pub(crate) currency_symbol: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            default_horizon: 6,
            default_method: ForecastMethod::Regression,
            currency_symbol: "₹".into(),
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&data)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        validate_horizon(config.default_horizon)
            .with_context(|| format!("Invalid default_horizon in {}", path.display()))?;
        Ok(config)
    }

    /// Database location: `SALESCAST_DB`, then the config file, then `data_dir`.
    pub(crate) fn resolve_db_path(&self, env_override: Option<PathBuf>, data_dir: &Path) -> PathBuf {
        env_override
            .or_else(|| self.db_path.clone())
            .unwrap_or_else(|| data_dir.join(DB_FILE))
    }
}

/// Per-user directories for the config file and the database.
pub(crate) struct Dirs {
    pub(crate) config_file: PathBuf,
    pub(crate) data_dir: PathBuf,
}

impl Dirs {
    pub(crate) fn discover() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "salescast", "SalesCast")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        Ok(Self {
            config_file: proj_dirs.config_dir().join(CONFIG_FILE),
            data_dir,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
