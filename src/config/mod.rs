use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::utils::{
    app_data_dir, config_file_in, data_dir_in, ensure_dir, export_dir_in, write_atomic,
};
use crate::errors::{Result, StoreError};

const DEFAULT_RETENTION: usize = 5;

/// User preferences persisted next to the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    /// Prefix applied by presentation code; the core itself never formats money.
    pub currency_symbol: String,
    /// Snapshots kept per collection by the file backend.
    pub backup_retention: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-IN".into(),
            currency_symbol: "₹".into(),
            backup_retention: DEFAULT_RETENTION,
            export_dir: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.backup_retention == 0 {
            return Err(StoreError::Config(
                "backup_retention must be at least 1".into(),
            ));
        }
        if self.currency_symbol.trim().is_empty() {
            return Err(StoreError::Config("currency_symbol must not be empty".into()));
        }
        Ok(())
    }
}

/// Loads and saves [`Config`] and resolves the directories derived from the base dir.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    /// Reads the config file, falling back to defaults when it does not exist yet.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data_dir(&self) -> PathBuf {
        data_dir_in(&self.base)
    }

    /// Export destination: the configured override, else `<base>/exports`.
    pub fn export_dir(&self, config: &Config) -> PathBuf {
        config
            .export_dir
            .clone()
            .unwrap_or_else(|| export_dir_in(&self.base))
    }
}
