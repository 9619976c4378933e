use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    currency::{CurrencyCode, LocaleConfig},
    errors::{BudgetError, Result},
    storage::csv_backend::{DEFAULT_CATALOG_FILE, DEFAULT_LEDGER_FILE},
    utils::paths::{config_file_in, resolve_base, write_atomic},
};

const DEFAULT_STAGES: [&str; 9] = [
    "Preliminary Services",
    "Design",
    "Foundation",
    "Fabrication",
    "Handling",
    "Transport",
    "Assembly",
    "Finishing",
    "Administrative",
];

const DEFAULT_SUPPLIERS: [&str; 2] = ["Aguas de Joinville", "YUMA"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Known stages, in report order.
    pub stages: Vec<String>,
    /// Suppliers offered for new expenses; others are accepted but flagged.
    pub suppliers: Vec<String>,
    pub currency: CurrencyCode,
    pub locale: LocaleConfig,
    pub catalog_file: String,
    pub ledger_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stages: DEFAULT_STAGES.iter().map(|stage| stage.to_string()).collect(),
            suppliers: DEFAULT_SUPPLIERS
                .iter()
                .map(|supplier| supplier.to_string())
                .collect(),
            currency: CurrencyCode::default(),
            locale: LocaleConfig::default(),
            catalog_file: DEFAULT_CATALOG_FILE.into(),
            ledger_file: DEFAULT_LEDGER_FILE.into(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.catalog_file.trim().is_empty() || self.ledger_file.trim().is_empty() {
            return Err(BudgetError::Config("resource file names must not be empty".into()));
        }
        if self.catalog_file == self.ledger_file {
            return Err(BudgetError::Config(
                "catalog and ledger must use different files".into(),
            ));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_base_dir(resolve_base(None))
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            path: config_file_in(&base),
            base,
        }
    }

    /// Returns defaults when no configuration file exists yet.
    pub fn load(&self) -> Result<Config> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no config file; using defaults");
                return Ok(Config::default());
            }
            Err(err) => {
                return Err(BudgetError::Config(format!(
                    "cannot read `{}`: {err}",
                    self.path.display()
                )))
            }
        };
        let config: Config = serde_json::from_str(&data).map_err(|err| {
            BudgetError::Config(format!("invalid `{}`: {err}", self.path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| BudgetError::Config(err.to_string()))?;
        write_atomic(&self.path, &json)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
