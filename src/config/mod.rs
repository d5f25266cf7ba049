//! Presentation preferences persisted between CLI runs.

use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    currency::{CurrencyCode, DateFormatStyle, LocaleConfig},
    errors::{BudgetError, Result},
    utils::paths::{app_data_dir, config_file_in, ensure_dir},
};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "default_date_format")]
    pub date_format: DateFormatStyle,
}

fn default_date_format() -> DateFormatStyle {
    DateFormatStyle::Medium
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            date_format: default_date_format(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 3] = ["locale", "currency", "date_format"];

    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig {
            date_format: self.date_format,
            ..LocaleConfig::for_tag(&self.locale)
        }
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(self.currency.as_str())
    }

    /// Updates one preference from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "locale" => {
                if value.is_empty() {
                    return Err(BudgetError::ConfigError("locale cannot be empty".into()));
                }
                self.locale = value.to_string();
            }
            "currency" => {
                if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(BudgetError::ConfigError(format!(
                        "currency `{}` is not a three-letter ISO code",
                        value
                    )));
                }
                self.currency = value.to_ascii_uppercase();
            }
            "date_format" => {
                self.date_format = match value.to_ascii_lowercase().as_str() {
                    "short" => DateFormatStyle::Short,
                    "medium" => DateFormatStyle::Medium,
                    "long" => DateFormatStyle::Long,
                    other => {
                        return Err(BudgetError::ConfigError(format!(
                            "date_format `{}` must be short, medium, or long",
                            other
                        )))
                    }
                };
            }
            other => {
                return Err(BudgetError::ConfigError(format!(
                    "unknown setting `{}` (expected one of: {})",
                    other,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        let path = config_file_in(&base);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self { path })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            debug!(path = %self.path.display(), "no config file; using defaults");
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}
