//! Application configuration loaded from a TOML file.

use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::{Result, SalesInsightError};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path (or `:memory:`) of the SQLite sales ledger.
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// How many entries each ranked chart shows.
    pub top_n: usize,
    /// Number of future months the forecast covers.
    pub forecast_periods: usize,
    /// Minimum number of observed months required before forecasting.
    pub min_history_months: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            report: ReportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sales.db".into(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            forecast_periods: 6,
            min_history_months: 6,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            SalesInsightError::Config(format!(
                "failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| SalesInsightError::Config(format!("failed to parse config: {e}")))?;

        config.validate()?;

        Ok(config)
    }

    /// Like [`AppConfig::load`], but a missing file yields the defaults so the
    /// tool works out of the box.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            debug!(
                "No config file at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            return Err(SalesInsightError::Config(
                "database.url cannot be empty".into(),
            ));
        }
        if self.report.top_n == 0 {
            return Err(SalesInsightError::Config(
                "report.top_n must be at least 1".into(),
            ));
        }
        if self.report.forecast_periods == 0 {
            return Err(SalesInsightError::Config(
                "report.forecast_periods must be at least 1".into(),
            ));
        }
        // The trend fit needs two points; anything below that is meaningless.
        if self.report.min_history_months < 2 {
            return Err(SalesInsightError::Config(
                "report.min_history_months must be at least 2".into(),
            ));
        }
        Ok(())
    }
}
