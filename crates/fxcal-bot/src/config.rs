//! Application configuration.

use std::path::Path;

use fxcal_notify::NotifierConfig;
use fxcal_scrape::{default_quote_sources, CalendarConfig, HttpConfig, QuoteSource};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Calendar page, driver and selectors.
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// Quote pages, rendered in order in the indicator table.
    #[serde(default = "default_quote_sources")]
    pub quotes: Vec<QuoteSource>,
    /// Shared HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
    /// Webhook endpoint and key lookup.
    #[serde(default)]
    pub notifier: NotifierConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            calendar: CalendarConfig::default(),
            quotes: default_quote_sources(),
            http: HttpConfig::default(),
            notifier: NotifierConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `config/default.toml` is
    /// used if present, built-in defaults otherwise.
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => {
                tracing::warn!(path = DEFAULT_CONFIG_PATH, "Config file not found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every run fail.
    pub fn validate(&self) -> AppResult<()> {
        if self.calendar.url.trim().is_empty() {
            return Err(AppError::Config("calendar.url is empty".to_string()));
        }
        if self.calendar.page_load_timeout_ms == 0 || self.calendar.row_wait_timeout_ms == 0 {
            return Err(AppError::Config(
                "calendar timeouts must be greater than zero".to_string(),
            ));
        }
        if let Some(source) = self
            .quotes
            .iter()
            .find(|q| q.url.trim().is_empty() || q.selector.trim().is_empty())
        {
            return Err(AppError::Config(format!(
                "quote {:?} needs both url and selector",
                source.label
            )));
        }
        Ok(())
    }
}
