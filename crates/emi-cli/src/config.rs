//! CLI configuration
//!
//! Loaded from a TOML file (`emi.toml` by default). Every key is optional;
//! command-line flags take precedence over file values.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use emi_core::format::CurrencyFormat;
use emi_core::report::{ReportOptions, DEFAULT_PREVIEW_PERIODS};

pub const DEFAULT_CONFIG_PATH: &str = "emi.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Invalid preview_periods: must be at least 1")]
    InvalidPreview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Report branding section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub title: Option<String>,
    pub company: Option<String>,
    pub footer_lines: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmiConfig {
    pub log_level: LogLevel,
    pub preview_periods: usize,
    pub currency: CurrencyFormat,
    pub report: ReportSection,
}

impl Default for EmiConfig {
    fn default() -> Self {
        EmiConfig {
            log_level: LogLevel::default(),
            preview_periods: DEFAULT_PREVIEW_PERIODS,
            currency: CurrencyFormat::default(),
            report: ReportSection::default(),
        }
    }
}

impl EmiConfig {
    /// Load configuration.
    ///
    /// With no explicit path, a missing `emi.toml` yields defaults; an
    /// explicitly named file must exist.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        if !Path::new(path).exists() {
            return if explicit {
                Err(ConfigError::NotFound(path.to_string()))
            } else {
                Ok(EmiConfig::default())
            };
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("{path}: {e}")))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: EmiConfig =
            toml::from_str(contents).map_err(|e| ConfigError::FileError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.preview_periods == 0 {
            return Err(ConfigError::InvalidPreview);
        }
        Ok(())
    }

    /// Report options from config, with an optional preview override.
    pub fn report_options(&self, preview_override: Option<usize>) -> ReportOptions {
        let defaults = ReportOptions::default();
        ReportOptions {
            title: self.report.title.clone().unwrap_or(defaults.title),
            company: self.report.company.clone().unwrap_or(defaults.company),
            footer_lines: self.report.footer_lines.clone(),
            preview_periods: preview_override.unwrap_or(self.preview_periods),
            currency: self.currency.clone(),
        }
    }
}
