//! Application configuration

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_with::serde_as;

use crate::errors::AppError;

/// Default calendar slot length in seconds
const DEFAULT_SLOT_SECONDS: u64 = 2 * 60 * 60;
/// Longest accepted default slot, one week
const MAX_SLOT_SECONDS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub seed: SeedConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    /// JSON seed file, built-in seed data is used if unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct CalendarConfig {
    /// Booking length used when a submitted booking has no end time
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub default_slot: Duration,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("calendar.default_slot", DEFAULT_SLOT_SECONDS)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                Environment::with_prefix("BOATBOOKING")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), AppError> {
        self.seed.validate()?;
        self.calendar.validate()?;
        Ok(())
    }
}

impl SeedConfig {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(path) = &self.path {
            if !path.is_file() {
                return Err(AppError::ConfigurationError {
                    message: format!("Seed file {} does not exist", path.display()),
                });
            }
        }
        Ok(())
    }
}

impl CalendarConfig {
    fn validate(&self) -> Result<(), AppError> {
        if self.default_slot.is_zero() {
            return Err(AppError::ConfigurationError {
                message: "Default slot must be greater than zero".to_string(),
            });
        }
        if self.default_slot.as_secs() > MAX_SLOT_SECONDS {
            return Err(AppError::ConfigurationError {
                message: format!(
                    "Default slot must not exceed {} seconds, got {}",
                    MAX_SLOT_SECONDS,
                    self.default_slot.as_secs()
                ),
            });
        }
        Ok(())
    }

    /// Default slot as a calendar duration
    pub fn slot_length(&self) -> Result<chrono::Duration, AppError> {
        chrono::Duration::from_std(self.default_slot).map_err(|e| {
            AppError::ConfigurationError {
                message: format!("Default slot out of range: {}", e),
            }
        })
    }
}
