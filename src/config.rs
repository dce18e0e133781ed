//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/chargeslot/config.toml`).
//! Every field has a default, so a missing file or a partial one is fine.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DomainResult, SlotSchedule};

pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// `~/.config/chargeslot/config.toml`, falling back to the working directory
/// when no config dir can be determined.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("chargeslot"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub booking: BookingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight work on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./chargeslot.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_issuer: "chargeslot".to_string(),
            jwt_expiration_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Length of one slot unit in minutes
    pub slot_minutes: u32,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    /// Bookable dates are today ..= today + admission_days
    pub admission_days: u32,
    /// Create bookings directly as confirmed
    pub auto_confirm: bool,
    /// Attempts for a status transition that lost a race
    pub transition_attempts: u32,
    /// Interval of the completion sweep; 0 disables it
    pub completion_sweep_secs: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slot_minutes: 30,
            opening_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN),
            closing_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            admission_days: 2,
            auto_confirm: false,
            transition_attempts: 3,
            completion_sweep_secs: 0,
        }
    }
}

impl BookingConfig {
    pub fn schedule(&self) -> DomainResult<SlotSchedule> {
        SlotSchedule::new(self.opening_time, self.closing_time, self.slot_minutes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive; `RUST_LOG` takes precedence
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load and validate. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("security.jwt_secret is empty".into()));
        }
        if self.booking.transition_attempts == 0 {
            return Err(ConfigError::Invalid(
                "booking.transition_attempts must be at least 1".into(),
            ));
        }
        self.booking
            .schedule()
            .map_err(|e| ConfigError::Invalid(format!("booking: {}", e)))?;
        Ok(())
    }

    pub fn uses_default_secret(&self) -> bool {
        self.security.jwt_secret == DEFAULT_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.booking.slot_minutes, 30);
        assert_eq!(cfg.booking.admission_days, 2);
        assert!(!cfg.booking.auto_confirm);
        assert_eq!(cfg.booking.schedule().unwrap().windows().len(), 32);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9100

            [booking]
            opening_time = "08:00:00"
            auto_confirm = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(
            cfg.booking.opening_time,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap()
        );
        assert!(cfg.booking.auto_confirm);
        assert_eq!(cfg.booking.slot_minutes, 30);
    }

    #[test]
    fn inverted_opening_hours_are_rejected() {
        let mut cfg = AppConfig::default();
        cfg.booking.opening_time = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = AppConfig::load(Path::new("/nonexistent/chargeslot/config.toml")).unwrap();
        assert_eq!(cfg.server.port, 8080);
    }
}
