//! Configuration management with file persistence

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Notejam configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseSettings,
    pub recovery: RecoverySettings,
    pub mail: MailSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file
    pub path: PathBuf,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoverySettings {
    /// How long a recovery process stays redeemable, in days
    pub lifetime_days: i64,
    /// Length of generated recovery tokens
    pub token_length: usize,
    /// Length of generated replacement passwords
    pub password_length: usize,
    /// How often the expired-process sweep runs, in seconds
    pub purge_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailSettings {
    /// Sender address for recovery mails
    pub sender: String,
    /// Base URL used to build recovery links
    pub base_url: String,
    /// Capacity of the mail dispatch queue
    pub queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseSettings {
                path: default_database_path(),
                max_connections: 5,
            },
            recovery: RecoverySettings {
                lifetime_days: 7,
                token_length: 26,
                // The minimum PlainTextPassword accepts, so a generated
                // password always passes validation.
                password_length: 8,
                purge_interval_secs: 24 * 60 * 60,
            },
            mail: MailSettings {
                sender: "noreply@notejam.example".to_string(),
                base_url: "http://localhost:8080".to_string(),
                queue_capacity: 16,
            },
        }
    }
}

/// Get the default database path
fn default_database_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("notejam").join("notejam.db")
    } else {
        PathBuf::from("notejam.db")
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("NOTEJAM_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("notejam")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or return defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.recovery.lifetime_days <= 0 {
            return Err(anyhow!("recovery.lifetime_days must be positive"));
        }
        if self.recovery.token_length == 0 {
            return Err(anyhow!("recovery.token_length must be positive"));
        }
        if !(8..=128).contains(&self.recovery.password_length) {
            return Err(anyhow!(
                "recovery.password_length must be between 8 and 128"
            ));
        }
        if self.mail.queue_capacity == 0 {
            return Err(anyhow!("mail.queue_capacity must be positive"));
        }
        Ok(())
    }

    /// The recovery process lifetime as a chrono duration
    pub fn recovery_lifetime(&self) -> chrono::Duration {
        chrono::Duration::days(self.recovery.lifetime_days)
    }

    /// How often the expired-process sweep runs
    pub fn purge_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.recovery.purge_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.recovery.lifetime_days, 7);
        assert_eq!(config.recovery.password_length, 8);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.recovery.lifetime_days = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.recovery.password_length = 4;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.mail.queue_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        env::set_var("NOTEJAM_CONFIG_DIR", temp_dir.path());

        let mut config = Config::default();
        config.recovery.lifetime_days = 3;
        config.mail.sender = "admin@notejam.example".to_string();
        config.save().expect("Failed to save config");

        let loaded = Config::load().expect("Failed to load config");
        assert_eq!(loaded.recovery.lifetime_days, 3);
        assert_eq!(loaded.mail.sender, "admin@notejam.example");

        env::remove_var("NOTEJAM_CONFIG_DIR");
    }

    #[test]
    fn test_recovery_lifetime() {
        let config = Config::default();
        assert_eq!(config.recovery_lifetime(), chrono::Duration::days(7));
    }

    #[test]
    fn test_purge_interval() {
        let mut config = Config::default();
        assert_eq!(
            config.purge_interval(),
            std::time::Duration::from_secs(24 * 60 * 60)
        );

        config.recovery.purge_interval_secs = 600;
        assert_eq!(config.purge_interval(), std::time::Duration::from_secs(600));
    }
}
