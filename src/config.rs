//! Application configuration.
//!
//! Settings live in `~/.driftmail/config.json` next to the state files; all
//! fields are optional overrides on top of the environment defaults.

use crate::environment::Environment;
use crate::i18n::Locale;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::{fs, path::Path};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// UI language tag, e.g. "en" or "zh". Unset means auto-detect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Overrides the environment's API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    /// Overrides the environment's display mail domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the configuration if present, otherwise falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Config::default();
        }
        match Config::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring unreadable config at {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// The effective API base URL after overrides.
    pub fn api_url(&self, environment: Environment) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(|| environment.api_url())
    }

    /// The effective mail domain after overrides.
    pub fn mail_domain(&self, environment: Environment) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| environment.mail_domain().to_string())
    }

    /// The effective locale: config wins over environment variables.
    pub fn locale(&self) -> Locale {
        self.locale
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(Locale::from_env)
    }
}

/// The directory holding the config file and all persisted state.
pub fn state_dir() -> Result<PathBuf, std::io::Error> {
    let home = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    Ok(home.join(".driftmail"))
}

/// Path of the configuration file.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    Ok(state_dir()?.join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn sample_config() -> Config {
        Config {
            locale: Some("zh".to_string()),
            api_base_url: Some("http://localhost:9911".to_string()),
            domain: None,
        }
    }

    #[test]
    // Loading a saved configuration file should return the same configuration.
    fn test_load_recovers_saved_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = sample_config();
        config.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config, loaded_config);
    }

    #[test]
    // Saving a configuration should create directories if they don't exist.
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent_dir").join("config.json");

        let config = sample_config();
        let result = config.save(&path);

        assert!(result.is_ok(), "Failed to save config");
        assert!(
            path.parent().unwrap().exists(),
            "Parent directory does not exist"
        );
    }

    #[test]
    // Loading an invalid JSON file should return an error.
    fn test_load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid_config.json");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = Config::load_from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    // A missing file should quietly yield the defaults.
    fn test_load_or_default_without_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let config = Config::load_or_default(&path);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_overrides_win_over_environment() {
        let config = sample_config();
        assert_eq!(
            config.api_url(Environment::Production),
            "http://localhost:9911"
        );
        assert_eq!(
            config.mail_domain(Environment::Production),
            "driftmail.app"
        );
    }

    #[test]
    // An explicit locale in the config wins over environment detection.
    fn test_config_locale_overrides_detection() {
        let config = sample_config();
        assert_eq!(config.locale(), Locale::Zh);
    }
}
