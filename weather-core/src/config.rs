use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Geographic point the client reports weather for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}

/// Client configuration, also the on-disk config format.
///
/// Example TOML:
/// key = "..."
/// secret = "..."
///
/// [location]
/// lat = 52.52
/// lon = 13.405
/// name = "Berlin"
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    pub key: String,
    /// Sent as `appid` on every request.
    pub secret: String,
    pub location: Location,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("location", &self.location)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Build a config pointing at the public OpenWeatherMap endpoint.
    pub fn new(key: impl Into<String>, secret: impl Into<String>, location: Location) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            location,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }

    /// Load config from the platform config file, or `None` if it doesn't exist yet.
    pub fn load() -> Result<Option<Self>> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(None);
        }

        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config file.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn berlin() -> Location {
        Location { lat: 52.52, lon: 13.405, name: "Berlin".into() }
    }

    #[test]
    fn minimal_toml_fills_in_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            key = "KEY"
            secret = "SECRET"

            [location]
            lat = 52.52
            lon = 13.405
            name = "Berlin"
            "#,
        )
        .expect("minimal config must parse");

        assert_eq!(cfg.location, berlin());
        assert_eq!(cfg.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn missing_location_is_rejected() {
        let err = toml::from_str::<Config>(r#"key = "KEY"
secret = "SECRET""#)
            .unwrap_err();

        assert!(err.to_string().contains("location"));
    }

    #[test]
    fn save_then_load_from_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::new("KEY", "SECRET", berlin());
        cfg.timeout_secs = 5;
        cfg.save_to(&path).expect("save must create parent dirs");

        let loaded = Config::load_from(&path).expect("saved config must load");
        assert_eq!(loaded.secret, "SECRET");
        assert_eq!(loaded.location, berlin());
        assert_eq!(loaded.timeout_secs, 5);
    }

    #[test]
    fn load_from_reports_path_on_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not = [valid").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn debug_redacts_secret() {
        let cfg = Config::new("KEY", "SECRET", berlin());
        let rendered = format!("{cfg:?}");

        assert!(rendered.contains("KEY"));
        assert!(!rendered.contains("SECRET"));
    }
}
