use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode, Text};
use tracing::info;
use weather_core::{Config, Location, OpenWeatherMap};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "OpenWeatherMap CLI")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively store credentials and location.
    Configure,

    /// Show the current weather at the configured location.
    Current,

    /// Show the hourly forecast at the configured location.
    Forecast {
        /// Only print the first N hours.
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(self.config.as_deref()),
            Command::Current => {
                let client = client(self.config.as_deref())?;
                let weather = client.get_current().await?;

                println!("{}", client.location().name);
                println!("{weather}");
                Ok(())
            }
            Command::Forecast { limit } => {
                let client = client(self.config.as_deref())?;
                let list = client.get_forecast().await?;

                println!("{}", client.location().name);
                for weather in list.iter().take(limit.unwrap_or(usize::MAX)) {
                    println!("{weather}");
                }
                Ok(())
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let cfg = match path {
        Some(path) => Some(Config::load_from(path)?),
        None => Config::load()?,
    };

    cfg.ok_or_else(|| {
        anyhow!(
            "No configuration found.\n\
             Hint: run `weather configure` and enter your API key and location first."
        )
    })
}

fn client(path: Option<&Path>) -> Result<OpenWeatherMap> {
    let cfg = load_config(path)?;
    OpenWeatherMap::new(&cfg).context("Failed to initialize OpenWeatherMap client")
}

fn configure(path: Option<&Path>) -> Result<()> {
    let existing = match path {
        Some(path) if path.exists() => Some(Config::load_from(path)?),
        Some(_) => None,
        None => Config::load()?,
    };

    let key = Text::new("OpenWeatherMap key:")
        .with_default(existing.as_ref().map(|c| c.key.as_str()).unwrap_or_default())
        .prompt()?;

    let secret = Password::new("OpenWeatherMap API secret (appid):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let lat = CustomType::<f64>::new("Latitude:")
        .with_error_message("Please type a number, e.g. 52.52")
        .prompt()?;
    let lon = CustomType::<f64>::new("Longitude:")
        .with_error_message("Please type a number, e.g. 13.405")
        .prompt()?;
    let name = Text::new("Location name:").prompt()?;

    let mut cfg = Config::new(key, secret, Location { lat, lon, name });
    if let Some(prev) = existing {
        cfg.base_url = prev.base_url;
        cfg.timeout_secs = prev.timeout_secs;
    }

    let saved_to = match path {
        Some(path) => {
            cfg.save_to(path)?;
            path.to_path_buf()
        }
        None => cfg.save()?,
    };

    info!(path = %saved_to.display(), "configuration saved");
    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn forecast_accepts_limit_and_global_config() {
        let cli = Cli::try_parse_from(["weather", "forecast", "--limit", "6", "--config", "/tmp/w.toml"])
            .unwrap();

        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/w.toml")));
        assert!(matches!(cli.command, Command::Forecast { limit: Some(6) }));
    }

    #[test]
    fn missing_config_file_errors() {
        let err = load_config(Some(Path::new("/nonexistent/weather/config.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
