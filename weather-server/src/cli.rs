use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use weather_core::{Config, ErrorKind, WeatherRequest, provider_from_config};

use crate::{logging, server};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather proxy service")]
pub struct Cli {
    /// Path to a TOML config file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        /// Address to listen on, e.g. "127.0.0.1:8080".
        #[arg(long)]
        bind: Option<String>,

        /// Directory with the landing page assets.
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Fetch current weather for a city once and print it as JSON.
    Show {
        /// City name.
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load(self.config.as_deref())?;
        logging::init_subscriber(&config.log_level)?;

        match self.command {
            Command::Serve { bind, static_dir } => {
                if let Some(bind) = bind {
                    config.bind_addr = bind;
                }
                if let Some(dir) = static_dir {
                    config.static_dir = dir;
                }
                info!(?config, "loaded configuration");
                server::run_server(config).await
            }
            Command::Show { city } => {
                let request = WeatherRequest::parse(Some(city.as_str()))?;
                let api_key = config
                    .api_key()
                    .ok_or(ErrorKind::ApiKeyMissing)
                    .context("Hint: set WEATHER_API_KEY or add `api_key` to the config file")?;

                let provider = provider_from_config(&config)?;
                let record = provider.fetch(api_key, &request.city).await?;
                println!("{}", serde_json::to_string_pretty(&record)?);
                Ok(())
            }
        }
    }
}
