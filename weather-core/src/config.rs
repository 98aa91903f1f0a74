use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

/// Service configuration: defaults, then an optional TOML file, then
/// `WEATHER_*` environment variables.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// bind_addr = "127.0.0.1:8080"
/// upstream_timeout_secs = 10
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory holding `index.html` and other landing page assets.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    #[serde(default)]
    pub upstream_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            bind_addr: default_bind_addr(),
            log_level: default_log_level(),
            static_dir: default_static_dir(),
            upstream_timeout_secs: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("static_dir", &self.static_dir)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load the layered configuration.
    ///
    /// An explicit `path` must exist; otherwise the platform config file is
    /// used when present. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::config_file_path()?;
                if path.exists() { Self::from_file(&path)? } else { Self::default() }
            }
        };

        cfg.apply_env(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut cfg: Config = toml::from_str(contents)?;
        cfg.api_key = cfg.api_key.filter(|k| !k.is_empty());
        Ok(cfg)
    }

    /// Override fields from `WEATHER_*` variables resolved through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("WEATHER_API_KEY") {
            self.api_key = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(url) = lookup("WEATHER_BASE_URL") {
            self.base_url = url;
        }
        if let Some(addr) = lookup("WEATHER_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(level) = lookup("WEATHER_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(dir) = lookup("WEATHER_STATIC_DIR") {
            self.static_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup("WEATHER_UPSTREAM_TIMEOUT_SECS") {
            let secs = secs
                .parse()
                .with_context(|| format!("WEATHER_UPSTREAM_TIMEOUT_SECS is not a number: {secs}"))?;
            self.upstream_timeout_secs = Some(secs);
        }

        Ok(())
    }

    /// Returns the API key, if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
