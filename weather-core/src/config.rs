use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const ENV_BASE_URL: &str = "WEATHER_API_BASE";
pub const ENV_API_KEY: &str = "WEATHER_API_KEY";
pub const ENV_DEMO_MODE: &str = "WEATHER_DEMO_MODE";

/// Provider settings, resolved once at startup and passed to the fetcher.
///
/// Empty strings mean "not configured".
///
/// Example TOML:
/// ```toml
/// base_url = "https://api.openweathermap.org/data/2.5"
/// api_key = "..."
/// demo_mode = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub demo_mode: bool,
}

/// Why mock data is served instead of calling the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoReason {
    MissingConfig,
    Forced,
}

impl DemoReason {
    pub fn message(&self) -> &'static str {
        match self {
            DemoReason::MissingConfig => "Running in demo mode (missing API config).",
            DemoReason::Forced => "Demo mode enabled.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Live,
    Demo(DemoReason),
}

impl Config {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            demo_mode: false,
        }
    }

    /// Both the base URL and the API key are set.
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }

    /// Missing configuration takes precedence over the demo flag.
    pub fn fetch_mode(&self) -> FetchMode {
        if !self.is_configured() {
            FetchMode::Demo(DemoReason::MissingConfig)
        } else if self.demo_mode {
            FetchMode::Demo(DemoReason::Forced)
        } else {
            FetchMode::Live
        }
    }

    /// Whether the user should be told how to enable live data.
    pub fn needs_setup_notice(&self) -> bool {
        !self.is_configured() && !self.demo_mode
    }

    /// Load config from disk (or defaults if absent) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_env();
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-lookup", "weather-lookup")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override fields from `WEATHER_API_BASE`, `WEATHER_API_KEY` and
    /// `WEATHER_DEMO_MODE` as returned by `lookup`. Unset variables leave the
    /// field alone.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(api_key) = lookup(ENV_API_KEY) {
            self.api_key = api_key;
        }
        if let Some(demo) = lookup(ENV_DEMO_MODE) {
            self.demo_mode = demo.eq_ignore_ascii_case("true");
        }
    }
}
