use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::render::RenderStyle;

pub const API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const BASE_URL_ENV: &str = "WEATHER_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/3.0/onecall/day_summary";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Deployment profile of the tool server.
///
/// `Plain` renders undecorated Markdown and reports no metadata.
/// `Decorated` adds emoji section markers and an invocation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Plain,
    Decorated,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Plain => "plain",
            Profile::Decorated => "decorated",
        }
    }

    pub fn tracks_invocations(&self) -> bool {
        matches!(self, Profile::Decorated)
    }

    pub fn render_style(&self) -> RenderStyle {
        match self {
            Profile::Plain => RenderStyle::Plain,
            Profile::Decorated => RenderStyle::Decorated,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Profile {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "plain" => Ok(Profile::Plain),
            "decorated" => Ok(Profile::Decorated),
            _ => Err(anyhow!("Unknown profile '{value}'. Supported profiles: plain, decorated.")),
        }
    }
}

/// Process-wide configuration. Read once at startup, never mutated after.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// timeout_secs = 30
/// profile = "decorated"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key. Empty counts as unset.
    pub api_key: Option<String>,

    pub base_url: String,

    pub timeout_secs: u64,

    pub profile: Profile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            profile: Profile::default(),
        }
    }
}

impl Config {
    /// Load from `path` (defaults if it doesn't exist), then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = Self::load_file(path)?;
        cfg.apply_overrides(|key| std::env::var(key).ok());

        if cfg.api_key().is_none() {
            tracing::warn!("{API_KEY_ENV} not set in environment or config file");
        }

        Ok(cfg)
    }

    /// Read `path` as-is, without environment overrides. Defaults if it doesn't exist.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Environment wins over the file for the key and the base URL.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
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
        let dirs = ProjectDirs::from("dev", "openweather-mcp", "openweather-mcp")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
