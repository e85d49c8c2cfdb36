//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub extensions: ExtensionsConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtensionsConfig {
    pub directory: PathBuf,
    /// File suffix marking an extension manifest
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DatabaseConfig {
    pub path: PathBuf,
    /// Run the `user_data` schema step before connecting
    #[serde(default = "default_true")]
    pub create_schema: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscordConfig {
    pub token: Option<String>,
}

fn default_suffix() -> String {
    ".yaml".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "warden-bot".to_string(),
                prefix: "!".to_string(),
            },
            extensions: ExtensionsConfig {
                directory: PathBuf::from("extensions"),
                suffix: default_suffix(),
            },
            database: DatabaseConfig {
                path: PathBuf::from("warden.db"),
                create_schema: true,
            },
            discord: DiscordConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, fall back to defaults, then apply environment overrides
    pub fn resolve(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Config::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            })
        } else {
            Config::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Apply `TOKEN`, `DATABASE_PATH`, `BOT_PREFIX` and `EXTENSIONS_DIR` overrides
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("TOKEN").filter(|t| !t.trim().is_empty()) {
            self.discord.token = Some(token);
        }

        if let Some(path) = lookup("DATABASE_PATH").filter(|p| !p.trim().is_empty()) {
            self.database.path = PathBuf::from(path);
        }

        if let Some(prefix) = lookup("BOT_PREFIX").filter(|p| !p.trim().is_empty()) {
            self.bot.prefix = prefix;
        }

        if let Some(dir) = lookup("EXTENSIONS_DIR").filter(|d| !d.trim().is_empty()) {
            self.extensions.directory = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue("bot.prefix must not be blank".to_string()));
        }
        if self.extensions.suffix.is_empty() {
            return Err(ConfigError::InvalidValue("extensions.suffix must not be empty".to_string()));
        }
        Ok(())
    }

    /// The bot token, or an error naming where it should come from
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.discord
            .token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("discord.token (or TOKEN env var)".to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }
}
