use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Credential/config lookup supplied by the host. Lookups that miss fall
/// back to a process environment variable of the same name.
pub trait ConfigSource: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;

    fn get_with_env(&self, name: &str) -> Option<String> {
        self.get(name).or_else(|| std::env::var(name).ok())
    }
}

/// Map-backed config, used by tests and for host-injected values.
#[derive(Default)]
pub struct StaticConfig {
    values: HashMap<String, String>,
}

impl StaticConfig {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }
}

impl ConfigSource for StaticConfig {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    pub anthropic_api_key: Option<String>,

    #[serde(default)]
    pub default_tags: Vec<String>,
}

fn default_data_dir() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("inkdraft");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.to_string_lossy().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            anthropic_api_key: None,
            default_tags: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config =
                toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("inkdraft")
            .join("config.toml")
    }
}

impl ConfigSource for Config {
    fn get(&self, name: &str) -> Option<String> {
        match name {
            "ANTHROPIC_API_KEY" => self.anthropic_api_key.clone(),
            _ => None,
        }
    }
}
