// src/core/config_manager.rs
//! Configuration: config.yaml section per environment, then env overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::suggestions::{ControllerSettings, PollSettings};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub max_poll_attempts: u32,
    pub completion_grace_millis: u64,
    pub min_resume_chars: usize,
    pub page_size: u32,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 30,
            poll_interval_secs: 3,
            max_poll_attempts: 200,
            completion_grace_millis: 2000,
            min_resume_chars: 50,
            page_size: 10,
            server_port: 8080,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    local: Option<AppConfig>,
    production: Option<AppConfig>,
}

pub struct ConfigManager;

impl ConfigManager {
    /// Load from `config.yaml` in the working directory when present
    pub fn load() -> Result<AppConfig> {
        Self::load_from(&AppConfig::default_path(), |key| std::env::var(key).ok())
    }

    pub fn load_from<F>(path: &Path, env: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Self::environment_name(&env);
        info!("Loading configuration for environment: {}", environment);

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::select_section(&content, &environment)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            AppConfig::default()
        };

        Self::apply_overrides(&mut config, &env)?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn environment_name<F>(env: &F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        env("JOB_SCOUT_ENV")
            .or_else(|| env("ENVIRONMENT"))
            .unwrap_or_else(|| "local".to_string())
    }

    fn select_section(content: &str, environment: &str) -> Result<AppConfig> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };
        Ok(section.unwrap_or_default())
    }

    fn apply_overrides<F>(config: &mut AppConfig, env: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env("JOB_SCOUT_API_URL") {
            config.api_base_url = url;
        }
        if let Some(port) = env("JOB_SCOUT_PORT") {
            config.server_port = port
                .parse()
                .context("JOB_SCOUT_PORT must be a valid port number")?;
        }
        if let Some(secs) = env("JOB_SCOUT_POLL_INTERVAL_SECS") {
            config.poll_interval_secs = secs
                .parse()
                .context("JOB_SCOUT_POLL_INTERVAL_SECS must be a number of seconds")?;
        }
        if let Some(attempts) = env("JOB_SCOUT_MAX_POLL_ATTEMPTS") {
            config.max_poll_attempts = attempts
                .parse()
                .context("JOB_SCOUT_MAX_POLL_ATTEMPTS must be a positive integer")?;
        }
        Ok(())
    }

    fn validate(config: &AppConfig) -> Result<()> {
        if config.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be greater than zero");
        }
        if config.max_poll_attempts == 0 {
            anyhow::bail!("max_poll_attempts must be greater than zero");
        }
        if config.page_size == 0 {
            anyhow::bail!("page_size must be greater than zero");
        }
        if config.api_base_url.trim().is_empty() {
            anyhow::bail!("api_base_url must not be empty");
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            poll: PollSettings {
                interval: Duration::from_secs(self.poll_interval_secs),
                max_attempts: self.max_poll_attempts,
                completion_grace: Duration::from_millis(self.completion_grace_millis),
            },
            min_resume_chars: self.min_resume_chars,
            page_size: self.page_size,
        }
    }

    /// Location of the optional config file, relative to the working directory
    pub fn default_path() -> PathBuf {
        PathBuf::from("config.yaml")
    }
}
