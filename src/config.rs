// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::utils::normalize_base_url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CONFIG_FILE: &str = "resume-analyzer.yaml";
pub const DEFAULT_LOG_FILE: &str = "/tmp/resume-analyzer.log";

/// Resolved client configuration.
///
/// Resolution order: defaults, then the YAML profile selected by
/// `ENVIRONMENT`, then `RESUME_ANALYZER_*` variables, then CLI flags via the
/// `with_*` builders.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub output_dir: PathBuf,
    /// `None` leaves requests without a client-side timeout.
    pub timeout_seconds: Option<u64>,
    pub log_file: PathBuf,
    /// Profile selected by `ENVIRONMENT`.
    pub environment: String,
    /// YAML file the profile was read from, if one existed.
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileConfig {
    base_url: Option<String>,
    output_dir: Option<PathBuf>,
    timeout_seconds: Option<u64>,
    log_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: ProfileConfig,
    #[serde(default)]
    production: ProfileConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
            timeout_seconds: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            environment: "local".to_string(),
            config_file: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from `.env`, the optional YAML file and the process environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::load`] with an explicit variable lookup
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(environment) = lookup("ENVIRONMENT") {
            config.environment = environment;
        }

        let config_path = lookup("RESUME_ANALYZER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            config = config.apply_yaml(&content)?;
            config.config_file = Some(config_path);
        }

        if let Some(url) = lookup("RESUME_ANALYZER_API_URL") {
            config.base_url = url;
        }
        if let Some(dir) = lookup("RESUME_ANALYZER_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup("RESUME_ANALYZER_TIMEOUT_SECS") {
            let secs = secs
                .parse::<u64>()
                .context("RESUME_ANALYZER_TIMEOUT_SECS must be a whole number of seconds")?;
            config.timeout_seconds = Some(secs);
        }
        if let Some(file) = lookup("RESUME_ANALYZER_LOG_FILE") {
            config.log_file = PathBuf::from(file);
        }

        config.validated()
    }

    fn apply_yaml(mut self, content: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse configuration file")?;

        let profile = match self.environment.as_str() {
            "production" => file.production,
            _ => file.local,
        };

        if let Some(url) = profile.base_url {
            self.base_url = url;
        }
        if let Some(dir) = profile.output_dir {
            self.output_dir = dir;
        }
        if profile.timeout_seconds.is_some() {
            self.timeout_seconds = profile.timeout_seconds;
        }
        if let Some(file) = profile.log_file {
            self.log_file = file;
        }
        Ok(self)
    }

    pub fn with_base_url(mut self, url: String) -> Result<Self> {
        self.base_url = url;
        self.validated()
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn with_log_file(mut self, file: PathBuf) -> Self {
        self.log_file = file;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn validated(mut self) -> Result<Self> {
        self.base_url = normalize_base_url(&self.base_url);

        let url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid service URL: {}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Service URL must use http or https: {}", self.base_url);
        }

        Ok(self)
    }
}
