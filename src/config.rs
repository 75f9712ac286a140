use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub recorder: RecorderSettings,
    pub submission: SubmissionSettings,
    #[serde(default)]
    pub nats: NatsSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecorderSettings {
    /// Extra capture attempts allowed per question after the first one
    pub retry_limit: u32,
    /// Directory with pre-recorded clips (`take` command)
    pub clips_dir: Option<String>,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            retry_limit: 2,
            clips_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionSettings {
    pub base_url: String,
    #[serde(default = "default_submission_timeout")]
    pub timeout_secs: u64,
}

fn default_submission_timeout() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize)]
pub struct NatsSettings {
    pub enabled: bool,
    pub url: String,
}

impl Default for NatsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "nats://localhost:4222".to_string(),
        }
    }
}

impl Config {
    /// Load from a config file (extension optional), overridden by
    /// `INTERVIEW_WIZARD__*` environment variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("INTERVIEW_WIZARD").separator("__"))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.service.http.bind, self.service.http.port)
    }
}
