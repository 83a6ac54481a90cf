use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::synth::{CohereConfig, DEFAULT_MAX_ATTEMPTS};

pub const ENV_PREFIX: &str = "JUDGE_CORPUS";
const FILE_NAME: &str = "judge_corpus";

/// Process-wide settings: defaults, then `judge_corpus.toml`, then
/// `JUDGE_CORPUS_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_attempts: u32,
    pub request_timeout_secs: u64,
    pub workers: Option<usize>,
    pub keep_failed_url: bool,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(File::with_name(FILE_NAME).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        Self::from_builder(builder)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("base_url", "https://api.cohere.com")?
            .set_default("model", "command-r-plus-08-2024")?
            .set_default("temperature", 0.3)?
            .set_default("max_attempts", i64::from(DEFAULT_MAX_ATTEMPTS))?
            .set_default("request_timeout_secs", 120)?
            .set_default("keep_failed_url", false)?)
    }

    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let mut settings: Settings = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        if settings.api_key.is_none() {
            settings.api_key = std::env::var("COHERE_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty());
        }
        Ok(settings)
    }

    /// Client configuration, or `None` when no credential is available.
    pub fn cohere(&self) -> Option<CohereConfig> {
        let api_key = self.api_key.clone().filter(|k| !k.trim().is_empty())?;
        Some(CohereConfig {
            api_key,
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let s = Settings::from_builder(Settings::defaults().unwrap()).unwrap();
        assert_eq!(s.base_url, "https://api.cohere.com");
        assert_eq!(s.temperature, 0.3);
        assert_eq!(s.max_attempts, 3);
        assert_eq!(s.request_timeout_secs, 120);
        assert!(s.workers.is_none());
        assert!(!s.keep_failed_url);
    }

    #[test]
    fn toml_overrides_defaults() {
        let builder = Settings::defaults().unwrap().add_source(config::File::from_str(
            "model = \"command-r\"\nworkers = 6\nkeep_failed_url = true\napi_key = \"k\"",
            config::FileFormat::Toml,
        ));
        let s = Settings::from_builder(builder).unwrap();
        assert_eq!(s.model, "command-r");
        assert_eq!(s.workers, Some(6));
        assert!(s.keep_failed_url);
        let cohere = s.cohere().unwrap();
        assert_eq!(cohere.api_key, "k");
        assert_eq!(cohere.timeout, Duration::from_secs(120));
    }

    #[test]
    fn blank_key_means_no_client() {
        let builder = Settings::defaults()
            .unwrap()
            .set_override("api_key", "  ")
            .unwrap();
        let s = Settings::from_builder(builder).unwrap();
        assert!(s.cohere().is_none());
    }
}
