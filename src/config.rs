use anyhow::Result;
use serde::Deserialize;

use crate::language::DEFAULT_LANGUAGE;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub recognition: RecognitionSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Settings for the speech-recognition capability probe
#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionSettings {
    /// Which engine backend to probe for: "scripted" or "none"
    pub backend: String,

    /// Path to the event script (required by the scripted backend)
    pub script_path: Option<String>,

    /// Language for newly created sessions
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
