//! Gateway configuration. Precedence: defaults < optional TOML file < `QUEST__` env overrides.
//!
//! The Gemini API key is deliberately *not* part of this struct — it is read
//! from `GOOGLE_API_KEY` by the bridge so it never lands in a config file.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Global application configuration for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestConfig {
    /// Application identity shown on the health endpoint.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Gemini model used for story generation.
    pub model: String,
    /// Directory with the landing page and other static assets.
    pub static_dir: String,
    /// If true, serve the static UI (landing page + assets). (Config alias: `ui_enabled`)
    #[serde(default, alias = "ui_enabled")]
    pub frontend_enabled: bool,
}

impl QuestConfig {
    /// Load config from file and environment. Precedence: env `QUEST_CONFIG`
    /// path > `config/gateway.toml` > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("QUEST_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        let builder = config::Config::builder()
            .set_default("app_name", "MagicQuest")?
            .set_default("port", 8000_i64)?
            .set_default("model", crate::gemini::DEFAULT_MODEL)?
            .set_default("static_dir", "./static")?
            .set_default("frontend_enabled", true)?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        builder
            .add_source(config::Environment::with_prefix("QUEST").separator("__"))
            .build()?
            .try_deserialize()
    }
}
