use std::path::Path;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use config::File;
use serde::Deserialize;

/// Submission settings loaded from an optional TOML file
#[derive(Debug, Deserialize)]
pub struct SubmitConfigFile {
    /// Maximum submissions per window
    pub requests_per_window: u32,

    /// Window duration in milliseconds
    pub window_ms: u64,

    /// Skip network calls and report success
    pub simulate: bool,

    /// Override for the service base URL
    pub base_url: Option<String>,
}

impl Default for SubmitConfigFile {
    fn default() -> Self {
        Self { requests_per_window: 5, window_ms: 1_000, simulate: true, base_url: None }
    }
}

impl SubmitConfigFile {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

pub fn load_submit_config<P: AsRef<Path>>(path: P) -> Result<SubmitConfigFile, ConfigError> {
    let config = Config::builder().add_source(File::from(path.as_ref())).build()?;

    config.try_deserialize()
}

/// Load submission config with fallback to default
pub fn load_submit_config_or_default(path: &str) -> SubmitConfigFile {
    match load_submit_config(path) {
        Ok(config) => {
            tracing::info!("Loaded submit config from {path}");
            config
        }
        Err(err) => {
            tracing::warn!("Failed to load submit config from {}: {}. Using defaults.", path, err);
            SubmitConfigFile::default()
        }
    }
}
