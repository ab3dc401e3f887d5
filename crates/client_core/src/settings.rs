use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use serde::Deserialize;
use shared::protocol::DEFAULT_PREDICTION_ENDPOINT;
use url::Url;

use crate::controller::DEFAULT_SUBMIT_DELAY;

pub const DEFAULT_SETTINGS_FILE: &str = "predictor.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub endpoint: String,
    pub submit_delay_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PREDICTION_ENDPOINT.into(),
            submit_delay_ms: DEFAULT_SUBMIT_DELAY.as_millis() as u64,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    prediction_endpoint: Option<String>,
    submit_delay_ms: Option<u64>,
}

impl ClientSettings {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn apply_toml(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw).context("invalid settings file")?;
        if let Some(v) = file_cfg.prediction_endpoint {
            self.endpoint = v;
        }
        if let Some(v) = file_cfg.submit_delay_ms {
            self.submit_delay_ms = v;
        }
        Ok(())
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("APP__PREDICTION_ENDPOINT") {
            self.endpoint = v;
        }
        if let Some(v) = lookup("APP__SUBMIT_DELAY_MS") {
            self.submit_delay_ms = v
                .trim()
                .parse()
                .with_context(|| format!("APP__SUBMIT_DELAY_MS must be milliseconds, got '{v}'"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.endpoint)
            .with_context(|| format!("invalid prediction endpoint '{}'", self.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "prediction endpoint must use http:// or https://, got '{}'",
                self.endpoint
            );
        }
        Ok(())
    }
}

/// Defaults, then the settings file, then `APP__*` environment variables.
///
/// An explicitly requested file must exist; the default `predictor.toml` is
/// optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => settings
            .apply_toml(&raw)
            .with_context(|| format!("failed to load settings from '{}'", path.display()))?,
        Err(err) if required => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()));
        }
        Err(_) => {}
    }

    settings.apply_env(|name| std::env::var(name).ok())?;
    settings.validate()?;
    Ok(settings)
}
