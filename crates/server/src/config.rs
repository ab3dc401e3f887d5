use std::{collections::HashMap, fs};

pub const DEFAULT_SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8000".into(),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl Settings {
    fn apply_file(&mut self, raw: &str) {
        let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
            tracing::warn!("ignoring unreadable {DEFAULT_SETTINGS_FILE}");
            return;
        };
        if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
            self.server_bind = v.to_string();
        }
        if let Some(v) = file_cfg
            .get("max_body_bytes")
            .and_then(toml::Value::as_integer)
            .and_then(|v| usize::try_from(v).ok())
        {
            self.max_body_bytes = v;
        }
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SERVER_BIND") {
            self.server_bind = v;
        }
        if let Some(v) = lookup("APP__BIND_ADDR") {
            self.server_bind = v;
        }
        if let Some(v) = lookup("APP__MAX_BODY_BYTES") {
            if let Ok(parsed) = v.parse::<usize>() {
                self.max_body_bytes = parsed;
            }
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(DEFAULT_SETTINGS_FILE) {
        settings.apply_file(&raw);
    }
    settings.apply_env(|name| std::env::var(name).ok());

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
