use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub prompt: String,
    pub banners: Vec<String>,
    pub color: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt: console_core::render::DEFAULT_PROMPT.into(),
            banners: vec![
                "Make-A-Lisp console".into(),
                "type :reset to start over, :quit to leave".into(),
            ],
            color: true,
            log_filter: "warn".into(),
        }
    }
}

/// Defaults, overlaid by the TOML file at `path` when present, then by
/// `APP__*` environment variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => parse_settings(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(error) => {
            debug!(path = %path.display(), %error, "no settings file; using defaults");
            Settings::default()
        }
    };
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str(raw)?)
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__PROMPT") {
        settings.prompt = v;
    }
    if let Some(v) = lookup("APP__BANNERS") {
        settings.banners = v
            .split('|')
            .map(str::trim)
            .filter(|banner| !banner.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some(v) = lookup("APP__COLOR") {
        if let Ok(parsed) = v.parse::<bool>() {
            settings.color = parsed;
        }
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
