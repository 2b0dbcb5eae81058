#[cfg(test)]
mod tests;

extern crate serde_yaml;
extern crate toml;

use anyhow::{bail, Context};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::chord::DEFAULT_TIMEOUT;
use crate::client::InjectMethod;
use crate::error::{ChordError, Result};

/// Engine-wide defaults. Bindings are never read from files; chord trees are
/// built in code by the embedding application.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub default_timeout_secs: f64,
    pub remind_keys: bool,
    pub message_duration_ms: u64,
    pub inject_timeout_ms: u64,
    pub inject_method: InjectMethod,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_timeout_secs: DEFAULT_TIMEOUT.as_secs_f64(),
            remind_keys: true,
            message_duration_ms: 1500,
            inject_timeout_ms: 500,
            inject_method: InjectMethod::default(),
        }
    }
}

impl Settings {
    /// Fails with `InvalidTimeout` for settings built by hand with a
    /// timeout the loader would have rejected.
    pub fn default_timeout(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.default_timeout_secs)
            .ok()
            .filter(|timeout| !timeout.is_zero())
            .ok_or(ChordError::InvalidTimeout(self.default_timeout_secs))
    }

    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }

    pub fn inject_timeout(&self) -> Duration {
        Duration::from_millis(self.inject_timeout_ms)
    }

    fn apply(&mut self, file: SettingsFile) {
        if let Some(v) = file.default_timeout_secs {
            self.default_timeout_secs = v;
        }
        if let Some(v) = file.remind_keys {
            self.remind_keys = v;
        }
        if let Some(v) = file.message_duration_ms {
            self.message_duration_ms = v;
        }
        if let Some(v) = file.inject_timeout_ms {
            self.inject_timeout_ms = v;
        }
        if let Some(v) = file.inject_method {
            self.inject_method = v;
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.default_timeout().context("default_timeout_secs must be a positive number")?;
        if self.inject_timeout_ms == 0 {
            bail!("inject_timeout_ms must be greater than zero");
        }
        Ok(())
    }
}

/// One settings file as written. Missing fields keep the earlier value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    default_timeout_secs: Option<f64>,
    remind_keys: Option<bool>,
    message_duration_ms: Option<u64>,
    inject_timeout_ms: Option<u64>,
    inject_method: Option<InjectMethod>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFiletype {
    Yaml,
    Toml,
}

pub fn get_file_ext(filename: &Path) -> ConfigFiletype {
    match filename.extension() {
        Some(f) => {
            let ext = f.to_str().unwrap_or("").to_lowercase();
            if ext == "toml" {
                ConfigFiletype::Toml
            } else {
                ConfigFiletype::Yaml
            }
        }
        _ => ConfigFiletype::Yaml,
    }
}

/// Parses a single settings document on top of the defaults.
pub fn parse_settings(contents: &str, filetype: ConfigFiletype) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    settings.apply(parse_file(contents, filetype)?);
    settings.validate()?;
    Ok(settings)
}

/// Loads and merges settings files left to right.
pub fn load_settings(filenames: &[PathBuf]) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    for filename in filenames {
        let contents =
            fs::read_to_string(filename).with_context(|| format!("Failed to read {}", filename.display()))?;
        let file = parse_file(&contents, get_file_ext(filename))
            .with_context(|| format!("Failed to parse {}", filename.display()))?;
        settings.apply(file);
    }
    settings.validate()?;
    Ok(settings)
}

fn parse_file(contents: &str, filetype: ConfigFiletype) -> anyhow::Result<SettingsFile> {
    // an empty YAML document is null, not an empty map
    if contents.trim().is_empty() {
        return Ok(SettingsFile::default());
    }
    let file = match filetype {
        ConfigFiletype::Yaml => serde_yaml::from_str(contents)?,
        ConfigFiletype::Toml => toml::from_str(contents)?,
    };
    Ok(file)
}
