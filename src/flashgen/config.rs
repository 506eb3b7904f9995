//! # Configuration
//!
//! Settings live in `config.json` inside the data directory. A missing file
//! means defaults; unknown keys are ignored and missing keys take their
//! default, so older files keep loading.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `backend` | `openai` | `openai` or `demo` (offline canned cards) |
//! | `model` | `gpt-4o` | Chat model name |
//! | `api_base` | `https://api.openai.com/v1` | OpenAI-compatible endpoint |
//! | `timeout_secs` | `60` | Per-request HTTP timeout |
//! | `temperature` | `0.7` | Sampling temperature for generation |
//! | `max_tokens` | `3000` | Response token cap |
//! | `default_subject` | `General` | Subject when none is given |
//! | `default_count` | `15` | Cards per request when none is given |
//! | `max_input_chars` | `12000` | Segment size for normalized input |
//! | `min_input_chars` | `50` | Shortest input worth generating from |
//!
//! The API key is never stored here; it comes from `OPENAI_API_KEY`.

use crate::error::{FlashError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const CONFIG_FILENAME: &str = "config.json";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    OpenAi,
    Demo,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::OpenAi => write!(f, "openai"),
            BackendKind::Demo => write!(f, "demo"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = FlashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(BackendKind::OpenAi),
            "demo" => Ok(BackendKind::Demo),
            other => Err(FlashError::Config(format!("Unknown backend: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlashgenConfig {
    pub backend: BackendKind,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    pub default_subject: String,
    pub default_count: usize,
    pub max_input_chars: usize,
    pub min_input_chars: usize,
}

impl Default for FlashgenConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::OpenAi,
            model: "gpt-4o".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            timeout_secs: 60,
            temperature: 0.7,
            max_tokens: 3000,
            default_subject: "General".to_string(),
            default_count: 15,
            max_input_chars: 12_000,
            min_input_chars: 50,
        }
    }
}

impl FlashgenConfig {
    pub const KEYS: &'static [&'static str] = &[
        "backend",
        "model",
        "api_base",
        "timeout_secs",
        "temperature",
        "max_tokens",
        "default_subject",
        "default_count",
        "max_input_chars",
        "min_input_chars",
    ];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: FlashgenConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Current value of `key`, rendered as text.
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "backend" => self.backend.to_string(),
            "model" => self.model.clone(),
            "api_base" => self.api_base.clone(),
            "timeout_secs" => self.timeout_secs.to_string(),
            "temperature" => self.temperature.to_string(),
            "max_tokens" => self.max_tokens.to_string(),
            "default_subject" => self.default_subject.clone(),
            "default_count" => self.default_count.to_string(),
            "max_input_chars" => self.max_input_chars.to_string(),
            "min_input_chars" => self.min_input_chars.to_string(),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }

    /// Parses `value` and assigns it to `key`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "backend" => self.backend = value.parse()?,
            "model" => self.model = non_empty(key, value)?,
            "api_base" => self.api_base = non_empty(key, value)?,
            "timeout_secs" => self.timeout_secs = parse_at_least(key, value, 1)?,
            "temperature" => self.temperature = parse_temperature(value)?,
            "max_tokens" => self.max_tokens = parse_at_least(key, value, 1)?,
            "default_subject" => self.default_subject = non_empty(key, value)?,
            "default_count" => self.default_count = parse_num(key, value)?,
            "max_input_chars" => self.max_input_chars = parse_at_least(key, value, 1)?,
            "min_input_chars" => self.min_input_chars = parse_num(key, value)?,
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }

    /// All keys with their current values, in a stable order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        Self::KEYS
            .iter()
            .filter_map(|key| self.get(key).ok().map(|value| (*key, value)))
            .collect()
    }
}

fn unknown_key(key: &str) -> FlashError {
    FlashError::Config(format!(
        "Unknown config key: {} (known keys: {})",
        key,
        FlashgenConfig::KEYS.join(", ")
    ))
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FlashError::Config(format!("{} cannot be empty", key)));
    }
    Ok(value.to_string())
}

fn parse_num<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| FlashError::Config(format!("Invalid value for {}: {}", key, value)))
}

fn parse_at_least<T>(key: &str, value: &str, min: T) -> Result<T>
where
    T: FromStr + PartialOrd + fmt::Display,
{
    let parsed: T = parse_num(key, value)?;
    if parsed < min {
        return Err(FlashError::Config(format!("{} must be at least {}", key, min)));
    }
    Ok(parsed)
}

// NaN would serialize as null and break every later load.
fn parse_temperature(value: &str) -> Result<f32> {
    let parsed: f32 = parse_num("temperature", value)?;
    if !parsed.is_finite() || !(0.0..=2.0).contains(&parsed) {
        return Err(FlashError::Config(format!(
            "temperature must be between 0.0 and 2.0, got {}",
            value.trim()
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FlashgenConfig::default();
        assert_eq!(config.backend, BackendKind::OpenAi);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.default_count, 15);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = FlashgenConfig::load(dir.path()).unwrap();
        assert_eq!(config, FlashgenConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = FlashgenConfig::default();
        config.set("backend", "demo").unwrap();
        config.set("default_count", "20").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = FlashgenConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.backend, BackendKind::Demo);
        assert_eq!(loaded.default_count, 20);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"model": "gpt-4o-mini"}"#).unwrap();
        let loaded = FlashgenConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.model, "gpt-4o-mini");
        assert_eq!(loaded.timeout_secs, 60);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = FlashgenConfig::default();
        assert!(matches!(
            config.set("timeout_secs", "soon"),
            Err(FlashError::Config(_))
        ));
        assert!(matches!(
            config.set("backend", "llama"),
            Err(FlashError::Config(_))
        ));
        assert!(matches!(config.set("model", "  "), Err(FlashError::Config(_))));
        assert!(matches!(config.set("colour", "red"), Err(FlashError::Config(_))));
    }

    #[test]
    fn test_set_enforces_ranges() {
        let mut config = FlashgenConfig::default();
        for (key, value) in [
            ("temperature", "NaN"),
            ("temperature", "inf"),
            ("temperature", "-0.1"),
            ("temperature", "2.5"),
            ("timeout_secs", "0"),
            ("max_tokens", "0"),
            ("max_input_chars", "0"),
        ] {
            assert!(
                matches!(config.set(key, value), Err(FlashError::Config(_))),
                "{} = {} should be rejected",
                key,
                value
            );
        }
        assert_eq!(config, FlashgenConfig::default());

        config.set("temperature", "1.2").unwrap();
        config.set("timeout_secs", "1").unwrap();
        assert_eq!(config.temperature, 1.2);
        assert_eq!(config.timeout_secs, 1);
    }

    #[test]
    fn test_rejected_temperature_keeps_config_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = FlashgenConfig::default();
        assert!(config.set("temperature", "NaN").is_err());
        config.save(dir.path()).unwrap();

        let loaded = FlashgenConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.temperature, 0.7);
    }

    #[test]
    fn test_entries_cover_every_key() {
        let entries = FlashgenConfig::default().entries();
        assert_eq!(entries.len(), FlashgenConfig::KEYS.len());
        assert_eq!(entries[0], ("backend", "openai".to_string()));
    }
}
