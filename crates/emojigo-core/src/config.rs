//! TOML-based game configuration.
//!
//! Holds the tuning knobs for a session:
//! - Emotion vocabulary planks are drawn from
//! - Session length and pre-game countdown
//! - Spawn, sample and fast-tick cadences
//! - Match threshold and scroll speed
//!
//! Configuration is stored at `~/.config/emojigo/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::emotion::{Emotion, Vocabulary};
use crate::error::{ConfigError, CoreError, Result};

/// Points awarded for one scored challenge.
pub const POINTS_PER_CHALLENGE: u32 = 100;

/// Game configuration, injected into the engine at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub vocabulary: Vocabulary,
    /// Playable session length in seconds.
    #[serde(default = "default_session_secs")]
    pub session_secs: u32,
    /// Length of the "3, 2, 1" cue sequence before "Go!".
    #[serde(default = "default_pre_countdown_secs")]
    pub pre_countdown_secs: u32,
    #[serde(default = "default_spawn_interval_ms")]
    pub spawn_interval_ms: u64,
    /// Nominal spacing between classifier samples; each matching sample
    /// counts for this much held time.
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
    #[serde(default = "default_match_threshold_ms")]
    pub match_threshold_ms: u64,
    /// Plank progress added per fast tick.
    #[serde(default = "default_scroll_increment")]
    pub scroll_increment: f64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// RNG seed for plank selection. Entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_session_secs() -> u32 {
    60
}
fn default_pre_countdown_secs() -> u32 {
    3
}
fn default_spawn_interval_ms() -> u64 {
    3000
}
fn default_sample_interval_ms() -> u64 {
    500
}
fn default_match_threshold_ms() -> u64 {
    1000
}
fn default_scroll_increment() -> f64 {
    // 0.036 scene units per frame over a 4 unit track
    0.009
}
fn default_tick_interval_ms() -> u64 {
    30
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            session_secs: default_session_secs(),
            pre_countdown_secs: default_pre_countdown_secs(),
            spawn_interval_ms: default_spawn_interval_ms(),
            sample_interval_ms: default_sample_interval_ms(),
            match_threshold_ms: default_match_threshold_ms(),
            scroll_increment: default_scroll_increment(),
            tick_interval_ms: default_tick_interval_ms(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// The original 20 second round with all five plank textures.
    pub fn classic() -> Self {
        Self {
            vocabulary: Vocabulary::extended(),
            session_secs: 20,
            ..Self::default()
        }
    }

    pub fn with_vocabulary<I: IntoIterator<Item = Emotion>>(mut self, emotions: I) -> Self {
        self.vocabulary = emotions.into_iter().collect();
        self
    }

    pub fn with_session_secs(mut self, secs: u32) -> Self {
        self.session_secs = secs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn match_threshold(&self) -> Duration {
        Duration::from_millis(self.match_threshold_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check every field the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vocabulary.is_empty() {
            return Err(ConfigError::invalid("vocabulary", "must list at least one emotion"));
        }
        if let Some(dup) = self.vocabulary.duplicate() {
            return Err(ConfigError::invalid(
                "vocabulary",
                format!("'{dup}' is listed more than once"),
            ));
        }
        if self.session_secs == 0 {
            return Err(ConfigError::invalid("session_secs", "must be positive"));
        }
        for (key, value) in [
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("sample_interval_ms", self.sample_interval_ms),
            ("match_threshold_ms", self.match_threshold_ms),
            ("tick_interval_ms", self.tick_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(key, "must be positive"));
            }
        }
        if !(self.scroll_increment > 0.0 && self.scroll_increment <= 1.0) {
            return Err(ConfigError::invalid(
                "scroll_increment",
                format!("{} is outside (0, 1]", self.scroll_increment),
            ));
        }
        Ok(())
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Default config file location.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::path()?)
    }

    /// Read and validate a config file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: GameConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    // ── Key access ───────────────────────────────────────────────────

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The result must still validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the updated config is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        set_json_value_by_path(&mut json, key, value)?;
        let updated: GameConfig = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn get_json_value_by_path<'a>(
    root: &'a serde_json::Value,
    key: &str,
) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }
    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
    let unknown = || CoreError::from(ConfigError::UnknownKey(key.to_string()));
    if key.is_empty() {
        return Err(unknown());
    }
    let mut parts = key.split('.').peekable();

    let mut current = root;
    while let Some(part) = parts.next() {
        if parts.peek().is_some() {
            current = current.get_mut(part).ok_or_else(unknown)?;
            continue;
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(part).ok_or_else(unknown)?;
        let not_a =
            |kind: &str| ConfigError::invalid(key, format!("cannot parse '{value}' as {kind}"));

        let new_value = match existing {
            serde_json::Value::Bool(_) => {
                serde_json::Value::Bool(value.parse::<bool>().map_err(|_| not_a("bool"))?)
            }
            serde_json::Value::Number(_) => {
                if value == "none" {
                    serde_json::Value::Null
                } else if let Ok(n) = value.parse::<u64>() {
                    serde_json::Value::Number(n.into())
                } else {
                    value
                        .parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| not_a("number"))?
                }
            }
            // Unset optional numbers (seed)
            serde_json::Value::Null => match value {
                "" | "none" => serde_json::Value::Null,
                _ => {
                    let n = value.parse::<u64>().map_err(|_| not_a("integer"))?;
                    serde_json::Value::Number(n.into())
                }
            },
            serde_json::Value::Array(_) => parse_list(value),
            serde_json::Value::Object(_) => serde_json::from_str(value)?,
            serde_json::Value::String(_) => serde_json::Value::String(value.into()),
        };

        obj.insert(part.to_string(), new_value);
        return Ok(());
    }

    Err(unknown())
}

/// Accepts a JSON array or a comma separated list (`fear,happy`).
fn parse_list(value: &str) -> serde_json::Value {
    if let Ok(v @ serde_json::Value::Array(_)) = serde_json::from_str(value) {
        return v;
    }
    serde_json::Value::Array(
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| serde_json::Value::String(s.to_lowercase()))
            .collect(),
    )
}

/// Returns `~/.config/emojigo[-dev]/` based on EMOJIGO_ENV.
///
/// Set EMOJIGO_ENV=dev to use a development directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("EMOJIGO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("emojigo-dev")
    } else {
        base_dir.join("emojigo")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
