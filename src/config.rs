//! Game configuration
//!
//! Level parameters and logging preferences, persisted as JSON in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
pub use crate::sim::level::{LevelSpec, SeedMode};

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

/// Largest integer a JS number holds exactly
const MAX_SAFE_SEED: f64 = 9_007_199_254_740_991.0;

/// Convert a seed from the host page. Anything that is not a whole number
/// in `0..=2^53 - 1` is rejected rather than clamped.
pub fn seed_from_f64(seed: f64) -> Result<u64, ConfigError> {
    if !seed.is_finite() || seed < 0.0 || seed.fract() != 0.0 || seed > MAX_SAFE_SEED {
        return Err(ConfigError::InvalidSeed(seed));
    }
    Ok(seed as u64)
}

/// Everything a player or host page can tune
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Block count, allowed obstacle types and seed
    pub level: LevelSpec,
    /// Whether the seed seeds the generator or only forces a reroll
    pub seed_mode: SeedMode,
    pub log_level: LogLevel,
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.level.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Same level parameters with a new seed (forces regeneration)
    pub fn reseeded(&self, seed: u64) -> Self {
        let mut config = self.clone();
        config.level.seed = seed;
        config
    }

    /// Like [`GameConfig::reseeded`], for a seed that arrived as a JS number
    pub fn reseeded_from_f64(&self, seed: f64) -> Result<Self, ConfigError> {
        Ok(self.reseeded(seed_from_f64(seed)?))
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "marble_dash_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LevelError;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.level.count, 5);
        assert_eq!(config.level.allowed_types, vec!["spinner", "limbo", "axe"]);
        assert_eq!(config.level.seed, 0);
        assert_eq!(config.seed_mode, SeedMode::Deterministic);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_partial_json() {
        let config = GameConfig::from_json(r#"{"level": {"count": 10}, "seed_mode": "reroll"}"#).unwrap();
        assert_eq!(config.level.count, 10);
        assert_eq!(config.level.allowed_types.len(), 3);
        assert_eq!(config.seed_mode, SeedMode::Reroll);

        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig::default().reseeded(77);
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            GameConfig::from_json(r#"{"level": {"allowed_types": []}}"#),
            Err(ConfigError::Level(LevelError::EmptyAllowedTypes))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"level": {"allowed_types": ["ramp"]}}"#),
            Err(ConfigError::Level(LevelError::UnknownVariant(_)))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"level": {"count": -2}}"#),
            Err(ConfigError::Level(LevelError::NegativeCount(-2)))
        ));
        assert!(matches!(GameConfig::from_json("not json"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_seed_from_host() {
        assert_eq!(seed_from_f64(0.0).unwrap(), 0);
        assert_eq!(seed_from_f64(42.0).unwrap(), 42);
        assert_eq!(seed_from_f64(MAX_SAFE_SEED).unwrap(), 9_007_199_254_740_991);

        for bad in [-1.0, 2.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e300] {
            assert!(matches!(seed_from_f64(bad), Err(ConfigError::InvalidSeed(_))), "{bad}");
        }

        let config = GameConfig::default();
        assert_eq!(config.reseeded_from_f64(7.0).unwrap().level.seed, 7);
        assert!(config.reseeded_from_f64(-7.0).is_err());
    }

    #[test]
    fn test_log_level_names() {
        for level in [LogLevel::Error, LogLevel::Warn, LogLevel::Info, LogLevel::Debug] {
            assert_eq!(LogLevel::from_str(level.as_str()), Some(level));
        }
        assert_eq!(LogLevel::from_str("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("loud"), None);
        assert_eq!(LogLevel::Debug.to_level(), log::Level::Debug);
    }
}
