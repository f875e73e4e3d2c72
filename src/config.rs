//! Engine configuration.
//!
//! Defaults work out of the box; an optional TOML file and `VITRINE_*`
//! environment variables override them, in that order.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::views::DEFAULT_RECENT_CAP;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Session-storage key marking the visit as counted.
    pub session_marker_key: String,
    /// Query parameter carrying the deep-link vehicle id.
    pub deeplink_param: String,
    /// Display cap for the recent view.
    pub recent_cap: usize,
    /// Public origin used when building share links.
    pub site_origin: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session_marker_key: "exclusive_visited_session".to_string(),
            deeplink_param: "v".to_string(),
            recent_cap: DEFAULT_RECENT_CAP,
            site_origin: String::new(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file, then apply environment overrides. A missing
    /// file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// `VITRINE_SESSION_KEY`, `VITRINE_DEEPLINK_PARAM`, `VITRINE_RECENT_CAP`
    /// and `VITRINE_SITE_ORIGIN` override the loaded values.
    pub fn apply_env_overrides(&mut self) {
        if let Some(key) = non_empty_env("VITRINE_SESSION_KEY") {
            self.session_marker_key = key;
        }
        if let Some(param) = non_empty_env("VITRINE_DEEPLINK_PARAM") {
            self.deeplink_param = param;
        }
        if let Some(cap) = non_empty_env("VITRINE_RECENT_CAP") {
            if let Ok(cap) = cap.parse() {
                self.recent_cap = cap;
            }
        }
        if let Some(origin) = non_empty_env("VITRINE_SITE_ORIGIN") {
            self.site_origin = origin;
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_usable() {
        let config = EngineConfig::default();
        assert_eq!(config.deeplink_param, "v");
        assert_eq!(config.recent_cap, DEFAULT_RECENT_CAP);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = EngineConfig::load(&dir.path().join("vitrine.toml")).expect("load");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vitrine.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "recent_cap = 12\nsite_origin = \"https://example.com\"").expect("write");
        let config = EngineConfig::load(&path).expect("load");
        assert_eq!(config.recent_cap, 12);
        assert_eq!(config.site_origin, "https://example.com");
        assert_eq!(config.deeplink_param, "v");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vitrine.toml");
        std::fs::write(&path, "recent_cap = \"ten\"").expect("write");
        assert!(matches!(
            EngineConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
