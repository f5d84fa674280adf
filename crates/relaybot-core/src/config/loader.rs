//! Config loader — reads `~/.relaybot/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.relaybot/config.json`
//! 3. Environment variables `RELAYBOT_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be
/// parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `RELAYBOT_<SECTION>__<FIELD>` (double underscore as
/// delimiter).
///
/// Supported overrides:
/// - `RELAYBOT_GATEWAY__HOST` → `gateway.host`
/// - `RELAYBOT_GATEWAY__PORT` → `gateway.port`
/// - `RELAYBOT_AGENTS__DEFAULTS__MODEL` → `agents.defaults.model`
/// - `RELAYBOT_AGENTS__DEFAULTS__MAX_ITERATIONS` → `agents.defaults.max_iterations`
/// - `RELAYBOT_MODEL__API_KEY` → `model.api_key`
/// - `RELAYBOT_MODEL__API_BASE` → `model.api_base`
/// - `RELAYBOT_KNOWLEDGE__BASE_URL` → `knowledge.base_url`
/// - `RELAYBOT_KNOWLEDGE__ENABLED` → `knowledge.enabled`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("RELAYBOT_GATEWAY__HOST") {
        config.gateway.host = val;
    }
    if let Ok(val) = std::env::var("RELAYBOT_GATEWAY__PORT") {
        if let Ok(n) = val.parse::<u16>() {
            config.gateway.port = n;
        }
    }
    if let Ok(val) = std::env::var("RELAYBOT_AGENTS__DEFAULTS__MODEL") {
        config.agents.defaults.model = val;
    }
    if let Ok(val) = std::env::var("RELAYBOT_AGENTS__DEFAULTS__MAX_ITERATIONS") {
        if let Ok(n) = val.parse::<u32>() {
            config.agents.defaults.max_iterations = n;
        }
    }
    if let Ok(val) = std::env::var("RELAYBOT_MODEL__API_KEY") {
        config.model.api_key = val;
    }
    if let Ok(val) = std::env::var("RELAYBOT_MODEL__API_BASE") {
        config.model.api_base = val;
    }
    if let Ok(val) = std::env::var("RELAYBOT_KNOWLEDGE__BASE_URL") {
        config.knowledge.base_url = val;
    }
    if let Ok(val) = std::env::var("RELAYBOT_KNOWLEDGE__ENABLED") {
        config.knowledge.enabled = matches!(val.as_str(), "1" | "true" | "yes");
    }
    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("nope.json")));
        assert_eq!(config.gateway.port, 8765);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"gateway": {"port": 9100}}"#).unwrap();

        let config = load_config(Some(&path));
        assert_eq!(config.gateway.port, 9100);
    }

    #[test]
    fn test_invalid_json_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let config = load_config(Some(&path));
        assert_eq!(config.gateway.port, 8765);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("config.json");

        let mut config = Config::default();
        config.model.api_base = "http://localhost:9999/v1".to_string();
        save_config(&config, Some(&path)).unwrap();

        let loaded = load_config(Some(&path));
        assert_eq!(loaded.model.api_base, "http://localhost:9999/v1");
    }
}
