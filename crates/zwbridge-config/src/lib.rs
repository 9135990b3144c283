//! Configuration for the zwbridge CLI and embedding hosts.
//!
//! TOML file + `ZWBRIDGE_` environment overrides, validated and
//! translated to `zwbridge_core::BridgeConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use zwbridge_core::config::DEFAULT_DEVICE;
use zwbridge_core::{BridgeConfig, ManagerOptions};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Serial device of the controller stick.
    #[serde(default = "default_device")]
    pub device: String,

    /// Default output format for the CLI.
    #[serde(default = "default_output")]
    pub output: String,

    /// Controller library options.
    #[serde(default)]
    pub options: OptionsSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: default_device(),
            output: default_output(),
            options: OptionsSection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OptionsSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_path: Option<PathBuf>,
    pub console_output: bool,
    pub logging: bool,
    pub save_configuration: bool,
    /// 0 retries forever.
    pub driver_max_attempts: u32,
    /// Milliseconds.
    pub poll_interval: u64,
    pub interval_between_polls: bool,
    pub suppress_value_refresh: bool,
}

impl Default for OptionsSection {
    fn default() -> Self {
        let options = ManagerOptions::default();
        Self {
            config_path: options.config_path,
            user_path: options.user_path,
            console_output: options.console_output,
            logging: options.logging,
            save_configuration: options.save_configuration,
            driver_max_attempts: options.driver_max_attempts,
            poll_interval: u64::try_from(options.poll_interval.as_millis()).unwrap_or(u64::MAX),
            interval_between_polls: options.interval_between_polls,
            suppress_value_refresh: options.suppress_value_refresh,
        }
    }
}

fn default_device() -> String {
    DEFAULT_DEVICE.into()
}
fn default_output() -> String {
    "table".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "zwbridge", "zwbridge").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("zwbridge");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file + environment. A missing file yields the
/// defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ZWBRIDGE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.device.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "device".into(),
            reason: "must not be empty".into(),
        });
    }
    if cfg.options.poll_interval == 0 {
        return Err(ConfigError::Validation {
            field: "options.poll_interval".into(),
            reason: "must be at least 1 ms".into(),
        });
    }
    Ok(())
}

/// Validate and build the core `BridgeConfig`.
pub fn to_bridge_config(cfg: &Config) -> Result<BridgeConfig, ConfigError> {
    validate(cfg)?;
    let o = &cfg.options;
    Ok(BridgeConfig {
        device: cfg.device.clone(),
        options: ManagerOptions {
            config_path: o.config_path.clone(),
            user_path: o.user_path.clone(),
            console_output: o.console_output,
            logging: o.logging,
            save_configuration: o.save_configuration,
            driver_max_attempts: o.driver_max_attempts,
            poll_interval: Duration::from_millis(o.poll_interval),
            interval_between_polls: o.interval_between_polls,
            suppress_value_refresh: o.suppress_value_refresh,
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_match_manager_options() {
        let bridge = to_bridge_config(&Config::default()).unwrap();
        assert_eq!(bridge, BridgeConfig::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.output, "table");
        assert_eq!(cfg.options.poll_interval, 30_000);
    }

    #[test]
    fn partial_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "device = \"/dev/ttyACM0\"\n\n[options]\npoll_interval = 500\nsuppress_value_refresh = true\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.device, "/dev/ttyACM0");
        assert!(cfg.options.interval_between_polls);

        let bridge = to_bridge_config(&cfg).unwrap();
        assert_eq!(bridge.options.poll_interval, Duration::from_millis(500));
        assert!(bridge.options.suppress_value_refresh);
    }

    #[test]
    fn malformed_file_is_a_figment_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[options]\npoll_interval = \"soon\"\n").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Figment(_))
        ));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.options.user_path = Some(PathBuf::from("/var/lib/zwbridge"));
        cfg.options.driver_max_attempts = 3;

        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn validation_rejects_empty_device_and_zero_interval() {
        let mut cfg = Config {
            device: "  ".into(),
            ..Config::default()
        };
        let err = to_bridge_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("device"));

        cfg.device = "/dev/ttyUSB1".into();
        cfg.options.poll_interval = 0;
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("poll_interval"));
    }

    #[test]
    fn zero_attempts_means_retry_forever() {
        let mut cfg = Config::default();
        cfg.options.driver_max_attempts = 0;
        assert!(validate(&cfg).is_ok());
    }
}
