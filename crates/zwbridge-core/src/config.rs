// ── Runtime configuration for the bridge ──
//
// These types are constructed by the CLI (from TOML via figment) or by
// an embedding host directly. The core crate never reads files itself.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default serial device for the controller stick.
pub const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";

/// Options applied to the controller library once, then locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerOptions {
    /// Device-database directory. `None` lets the controller pick its default.
    pub config_path: Option<PathBuf>,
    /// Writable directory for the controller's cache and logs.
    pub user_path: Option<PathBuf>,
    pub console_output: bool,
    pub logging: bool,
    pub save_configuration: bool,
    /// Connection attempts before giving up; 0 retries forever.
    pub driver_max_attempts: u32,
    pub poll_interval: Duration,
    /// Spread polls across the interval instead of polling every value at once.
    pub interval_between_polls: bool,
    pub suppress_value_refresh: bool,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            user_path: None,
            console_output: false,
            logging: false,
            save_configuration: false,
            driver_max_attempts: 0,
            poll_interval: Duration::from_secs(30),
            interval_between_polls: true,
            suppress_value_refresh: false,
        }
    }
}

/// Everything needed to construct a [`Bridge`](crate::Bridge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Serial device the driver is attached to.
    pub device: String,
    pub options: ManagerOptions,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.into(),
            options: ManagerOptions::default(),
        }
    }
}
