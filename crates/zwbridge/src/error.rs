//! CLI error types with miette diagnostics.
//!
//! Maps bridge and config failures into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use zwbridge_config::ConfigError;
use zwbridge_core::{BridgeError, ControllerError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Scenario ─────────────────────────────────────────────────────
    #[error("Invalid scenario {path}: {reason}")]
    #[diagnostic(
        code(zwbridge::scenario),
        help("Check the scenario file; steps are `notify`, `startup` or `update`.")
    )]
    Scenario { path: String, reason: String },

    // ── Bridge ───────────────────────────────────────────────────────
    #[error("Could not attach driver for {device}")]
    #[diagnostic(
        code(zwbridge::connection_failed),
        help("Check that {device} is the controller's serial device.")
    )]
    ConnectionFailed {
        device: String,
        #[source]
        source: ControllerError,
    },

    #[error("Controller rejected the operation: {0}")]
    #[diagnostic(code(zwbridge::controller))]
    Controller(ControllerError),

    #[error("Bridge error: {0}")]
    #[diagnostic(code(zwbridge::bridge))]
    Bridge(BridgeError),

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(
        code(zwbridge::validation),
        help("Run: zwbridge config show  to inspect the resolved configuration")
    )]
    Validation { field: String, reason: String },

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(zwbridge::config_exists),
        help("Use --force to overwrite it.\nPath: {path}")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(zwbridge::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error("Could not read {path}")]
    #[diagnostic(code(zwbridge::io))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render TOML: {0}")]
    #[diagnostic(code(zwbridge::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Validation { .. } | Self::Scenario { .. } => exit_code::USAGE,
            Self::Read { .. } => exit_code::NOT_FOUND,
            Self::ConfigExists { .. } => exit_code::CONFLICT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Lower layers → CliError ──────────────────────────────────────────

impl From<BridgeError> for CliError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Controller(inner) => Self::Controller(inner),
            other => Self::Bridge(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
