//! CLI-side configuration: `GlobalOpts`-aware wrappers over `zwbridge-config`.

use std::path::PathBuf;

use clap::ValueEnum;

pub use zwbridge_config::{Config, load_config_from, save_config_to, to_bridge_config};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// `--config` if given, else the platform config path.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(zwbridge_config::config_path)
}

/// Load the config the current invocation should use.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_config_from(&config_file(global))?)
}

/// `--output` wins over the config file's `output`.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    if let Some(format) = global.output {
        return Ok(format);
    }
    OutputFormat::from_str(&cfg.output, true).map_err(|reason| CliError::Validation {
        field: "output".into(),
        reason,
    })
}
