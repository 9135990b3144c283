//! Command handlers: CLI args -> bridge runs -> output formatting.

pub mod config_cmd;
pub mod replay;
