//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_file(global);

    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            // Fails on invalid settings, so `show` doubles as a check.
            config::to_bridge_config(&cfg)?;
            let format = config::output_format(global, &cfg)?;
            output::print_output(&render(&cfg, format)?, global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            config::save_config_to(&Config::default(), &path)?;
            output::print_output(
                &format!("Wrote default configuration to {}", path.display()),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}

fn render(cfg: &Config, format: OutputFormat) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(cfg)?
            .trim_end()
            .to_owned(),
        OutputFormat::Json => output::render_json_pretty(cfg),
        OutputFormat::JsonCompact => output::render_json_compact(cfg),
    })
}
