//! Config subcommand handlers.

use portsec_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = redact(crate::config::load(global)?);
            let out = output::render_single(&global.output, &cfg, |c| {
                toml::to_string_pretty(c).unwrap_or_else(|e| format!("# cannot render config: {e}"))
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&portsec_config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = portsec_config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            let written = portsec_config::save_config(&Config::starter())?;
            if !global.quiet {
                eprintln!("Configuration written to {}", written.display());
                eprintln!("  Try it: portsec interfaces");
            }
            Ok(())
        }
    }
}

/// Mask stored secrets before a config leaves the process.
fn redact(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
        if profile.enable_secret.is_some() {
            profile.enable_secret = Some(REDACTED.into());
        }
    }
    cfg
}
