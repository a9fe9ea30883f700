//! Config command handlers. None of these contact the controller.

use secrecy::SecretString;

use isminet_config::{ConfigError, Settings};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat, SetKeyArgs};
use crate::error::CliError;
use crate::output;

use super::{load_settings, util};

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let settings = load_settings(global)?;
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => settings.to_toml()?,
                format => output::render_structured(format, &settings)?,
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(isminet_config::config_path);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetKey(args) => set_key(args, global),
    }
}

fn set_key(args: SetKeyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let host = match args.host {
        Some(host) => host,
        None => {
            let settings: Settings = Settings::figment(global.config.as_deref())
                .extract()
                .map_err(ConfigError::from)?;
            settings.host
        }
    };
    let key = match args.key {
        Some(key) => key,
        None => util::read_line(&mut std::io::stdin().lock())?,
    };
    if key.is_empty() {
        return Err(CliError::Validation {
            field: "key".into(),
            reason: "API key must not be empty".into(),
        });
    }
    isminet_config::store_api_key(&host, &SecretString::from(key))?;
    output::print_output(&format!("Stored API key for {host}"), global.quiet);
    Ok(())
}
