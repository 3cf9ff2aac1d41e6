//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::commands;
use crate::error::CliError;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = commands::config_file(global);
    match args.command {
        ConfigCommand::Path => {
            println!("{}", path.display());
        }
        ConfigCommand::Show => {
            let cfg = commands::load(&path)?;
            let shown = shieldbot_config::redacted(&cfg);
            let toml = shieldbot_config::to_toml(&shown).map_err(|e| CliError::from_config(e, &path))?;
            print!("{toml}");
        }
    }
    Ok(())
}
