pub mod check;
pub mod config_cmd;
pub mod run;

use std::path::{Path, PathBuf};

use shieldbot_config::Config;
use shieldbot_core::RelayConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file in effect: `--config` if given, else the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(shieldbot_config::config_path)
}

pub fn load(path: &Path) -> Result<Config, CliError> {
    shieldbot_config::load_config(Some(path)).map_err(|e| CliError::from_config(e, path))
}

/// Load, validate and resolve secrets into the runtime configuration.
pub fn relay_config(global: &GlobalOpts) -> Result<RelayConfig, CliError> {
    let path = config_file(global);
    let cfg = load(&path)?;
    shieldbot_config::to_relay_config(&cfg).map_err(|e| CliError::from_config(e, &path))
}
