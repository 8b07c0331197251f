use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::{Error, VlarmConfig};

pub const CONFIG_PATH_ENV: &str = "VLARM_CONFIG_PATH";

/// Setting file named on the command line, else by `VLARM_CONFIG_PATH`.
pub fn config_path(cli: Option<PathBuf>) -> Option<PathBuf> {
    select_config_path(cli, env::var_os(CONFIG_PATH_ENV))
}

fn select_config_path(cli: Option<PathBuf>, env: Option<OsString>) -> Option<PathBuf> {
    cli.or_else(|| {
        let path = PathBuf::from(env.filter(|value| !value.is_empty())?);
        warn!(path = %path.display(), "setting file taken from {CONFIG_PATH_ENV}");
        Some(path)
    })
}

/// Loads the setting file if one is given, the defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<VlarmConfig, Error> {
    match path {
        Some(path) => VlarmConfig::try_new(path),
        None => Ok(VlarmConfig::default()),
    }
}

/// Logs go to stderr; stdout carries the protocol.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
