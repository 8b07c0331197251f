use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("vlarm-apps: Failed to parse {:?} as toml ({}).", .0, .1)]
    TomlParseFailure(PathBuf, #[source] toml::de::Error),
    #[error("vlarm-apps: No File {:?} is found ({}).", .0, .1)]
    NoFile(PathBuf, #[source] std::io::Error),
    #[error("vlarm-apps: I/O error on stdio ({}).", .0)]
    Io(#[from] std::io::Error),
    #[error("vlarm-apps: Failed to encode response ({}).", .0)]
    Json(#[from] serde_json::Error),
    #[error("vlarm-apps: vlarm-command: {}", .0)]
    VlarmCommand(#[from] vlarm_command::Error),
}
