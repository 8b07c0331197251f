use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vlarm_client::PhosphobotClientConfig;

use crate::Error;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct VlarmConfig {
    /// Name reported to the host in `initialize`.
    #[serde(default = "default_server_name")]
    pub server_name: String,
    #[serde(default)]
    pub client: PhosphobotClientConfig,
}

impl Default for VlarmConfig {
    fn default() -> Self {
        Self {
            server_name: default_server_name(),
            client: PhosphobotClientConfig::default(),
        }
    }
}

fn default_server_name() -> String {
    "vlarm".to_owned()
}

impl VlarmConfig {
    pub fn try_new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_str(
            &fs_err::read_to_string(&path)
                .map_err(|e| Error::NoFile(path.as_ref().to_owned(), e))?,
            &path,
        )
    }

    pub fn from_str<P: AsRef<Path>>(s: &str, path: P) -> Result<Self, Error> {
        let config: VlarmConfig =
            toml::from_str(s).map_err(|e| Error::TomlParseFailure(path.as_ref().to_owned(), e))?;
        debug!(path = ?path.as_ref(), ?config, "loaded config");
        Ok(config)
    }
}
