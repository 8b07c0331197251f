use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("vlarm-command: No Command={} is found.", .0)]
    UnknownCommand(String),
    #[error("vlarm-command: Command={} is registered twice.", .0)]
    DuplicateCommand(String),
    #[error("vlarm-command: Invalid arguments for Command={} ({}).", .0, .1)]
    InvalidArguments(String, #[source] serde_json::Error),
    #[error("vlarm-command: vlarm-client: {}", .0)]
    Request(#[from] vlarm_client::Error),
}
