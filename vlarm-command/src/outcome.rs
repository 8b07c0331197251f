use std::fmt;

use vlarm_client::FailureKind;

/// Result of one command as seen by the host.
///
/// The external form is always the fixed message of the command. The
/// request error behind a failure is kept for logging only.
#[derive(Debug)]
pub enum Outcome {
    Success {
        message: &'static str,
    },
    Error {
        message: &'static str,
        cause: vlarm_client::Error,
    },
}

impl Outcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success { message } | Self::Error { message, .. } => *message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn cause(&self) -> Option<&vlarm_client::Error> {
        match self {
            Self::Success { .. } => None,
            Self::Error { cause, .. } => Some(cause),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.cause().map(vlarm_client::Error::kind)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
