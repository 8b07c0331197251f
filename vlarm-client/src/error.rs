use std::{fmt, time::Duration};

use thiserror::Error;

/// Coarse category of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Network,
    Timeout,
    HttpStatus,
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::HttpStatus => "http-status",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("vlarm-client: Connection error url:{}: {}", url, message)]
    Network { url: String, message: String },
    #[error("vlarm-client: Timeout url:{} after {:?}", url, timeout)]
    Timeout { url: String, timeout: Duration },
    #[error("vlarm-client: Status {} url:{} ({})", status, url, reason)]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },
    #[error("vlarm-client: Invalid url {:?} ({})", .0, .1)]
    InvalidUrl(String, #[source] url::ParseError),
    #[error("vlarm-client: Invalid {}={} (expected a positive number of seconds)", name, value)]
    InvalidTimeout { name: &'static str, value: f64 },
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network { .. } => FailureKind::Network,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::HttpStatus { .. } => FailureKind::HttpStatus,
            Self::InvalidUrl(..) | Self::InvalidTimeout { .. } => FailureKind::Unknown,
        }
    }
}
