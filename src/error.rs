//! Error definitions shared by every subsystem.
//!
//! Errors fall into two tiers:
//! - Usage errors: bad arguments, bad URL syntax, invalid port, bad config.
//!   Reported with a usage hint, nothing is attempted on the network.
//! - Runtime errors: resolve/connect/send/receive failures, artifact I/O,
//!   malformed responses. Reported with the underlying cause.
//!
//! Soft stops (3xx without `Location`, redirect to an unsupported scheme,
//! redirect limit) are not errors; they surface as a delivered outcome.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Exit code for a delivered or saved response.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit code for runtime failures.
pub const EXIT_RUNTIME: u8 = 1;
/// Exit code for usage errors.
pub const EXIT_USAGE: u8 = 2;

/// Errors produced while fetching a URL.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed command line.
    #[error("{0}")]
    Usage(String),

    /// URL does not start with `http://` or `https://`.
    #[error("URL must start with http:// or https://, got '{0}'")]
    MissingScheme(String),

    /// URL has no host component.
    #[error("URL has an empty host: '{0}'")]
    EmptyHost(String),

    /// Port segment is not a number in 1..=65535.
    #[error("port must be a positive number less than 65536, got '{0}'")]
    InvalidPort(String),

    /// Query token without `=`.
    #[error("invalid query parameter '{0}': expected key=value")]
    InvalidParam(String),

    /// The starting URL uses HTTPS, which is not supported.
    #[error("HTTPS is not supported: {0}")]
    HttpsUnsupported(String),

    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Hostname resolution failed.
    #[error("failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    /// Hostname resolved, but not to any IPv4 address.
    #[error("no IPv4 address found for {0}")]
    NoIpv4Address(String),

    /// TCP connect failed.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Writing the request failed.
    #[error("failed to send request to {host}: {source}")]
    Send {
        host: String,
        #[source]
        source: io::Error,
    },

    /// Reading from the stream failed (includes read timeouts).
    #[error("failed to receive response: {0}")]
    Receive(#[source] io::Error),

    /// The receive buffer bound was exceeded.
    #[error("response exceeded the maximum size of {limit} bytes")]
    ResponseTooLarge { limit: usize },

    /// Peer closed before the header terminator arrived.
    #[error("connection closed before end of headers ({received} bytes received)")]
    IncompleteHeaders { received: usize },

    /// First line is not `HTTP/<version> <code>`.
    #[error("failed to parse status code from {0:?}")]
    MalformedStatusLine(String),

    /// Header fields after the status line are invalid or too numerous.
    #[error("malformed response headers: {0}")]
    MalformedHeaders(#[from] httparse::Error),

    /// The PNG artifact could not be created.
    #[error("failed to create {}: {source}", path.display())]
    ArtifactCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to the PNG artifact failed.
    #[error("failed to write {}: {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Peer closed before `Content-Length` bytes of a PNG body arrived.
    #[error("body truncated: expected {expected} bytes, received {received}")]
    TruncatedBody { expected: u64, received: u64 },

    /// The delivered response could not be written to stdout.
    #[error("failed to write response: {0}")]
    Output(#[source] io::Error),
}

impl ClientError {
    /// True for errors caused by bad input rather than the network or disk.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            ClientError::Usage(_)
                | ClientError::MissingScheme(_)
                | ClientError::EmptyHost(_)
                | ClientError::InvalidPort(_)
                | ClientError::InvalidParam(_)
                | ClientError::HttpsUnsupported(_)
                | ClientError::Config(_)
        )
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_usage() {
            EXIT_USAGE
        } else {
            EXIT_RUNTIME
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
