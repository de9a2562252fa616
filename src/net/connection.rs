//! Outbound connections.
//!
//! # Responsibilities
//! - Resolve a hostname to an IPv4 address
//! - Connect with a timeout and arm the read timeout
//! - Generate unique connection IDs for tracing
//! - Log when a connection is released
//!
//! # Design Decisions
//! - `Connector` is the seam the engine reconnects through on redirects,
//!   so tests can substitute scripted streams
//! - Streams are owned values; dropping one closes the socket

use std::fmt;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::TimeoutConfig;
use crate::error::{ClientError, Result};
use crate::http::ConnectionTarget;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Tag shared by every log line about one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Opens byte streams to targets.
pub trait Connector {
    type Stream: Read + Write;

    /// Establish a byte stream to `target.host:target.port`.
    fn connect(&mut self, target: &ConnectionTarget) -> Result<Self::Stream>;
}

/// Blocking TCP connector over IPv4.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl TcpConnector {
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(timeouts.connect_secs),
            read_timeout: Duration::from_secs(timeouts.read_secs),
        }
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new(&TimeoutConfig::default())
    }
}

impl Connector for TcpConnector {
    type Stream = Connection;

    fn connect(&mut self, target: &ConnectionTarget) -> Result<Connection> {
        let addr = resolve_ipv4(&target.host, target.port)?;

        let stream = TcpStream::connect_timeout(&addr, self.connect_timeout).map_err(|source| {
            ClientError::Connect {
                addr: addr.to_string(),
                source,
            }
        })?;
        stream
            .set_read_timeout(Some(self.read_timeout))
            .map_err(|source| ClientError::Connect {
                addr: addr.to_string(),
                source,
            })?;

        let id = ConnectionId::next();
        tracing::debug!(connection_id = %id, host = %target.host, %addr, "Connected");
        Ok(Connection { inner: stream, id })
    }
}

/// Resolve `host` to its first IPv4 socket address.
pub fn resolve_ipv4(host: &str, port: u16) -> Result<SocketAddr> {
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ClientError::Resolve {
            host: host.to_string(),
            source,
        })?;

    addrs
        .into_iter()
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| ClientError::NoIpv4Address(host.to_string()))
}

/// A connected TCP stream tagged with its ID.
#[derive(Debug)]
pub struct Connection {
    inner: TcpStream,
    id: ConnectionId,
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        tracing::trace!(connection_id = %self.id, "Connection closed");
    }
}

/// Write a full request and flush.
pub fn send_request<S: Write>(stream: &mut S, target: &ConnectionTarget, request: &str) -> Result<()> {
    tracing::debug!(host = %target.host, len = request.len(), request = %request.trim_end(), "Sending request");
    stream
        .write_all(request.as_bytes())
        .and_then(|_| stream.flush())
        .map_err(|source| ClientError::Send {
            host: target.host.clone(),
            source,
        })
}
