//! URL parsing into a connection target.
//!
//! # Responsibilities
//! - Recognise `http://` and `https://` prefixes
//! - Split the remainder into host, optional `:port` and optional path
//! - Validate the port range
//!
//! # Design Decisions
//! - A colon is a port separator only if it comes before the first `/`
//!   (`host/a:b` has no port)
//! - Missing path defaults to `/`, missing port to the scheme default
//! - Plain string handling; no percent-decoding or normalisation

use std::fmt;

use crate::error::{ClientError, Result};

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// URL scheme of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Port used when the URL does not name one.
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    /// Prefix including `://`.
    pub fn prefix(self) -> &'static str {
        match self {
            Scheme::Http => HTTP_PREFIX,
            Scheme::Https => HTTPS_PREFIX,
        }
    }
}

/// Where a request goes: scheme, host, port and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl ConnectionTarget {
    /// Parse an absolute `http://` or `https://` URL.
    pub fn parse(url: &str) -> Result<Self> {
        let (scheme, rest) = if let Some(rest) = url.strip_prefix(HTTP_PREFIX) {
            (Scheme::Http, rest)
        } else if let Some(rest) = url.strip_prefix(HTTPS_PREFIX) {
            (Scheme::Https, rest)
        } else {
            return Err(ClientError::MissingScheme(url.to_string()));
        };

        let slash = rest.find('/');
        let colon = rest.find(':').filter(|&c| slash.map_or(true, |s| c < s));

        let (authority, path) = match slash {
            Some(s) => (&rest[..s], &rest[s..]),
            None => (rest, "/"),
        };

        let (host, port) = match colon {
            Some(c) => (&authority[..c], parse_port(&authority[c + 1..])?),
            None => (authority, scheme.default_port()),
        };

        if host.is_empty() {
            return Err(ClientError::EmptyHost(url.to_string()));
        }

        Ok(Self {
            scheme,
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }

    /// Value for the `Host` request header; the port is included only when
    /// it differs from the scheme default.
    pub fn host_header(&self) -> String {
        if self.port == self.scheme.default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// True for targets this client can talk to.
    pub fn is_plain_http(&self) -> bool {
        self.scheme == Scheme::Http
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.scheme.prefix(), self.host_header(), self.path)
    }
}

/// Parse a decimal port in 1..=65535.
fn parse_port(raw: &str) -> Result<u16> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClientError::InvalidPort(raw.to_string()));
    }
    match raw.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ClientError::InvalidPort(raw.to_string())),
    }
}
