//! Redirect bookkeeping and `Location` resolution.

use crate::http::url::{ConnectionTarget, Scheme};

/// Redirect counter for one top-level request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectState {
    attempts_made: u32,
    max_attempts: u32,
}

impl RedirectState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempts_made: 0,
            max_attempts,
        }
    }

    /// True while another redirect may be followed.
    pub fn can_follow(&self) -> bool {
        self.attempts_made < self.max_attempts
    }

    pub fn record(&mut self) {
        self.attempts_made += 1;
    }

    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Turn a `Location` value into an absolute URL.
///
/// Absolute `http://`/`https://` values pass through unchanged. Anything else
/// is treated as a path on the current host over plain HTTP; the port is kept
/// when it is not 80.
pub fn resolve_location(location: &str, current: &ConnectionTarget) -> String {
    if location.starts_with(Scheme::Http.prefix()) || location.starts_with(Scheme::Https.prefix()) {
        return location.to_string();
    }

    let slash = if location.starts_with('/') { "" } else { "/" };
    if current.port == Scheme::Http.default_port() {
        format!("http://{}{}{}", current.host, slash, location)
    } else {
        format!("http://{}:{}{}{}", current.host, current.port, slash, location)
    }
}
