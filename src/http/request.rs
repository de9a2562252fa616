//! GET request construction.

use crate::http::url::ConnectionTarget;

/// Format a GET request. `query` is appended to `path` verbatim and must be
/// empty or start with `?`.
pub fn build(host: &str, path: &str, query: &str) -> String {
    format!("GET {path}{query} HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n")
}

/// Request for a parsed target.
pub fn build_for(target: &ConnectionTarget, query: &str) -> String {
    build(&target.host_header(), &target.path, query)
}
