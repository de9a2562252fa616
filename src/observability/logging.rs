//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Route log output to stderr so stdout carries only the response
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for a configured level, scoped to the library and the
/// `client` binary.
pub fn default_directive(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    format!("plain_http_client={level},client={level}")
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(level).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(
            default_directive("DEBUG"),
            "plain_http_client=debug,client=debug"
        );
    }

    #[test]
    fn test_init_twice() {
        init("info");
        init("debug");
    }
}
