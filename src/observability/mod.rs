//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (host, status, connection_id)
//!
//! Consumers:
//!     → logging.rs (fmt layer on stderr, EnvFilter)
//! ```

pub mod logging;
