//! Minimal plain-HTTP GET client.
//!
//! Parses a URL, sends a GET over raw TCP, follows redirects up to a limit
//! and saves `image/png` bodies to disk.

pub mod cli;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod net;
pub mod observability;

pub use client::Client;
pub use config::ClientConfig;
pub use engine::{Delivery, Outcome, StopReason};
pub use error::{ClientError, Result};
