//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ConnectionTarget
//!     → connection.rs (resolve IPv4, connect with timeout, arm read timeout)
//!     → send_request (write request, flush)
//!     → Hand the stream to the response engine
//! ```
//!
//! # Design Decisions
//! - Blocking sockets, one connection at a time
//! - Every read has a deadline; a stalled peer surfaces as a receive error
//! - Each connection tracked with an ID for log correlation

pub mod connection;

pub use connection::{send_request, Connection, ConnectionId, Connector, TcpConnector};
