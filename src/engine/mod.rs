//! Response protocol engine.
//!
//! # Data Flow
//! ```text
//! Connected stream (request already sent)
//!     → buffer.rs (bounded reads until \r\n\r\n)
//!     → [http::response parses the head]
//!     → image/png: artifact.rs streams the body to disk
//!     → 3xx: redirect.rs resolves Location, engine reconnects and resends
//!     → otherwise: body finished, response delivered
//! ```
//!
//! # Design Decisions
//! - One engine per top-level request; buffer and redirect counter are owned
//! - Buffer bound is a hard error, never silent truncation
//! - Soft stops (no Location, non-HTTP redirect, limit) deliver the
//!   current response instead of failing

pub mod artifact;
pub mod buffer;
pub mod protocol;
pub mod redirect;

pub use artifact::SavedArtifact;
pub use protocol::{Delivery, EngineSettings, Outcome, ResponseEngine, StopReason};
pub use redirect::RedirectState;
