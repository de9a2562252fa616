//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! URL string
//!     → url.rs (scheme, host, port, path)
//!     → query.rs (optional ?k=v&... from CLI tokens)
//!     → request.rs (GET request text, Connection: close)
//!     → [net layer sends it]
//!     → response.rs (head parsing for the engine)
//! ```

pub mod query;
pub mod request;
pub mod response;
pub mod url;

pub use query::QueryString;
pub use response::ResponseHeaders;
pub use url::{ConnectionTarget, Scheme};
