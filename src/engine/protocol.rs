//! The response protocol loop.
//!
//! # State Machine
//! ```text
//! ReadHead ──terminator──▶ Classify
//!    │                       ├─ image/png ──▶ StreamArtifact ──▶ SavedBinary
//!    │                       ├─ non-3xx ────▶ FinishBody ──────▶ Delivered(Final)
//!    │                       └─ 3xx ────────▶ Redirect
//!    │                                          ├─ no Location ─▶ Delivered(MissingLocation)
//!    │                                          ├─ not http:// ─▶ Delivered(UnsupportedScheme)
//!    │                                          ├─ limit hit ───▶ Delivered(RedirectLimit)
//!    └──────────── reconnect + send ◀───────────┘
//! ```
//!
//! # Design Decisions
//! - The stream is an owned value; replacing or dropping it closes the socket
//! - Every failure is a `ClientError` returned through `?`; nothing exits early
//! - PNG payloads bypass the receive buffer bound and are never followed

use std::path::PathBuf;

use crate::config::ClientConfig;
use crate::engine::artifact::{save_payload, SavedArtifact};
use crate::engine::buffer::ReceiveBuffer;
use crate::engine::redirect::{resolve_location, RedirectState};
use crate::error::{ClientError, Result};
use crate::http::request;
use crate::http::response::{is_redirect, ResponseHeaders};
use crate::http::url::{ConnectionTarget, Scheme};
use crate::net::connection::{send_request, Connector};

/// Engine limits and output location.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub max_response_bytes: usize,
    pub max_redirects: u32,
    pub png_path: PathBuf,
}

impl From<&ClientConfig> for EngineSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            max_response_bytes: config.limits.max_response_bytes,
            max_redirects: config.limits.max_redirects,
            png_path: config.output.png_path.clone(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

/// Why a text response was delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Non-redirect status.
    Final,
    /// 3xx without a `Location` header.
    MissingLocation,
    /// 3xx pointing at a scheme other than plain HTTP.
    UnsupportedScheme(String),
    /// 3xx received after the redirect limit was used up.
    RedirectLimit,
}

/// A textual response handed back to the caller.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub status: u16,
    /// Status line, headers and body exactly as received.
    pub response: Vec<u8>,
    pub header_len: usize,
    pub redirects: u32,
    pub reason: StopReason,
}

impl Delivery {
    pub fn head(&self) -> &[u8] {
        &self.response[..self.header_len]
    }

    pub fn body(&self) -> &[u8] {
        &self.response[self.header_len..]
    }
}

/// Result of one top-level request.
#[derive(Debug, Clone)]
pub enum Outcome {
    Delivered(Delivery),
    SavedBinary {
        artifact: SavedArtifact,
        redirects: u32,
    },
}

/// Reads responses, follows redirects and persists PNG payloads.
pub struct ResponseEngine<C: Connector> {
    connector: C,
    buffer: ReceiveBuffer,
    redirects: RedirectState,
    png_path: PathBuf,
}

impl<C: Connector> ResponseEngine<C> {
    pub fn new(connector: C, settings: EngineSettings) -> Self {
        Self {
            connector,
            buffer: ReceiveBuffer::new(settings.max_response_bytes),
            redirects: RedirectState::new(settings.max_redirects),
            png_path: settings.png_path,
        }
    }

    /// Connector used for the initial connection and every redirect.
    pub fn connector_mut(&mut self) -> &mut C {
        &mut self.connector
    }

    /// Consume `stream`, which already carries the request for `target`, and
    /// drive the exchange to an outcome.
    pub fn run(&mut self, stream: C::Stream, target: ConnectionTarget) -> Result<Outcome> {
        self.redirects = RedirectState::new(self.redirects.max_attempts());
        let mut stream = stream;
        let mut target = target;

        loop {
            self.buffer.clear();
            let header_len = self.read_head(&mut stream)?;
            let head = ResponseHeaders::parse(&self.buffer.as_slice()[..header_len])?;
            tracing::debug!(
                host = %target.host,
                headers = %String::from_utf8_lossy(&self.buffer.as_slice()[..header_len]).trim_end(),
                "Headers received"
            );

            if head.is_png() {
                let artifact = save_payload(
                    &self.png_path,
                    &self.buffer.as_slice()[header_len..],
                    &mut stream,
                    head.content_length(),
                )?;
                tracing::info!(
                    path = %artifact.path.display(),
                    bytes = artifact.bytes,
                    "Saved image/png payload"
                );
                return Ok(Outcome::SavedBinary {
                    artifact,
                    redirects: self.redirects.attempts_made(),
                });
            }

            let status = head.status_code().inspect_err(|_| {
                tracing::warn!(
                    host = %target.host,
                    status_line = head.status_line(),
                    "Unparsable status line"
                );
            })?;
            if !is_redirect(status) {
                return self.deliver(&mut stream, &head, status, StopReason::Final);
            }

            let Some(location) = head.location() else {
                tracing::warn!(status, "No Location header found, delivering response as-is");
                return self.deliver(&mut stream, &head, status, StopReason::MissingLocation);
            };

            let next_url = resolve_location(location, &target);
            if !next_url.starts_with(Scheme::Http.prefix()) {
                tracing::warn!(location = %next_url, "Redirection to non-HTTP URL, not following");
                return self.deliver(
                    &mut stream,
                    &head,
                    status,
                    StopReason::UnsupportedScheme(next_url),
                );
            }

            if !self.redirects.can_follow() {
                tracing::warn!(
                    max_redirects = self.redirects.max_attempts(),
                    location = %next_url,
                    "Redirect limit reached, delivering current response"
                );
                return self.deliver(&mut stream, &head, status, StopReason::RedirectLimit);
            }

            let next = ConnectionTarget::parse(&next_url)?;
            tracing::info!(
                status,
                from = %target,
                to = %next,
                redirect = self.redirects.attempts_made() + 1,
                "Following redirect"
            );

            drop(stream);
            stream = self.connector.connect(&next)?;
            send_request(&mut stream, &next, &request::build_for(&next, ""))?;
            self.redirects.record();
            target = next;
        }
    }

    /// Fill the buffer until it holds a complete header block.
    fn read_head(&mut self, stream: &mut C::Stream) -> Result<usize> {
        loop {
            if let Some(end) = self.buffer.header_end() {
                return Ok(end);
            }
            if self.buffer.fill_from(stream)? == 0 {
                if self.buffer.is_empty() {
                    tracing::debug!("Peer closed without sending a response");
                }
                return Err(ClientError::IncompleteHeaders {
                    received: self.buffer.len(),
                });
            }
        }
    }

    /// Read the rest of a text body and package the response.
    fn deliver(
        &mut self,
        stream: &mut C::Stream,
        head: &ResponseHeaders,
        status: u16,
        reason: StopReason,
    ) -> Result<Outcome> {
        let header_len = head.head_len();
        match head.content_length() {
            Some(len) => {
                let want = (header_len as u64).saturating_add(len);
                while (self.buffer.len() as u64) < want {
                    if self.buffer.fill_from(stream)? == 0 {
                        tracing::warn!(
                            expected = len,
                            received = self.buffer.len() - header_len,
                            "Connection closed before Content-Length bytes arrived"
                        );
                        break;
                    }
                }
            }
            None => while self.buffer.fill_from(stream)? > 0 {},
        }

        let mut response = self.buffer.take();
        if let Some(len) = head.content_length() {
            let end = (header_len as u64).saturating_add(len);
            if (response.len() as u64) > end {
                response.truncate(end as usize);
            }
        }

        tracing::info!(
            status,
            bytes = response.len(),
            redirects = self.redirects.attempts_made(),
            "Total received response bytes"
        );
        Ok(Outcome::Delivered(Delivery {
            status,
            response,
            header_len,
            redirects: self.redirects.attempts_made(),
            reason,
        }))
    }
}
