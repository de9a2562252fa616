//! Bounded receive buffer.

use std::io::{self, Read};

use crate::error::{ClientError, Result};
use crate::http::response::{find_header_end, HEADER_TERMINATOR};

/// Size of a single read from the stream.
pub const READ_CHUNK: usize = 8192;

/// Growable buffer holding every byte read for the current response.
///
/// The buffer never holds more than `limit` bytes. A response of exactly
/// `limit` bytes is accepted; a byte arriving past the bound fails with
/// [`ClientError::ResponseTooLarge`].
#[derive(Debug)]
pub struct ReceiveBuffer {
    bytes: Vec<u8>,
    limit: usize,
    /// Offset the next terminator search starts from.
    scanned: usize,
}

impl ReceiveBuffer {
    pub fn new(limit: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(limit.min(READ_CHUNK)),
            limit,
            scanned: 0,
        }
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
        self.scanned = 0;
    }

    /// Read once from `stream` and append. Returns 0 at end of stream.
    pub fn fill_from<R: Read>(&mut self, stream: &mut R) -> Result<usize> {
        let room = self.limit - self.bytes.len();
        if room == 0 {
            // Full: only end of stream is acceptable now.
            let mut overflow = [0u8; 1];
            return match read_retrying(stream, &mut overflow)? {
                0 => Ok(0),
                _ => Err(ClientError::ResponseTooLarge { limit: self.limit }),
            };
        }

        let mut chunk = [0u8; READ_CHUNK];
        let n = read_retrying(stream, &mut chunk[..room.min(READ_CHUNK)])?;
        self.bytes.extend_from_slice(&chunk[..n]);
        Ok(n)
    }

    /// Offset just past `\r\n\r\n`, scanning only bytes not seen before.
    pub fn header_end(&mut self) -> Option<usize> {
        let found = find_header_end(&self.bytes[self.scanned..]).map(|end| self.scanned + end);
        if found.is_none() {
            self.scanned = self
                .bytes
                .len()
                .saturating_sub(HEADER_TERMINATOR.len() - 1);
        }
        found
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hand the contents over, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        self.scanned = 0;
        std::mem::take(&mut self.bytes)
    }
}

fn read_retrying<R: Read>(stream: &mut R, buf: &mut [u8]) -> Result<usize> {
    loop {
        match stream.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ClientError::Receive(e)),
        }
    }
}
