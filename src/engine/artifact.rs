//! Streaming a binary payload to disk.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::engine::buffer::READ_CHUNK;
use crate::error::{ClientError, Result};

/// A payload persisted to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Write `buffered` body bytes to a new file at `path`, then keep copying from
/// `stream` until `expected` bytes are on disk. With no expected length the
/// copy runs until the peer closes.
///
/// The file is created (or truncated) before anything is read.
pub fn save_payload<R: Read>(
    path: &Path,
    buffered: &[u8],
    stream: &mut R,
    expected: Option<u64>,
) -> Result<SavedArtifact> {
    let file = File::create(path).map_err(|source| ClientError::ArtifactCreate {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    let write_err = |source: io::Error| ClientError::ArtifactWrite {
        path: path.to_path_buf(),
        source,
    };

    let head = match expected {
        Some(len) => {
            let len = usize::try_from(len).unwrap_or(usize::MAX);
            &buffered[..buffered.len().min(len)]
        }
        None => buffered,
    };
    out.write_all(head).map_err(write_err)?;
    let mut written = head.len() as u64;

    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let want = match expected {
            Some(len) if written >= len => break,
            Some(len) => (len - written).min(READ_CHUNK as u64) as usize,
            None => READ_CHUNK,
        };

        let n = match stream.read(&mut chunk[..want]) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ClientError::Receive(e)),
        };
        if n == 0 {
            match expected {
                Some(len) => {
                    return Err(ClientError::TruncatedBody {
                        expected: len,
                        received: written,
                    })
                }
                None => break,
            }
        }

        out.write_all(&chunk[..n]).map_err(write_err)?;
        written += n as u64;
    }

    out.flush().map_err(write_err)?;
    Ok(SavedArtifact {
        path: path.to_path_buf(),
        bytes: written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_expected_length_spans_buffer_and_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut rest = Cursor::new(b"456789trailing".to_vec());

        let saved = save_payload(&path, b"0123", &mut rest, Some(10)).unwrap();
        assert_eq!(saved.bytes, 10);
        assert_eq!(std::fs::read(&path).unwrap(), b"0123456789");
    }

    #[test]
    fn test_buffered_excess_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let saved = save_payload(&path, b"abcdef", &mut io::empty(), Some(3)).unwrap();
        assert_eq!(saved.bytes, 3);
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
    }

    #[test]
    fn test_unknown_length_reads_to_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut rest = Cursor::new(vec![7u8; 20_000]);

        let saved = save_payload(&path, b"", &mut rest, None).unwrap();
        assert_eq!(saved.bytes, 20_000);
    }

    #[test]
    fn test_premature_close_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut rest = Cursor::new(b"12".to_vec());

        let err = save_payload(&path, b"ab", &mut rest, Some(10)).unwrap_err();
        assert!(matches!(
            err,
            ClientError::TruncatedBody {
                expected: 10,
                received: 4
            }
        ));
    }

    #[test]
    fn test_uncreatable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");

        let err = save_payload(&path, b"", &mut io::empty(), Some(0)).unwrap_err();
        assert!(matches!(err, ClientError::ArtifactCreate { .. }));
    }
}
