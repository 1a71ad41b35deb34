use std::io::{ErrorKind, Write};

use tracing::trace;

use crate::codec::encode_length;
use crate::error::{FrameError, Result};

/// Writes length-prefixed records to any `Write` stream.
///
/// Each record goes out as two writes on the sink: the 4-byte prefix, then
/// the payload. Nothing is buffered between calls.
pub struct FrameWriter<W> {
    inner: W,
}

impl<W: Write> FrameWriter<W> {
    /// Create a new frame writer over `inner`.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one record (blocking).
    ///
    /// Returns the number of payload bytes written; the prefix is not counted.
    /// If the prefix cannot be written nothing of the payload is attempted and
    /// the sink's error is returned as [`FrameError::Io`]. If the payload
    /// fails after the prefix went out, [`FrameError::PartialWrite`] carries
    /// how much of it the sink accepted; the stream no longer sits on a frame
    /// boundary and should be abandoned.
    pub fn write_record(&mut self, payload: &[u8]) -> Result<usize> {
        let prefix = encode_length(payload.len())?;
        self.inner.write_all(&prefix)?;

        let expected = payload.len();
        let mut written = 0usize;
        while written < expected {
            match self.inner.write(&payload[written..]) {
                Ok(0) => {
                    return Err(FrameError::PartialWrite {
                        written,
                        expected,
                        source: std::io::Error::from(ErrorKind::WriteZero),
                    })
                }
                Ok(n) => written += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(FrameError::PartialWrite {
                        written,
                        expected,
                        source,
                    })
                }
            }
        }

        trace!(len = expected, "wrote record");
        Ok(written)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(FrameError::Io)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    ///
    /// Writing to it directly breaks framing for any later reader.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Byte-stream view of the writer: every `write` call becomes one record.
///
/// `write` reports the whole buffer as written or fails, so `write_all`
/// emits exactly one record. `write_all(&[])` never calls `write` and
/// therefore emits nothing; use [`FrameWriter::write_record`] for empty records.
impl<W: Write> Write for FrameWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.write_record(buf).map_err(Into::into)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl<W> std::fmt::Debug for FrameWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameWriter").finish_non_exhaustive()
    }
}
