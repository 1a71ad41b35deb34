use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::codec::{decode_length, LENGTH_PREFIX_SIZE};
use crate::config::{PayloadRead, ReaderConfig};
use crate::error::{FrameError, Result};

/// Reads length-prefixed records from any `Read` stream.
///
/// Every call consumes exactly one frame from the current position. There is
/// no lookahead: the reader holds nothing between calls except the stream.
pub struct FrameReader<R> {
    inner: R,
    config: ReaderConfig,
}

impl<R: Read> FrameReader<R> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, ReaderConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: R, config: ReaderConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next record into `buf` (blocking).
    ///
    /// Returns the number of payload bytes placed at the start of `buf`.
    ///
    /// - [`FrameError::EndOfStream`] when the source is exhausted at a frame
    ///   boundary.
    /// - [`FrameError::MalformedStream`] when it ends inside a frame.
    /// - [`FrameError::TargetBufferTooSmall`] when the record is longer than
    ///   `buf`. The record has been read and dropped, so the next call starts
    ///   at the following frame.
    /// - [`FrameError::Skip`] when dropping that record failed.
    ///
    /// With [`PayloadRead::Single`] the payload is fetched with one `read`
    /// call and a short count is returned as-is.
    pub fn read_record(&mut self, buf: &mut [u8]) -> Result<usize> {
        let length = self.read_length()?;
        let len = length as usize;

        if len > buf.len() {
            self.discard(length)?;
            return Err(FrameError::TargetBufferTooSmall {
                length,
                capacity: buf.len(),
            });
        }

        let target = &mut buf[..len];
        let n = match self.config.payload_read {
            PayloadRead::Single => self.read_once(target, length)?,
            PayloadRead::Exact => self.read_payload_exact(target, length)?,
        };
        trace!(len = n, "read record");
        Ok(n)
    }

    /// Read the next record into a freshly allocated buffer.
    ///
    /// The whole payload is always read. Records longer than
    /// [`ReaderConfig::max_record_size`] are dropped and reported as
    /// [`FrameError::TargetBufferTooSmall`], same as [`Self::read_record`].
    pub fn read_frame(&mut self) -> Result<Bytes> {
        let length = self.read_length()?;
        let max = self.config.max_record_size;

        if length as usize > max {
            self.discard(length)?;
            return Err(FrameError::TargetBufferTooSmall {
                length,
                capacity: max,
            });
        }

        let mut payload = BytesMut::zeroed(length as usize);
        self.read_payload_exact(&mut payload, length)?;
        Ok(payload.freeze())
    }

    /// Iterate over owned records until the end of the stream.
    ///
    /// Oversized records are yielded as errors and iteration continues past
    /// them. Any other error is yielded once and ends the iteration.
    pub fn frames(&mut self) -> Frames<'_, R> {
        Frames {
            reader: self,
            done: false,
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    fn read_length(&mut self) -> Result<u32> {
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        let mut filled = 0usize;

        while filled < LENGTH_PREFIX_SIZE {
            match self.inner.read(&mut prefix[filled..]) {
                Ok(0) if filled == 0 => return Err(FrameError::EndOfStream),
                Ok(0) => return Err(FrameError::truncated_prefix(filled)),
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        Ok(decode_length(prefix))
    }

    fn read_once(&mut self, target: &mut [u8], length: u32) -> Result<usize> {
        if target.is_empty() {
            return Ok(0);
        }

        loop {
            match self.inner.read(target) {
                Ok(0) => return Err(FrameError::truncated_payload(0, length)),
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    fn read_payload_exact(&mut self, target: &mut [u8], length: u32) -> Result<usize> {
        let mut filled = 0usize;

        while filled < target.len() {
            match self.inner.read(&mut target[filled..]) {
                Ok(0) => return Err(FrameError::truncated_payload(filled, length)),
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        Ok(filled)
    }

    fn discard(&mut self, length: u32) -> Result<()> {
        debug!(length, "skipping oversized record");

        let skipped = std::io::copy(
            &mut self.inner.by_ref().take(u64::from(length)),
            &mut std::io::sink(),
        )
        .map_err(|source| FrameError::Skip { length, source })?;

        if skipped < u64::from(length) {
            return Err(FrameError::Skip {
                length,
                source: std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("stream ended after {skipped} of {length} bytes"),
                ),
            });
        }

        Ok(())
    }
}

/// Byte-stream view of the reader: every `read` call yields one record.
///
/// End of stream maps to `Ok(0)`. A zero-length record also reads as `Ok(0)`,
/// so streams that carry empty records should use [`FrameReader::read_record`].
impl<R: Read> Read for FrameReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.read_record(buf) {
            Ok(n) => Ok(n),
            Err(FrameError::EndOfStream) => Ok(0),
            Err(err) => Err(err.into()),
        }
    }
}

impl<R> std::fmt::Debug for FrameReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameReader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Iterator returned by [`FrameReader::frames`].
#[derive(Debug)]
pub struct Frames<'a, R> {
    reader: &'a mut FrameReader<R>,
    done: bool,
}

impl<R: Read> Iterator for Frames<'_, R> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.read_frame() {
            Err(FrameError::EndOfStream) => {
                self.done = true;
                None
            }
            Err(err) if !err.is_recoverable() => {
                self.done = true;
                Some(Err(err))
            }
            other => Some(other),
        }
    }
}

impl<R: Read> std::iter::FusedIterator for Frames<'_, R> {}
