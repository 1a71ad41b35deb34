//! tokio-util codec for the record wire format.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{check_trailing, decode_frame, encode_frame, DEFAULT_MAX_RECORD_SIZE};
use crate::error::{FrameError, Result};

/// Length-prefixed record codec for `FramedRead` / `FramedWrite`.
///
/// A declared length above the configured maximum is a
/// [`FrameError::RecordTooLarge`] error. Framed streams
/// stop after an error, so unlike [`FrameReader`](crate::FrameReader) nothing
/// is skipped.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    max_record_size: usize,
}

impl RecordCodec {
    /// Create a codec with the default 16 MiB record limit.
    pub fn new() -> Self {
        Self::with_max_record_size(DEFAULT_MAX_RECORD_SIZE)
    }

    /// Create a codec with an explicit record limit.
    pub fn with_max_record_size(max_record_size: usize) -> Self {
        Self { max_record_size }
    }

    /// Largest record length the decoder accepts.
    pub fn max_record_size(&self) -> usize {
        self.max_record_size
    }
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for RecordCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        decode_frame(src, self.max_record_size)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        match self.decode(src)? {
            Some(record) => Ok(Some(record)),
            None => {
                check_trailing(src)?;
                Ok(None)
            }
        }
    }
}

impl Encoder<&[u8]> for RecordCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<()> {
        encode_frame(item, dst)
    }
}

impl Encoder<Bytes> for RecordCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<()> {
        encode_frame(&item, dst)
    }
}
