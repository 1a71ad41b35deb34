/// Errors that can occur while reading or writing framed records.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The source ended cleanly at a frame boundary.
    #[error("end of record stream")]
    EndOfStream,

    /// The stream ended or broke in the middle of a frame.
    #[error("malformed record stream: {reason}")]
    MalformedStream { reason: String },

    /// The next record does not fit the caller's buffer and was skipped.
    #[error("target buffer is too small to hold record ({length} bytes, capacity {capacity}), record skipped")]
    TargetBufferTooSmall { length: u32, capacity: usize },

    /// A buffered frame declares a length above the decoder's maximum.
    ///
    /// Nothing is consumed: the frame is still at the front of the buffer.
    #[error("record too large ({length} bytes, max {max})")]
    RecordTooLarge { length: u32, max: usize },

    /// Discarding an oversized record failed before the next frame boundary.
    #[error("error skipping oversized record of {length} bytes: {source}")]
    Skip {
        length: u32,
        source: std::io::Error,
    },

    /// The length prefix was written but the payload was not.
    #[error("record payload write failed after {written} of {expected} bytes: {source}")]
    PartialWrite {
        written: usize,
        expected: usize,
        source: std::io::Error,
    },

    /// The payload length cannot be represented by the 32-bit length prefix.
    #[error("payload too large ({size} bytes, max {max})", max = u32::MAX)]
    PayloadTooLarge { size: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("record I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    pub(crate) fn truncated_prefix(read: usize) -> Self {
        Self::MalformedStream {
            reason: format!("truncated length prefix ({read} of 4 bytes)"),
        }
    }

    pub(crate) fn truncated_payload(read: usize, length: u32) -> Self {
        Self::MalformedStream {
            reason: format!("truncated payload ({read} of {length} bytes)"),
        }
    }

    /// Returns true if this is the clean end of the record stream.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    /// Returns true if the stream is still positioned at a frame boundary
    /// and the next read can proceed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::TargetBufferTooSmall { .. })
    }
}

impl From<FrameError> for std::io::Error {
    fn from(err: FrameError) -> Self {
        let kind = match &err {
            FrameError::Skip { source, .. } | FrameError::PartialWrite { source, .. } => {
                source.kind()
            }
            FrameError::EndOfStream => std::io::ErrorKind::UnexpectedEof,
            _ => std::io::ErrorKind::InvalidData,
        };
        match err {
            FrameError::Io(io) => io,
            other => std::io::Error::new(kind, other),
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
