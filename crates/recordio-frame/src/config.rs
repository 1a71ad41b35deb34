use crate::codec::DEFAULT_MAX_RECORD_SIZE;

/// How a [`FrameReader`](crate::FrameReader) moves payload bytes into the caller's buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadRead {
    /// Issue one `read` call for the payload and report whatever it returned.
    ///
    /// Suited to fully buffered or file-backed sources. A source that returns
    /// short reads leaves the rest of the payload in the stream.
    #[default]
    Single,
    /// Keep reading until the whole payload has been delivered.
    Exact,
}

/// Controls frame reader behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Payload delivery policy for `read_record`.
    pub payload_read: PayloadRead,
    /// Largest record `read_frame` will allocate for. Default: 16 MiB.
    pub max_record_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            payload_read: PayloadRead::Single,
            max_record_size: DEFAULT_MAX_RECORD_SIZE,
        }
    }
}

impl ReaderConfig {
    /// Config that always delivers whole payloads.
    pub fn exact() -> Self {
        Self {
            payload_read: PayloadRead::Exact,
            ..Self::default()
        }
    }
}
