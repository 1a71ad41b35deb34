//! Length-prefixed record framing over byte streams.
//!
//! Every record is written as:
//! - A 4-byte little-endian payload length
//! - The payload bytes, exactly that many
//!
//! No padding, no checksum, no terminator. A stream is zero or more records
//! back to back. [`FrameWriter`] and [`FrameReader`] wrap any `Write` / `Read`
//! and move one record per call; a reader whose buffer is too small for the
//! next record skips it and stays in sync.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod config;
pub mod error;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::RecordCodec;
pub use codec::{
    check_trailing, decode_frame, decode_length, encode_frame, encode_length,
    DEFAULT_MAX_RECORD_SIZE, LENGTH_PREFIX_SIZE, MAX_PAYLOAD_SIZE,
};
pub use config::{PayloadRead, ReaderConfig};
pub use error::{FrameError, Result};
pub use reader::{FrameReader, Frames};
pub use writer::FrameWriter;
