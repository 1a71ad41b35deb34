//! Length-prefixed record files and streams.
//!
//! recordio writes discrete records (JSON documents, protocol messages) to a
//! byte stream, typically a file, and recovers them later with their
//! boundaries intact.
//!
//! # Crate Structure
//!
//! - [`frame`]: record framing (`FrameWriter`, `FrameReader`, wire codec)
//!
//! ```
//! use recordio::frame::{FrameError, FrameReader, FrameWriter};
//!
//! let mut wire = Vec::new();
//! let mut writer = FrameWriter::new(&mut wire);
//! writer.write_record(b"this is test string 0").unwrap();
//! writer.write_record(b"short").unwrap();
//!
//! let mut reader = FrameReader::new(wire.as_slice());
//! let mut buf = [0u8; 10];
//! assert!(matches!(
//!     reader.read_record(&mut buf),
//!     Err(FrameError::TargetBufferTooSmall { .. })
//! ));
//! let n = reader.read_record(&mut buf).unwrap();
//! assert_eq!(&buf[..n], b"short");
//! ```

/// Re-export frame types.
pub mod frame {
    pub use recordio_frame::*;
}

pub use recordio_frame::{FrameError, FrameReader, FrameWriter, ReaderConfig};
