use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Size of the little-endian `u32` length prefix in front of every record.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Largest payload the length prefix can describe.
pub const MAX_PAYLOAD_SIZE: usize = u32::MAX as usize;

/// Default upper bound for owned record reads: 16 MiB.
pub const DEFAULT_MAX_RECORD_SIZE: usize = 16 * 1024 * 1024;

/// Encode a payload length as a length prefix.
///
/// Fails with [`FrameError::PayloadTooLarge`] when `len` does not fit in 32 bits.
pub fn encode_length(len: usize) -> Result<[u8; LENGTH_PREFIX_SIZE]> {
    let len = u32::try_from(len).map_err(|_| FrameError::PayloadTooLarge { size: len })?;
    Ok(len.to_le_bytes())
}

/// Decode a length prefix.
pub fn decode_length(prefix: [u8; LENGTH_PREFIX_SIZE]) -> u32 {
    u32::from_le_bytes(prefix)
}

/// Encode a record into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬─────────────────┐
/// │ Length (4B)  │ Payload          │
/// │ u32 LE       │ (Length bytes)   │
/// └──────────────┴─────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let prefix = encode_length(payload.len())?;
    dst.reserve(LENGTH_PREFIX_SIZE + payload.len());
    dst.put_slice(&prefix);
    dst.put_slice(payload);
    Ok(())
}

/// Decode a record from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer. A declared length
/// above `max_record_size` is rejected without consuming anything.
pub fn decode_frame(src: &mut BytesMut, max_record_size: usize) -> Result<Option<Bytes>> {
    let Some(prefix) = peek_prefix(src) else {
        return Ok(None);
    };

    let length = decode_length(prefix);
    if length as usize > max_record_size {
        return Err(FrameError::RecordTooLarge {
            length,
            max: max_record_size,
        });
    }

    let total = LENGTH_PREFIX_SIZE + length as usize;
    if src.len() < total {
        src.reserve(total - src.len());
        return Ok(None);
    }

    src.advance(LENGTH_PREFIX_SIZE);
    Ok(Some(src.split_to(length as usize).freeze()))
}

/// Classify bytes left over once the source has ended.
///
/// An empty buffer is a clean end at a frame boundary; anything else is a
/// truncated frame.
pub fn check_trailing(src: &BytesMut) -> Result<()> {
    match peek_prefix(src) {
        _ if src.is_empty() => Ok(()),
        None => Err(FrameError::truncated_prefix(src.len())),
        Some(prefix) => Err(FrameError::truncated_payload(
            src.len() - LENGTH_PREFIX_SIZE,
            decode_length(prefix),
        )),
    }
}

fn peek_prefix(src: &[u8]) -> Option<[u8; LENGTH_PREFIX_SIZE]> {
    src.get(..LENGTH_PREFIX_SIZE)?.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let mut buf = BytesMut::new();
        let payload = b"hello, recordio!";

        encode_frame(payload, &mut buf).unwrap();

        assert_eq!(buf.len(), LENGTH_PREFIX_SIZE + payload.len());

        let record = decode_frame(&mut buf, DEFAULT_MAX_RECORD_SIZE)
            .unwrap()
            .unwrap();

        assert_eq!(record.as_ref(), payload);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_prefix_is_little_endian() {
        let mut buf = BytesMut::new();
        encode_frame(&[0u8; 0x0102], &mut buf).unwrap();
        assert_eq!(&buf[..LENGTH_PREFIX_SIZE], &[0x02, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_length_fidelity_independent_of_content() {
        for fill in [0x00u8, 0xFF] {
            for len in [0usize, 1, 255, 256, 65_537] {
                let mut buf = BytesMut::new();
                encode_frame(&vec![fill; len], &mut buf).unwrap();
                let prefix: [u8; 4] = buf[..4].try_into().unwrap();
                assert_eq!(decode_length(prefix) as usize, len);
            }
        }
    }

    #[test]
    fn test_encode_length_rejects_overflow() {
        assert_eq!(encode_length(MAX_PAYLOAD_SIZE).unwrap(), [0xFF; 4]);
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            encode_length(MAX_PAYLOAD_SIZE + 1),
            Err(FrameError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_decode_incomplete_prefix() {
        let mut buf = BytesMut::from(&[0x05, 0x00, 0x00][..]);
        let result = decode_frame(&mut buf, DEFAULT_MAX_RECORD_SIZE).unwrap();
        assert!(result.is_none());
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_decode_incomplete_payload() {
        let mut buf = BytesMut::new();
        encode_frame(b"hello", &mut buf).unwrap();
        buf.truncate(LENGTH_PREFIX_SIZE + 2);

        let result = decode_frame(&mut buf, DEFAULT_MAX_RECORD_SIZE).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_decode_record_too_large() {
        let mut buf = BytesMut::new();
        buf.put_u32_le(1024 * 1024 * 32);

        let result = decode_frame(&mut buf, DEFAULT_MAX_RECORD_SIZE);
        assert!(matches!(
            result,
            Err(FrameError::RecordTooLarge { length, max })
                if length == 32 * 1024 * 1024 && max == DEFAULT_MAX_RECORD_SIZE
        ));
    }

    #[test]
    fn test_decode_record_too_large_consumes_nothing() {
        let mut buf = BytesMut::new();
        encode_frame(b"too long", &mut buf).unwrap();
        let before = buf.clone();

        for _ in 0..2 {
            let err = decode_frame(&mut buf, 4).unwrap_err();
            assert!(matches!(err, FrameError::RecordTooLarge { length: 8, max: 4 }));
            assert!(!err.is_recoverable());
            assert_eq!(buf, before);
        }
    }

    #[test]
    fn test_multiple_frames() {
        let mut buf = BytesMut::new();
        encode_frame(b"first", &mut buf).unwrap();
        encode_frame(b"", &mut buf).unwrap();
        encode_frame(b"second", &mut buf).unwrap();

        let r1 = decode_frame(&mut buf, DEFAULT_MAX_RECORD_SIZE).unwrap().unwrap();
        let r2 = decode_frame(&mut buf, DEFAULT_MAX_RECORD_SIZE).unwrap().unwrap();
        let r3 = decode_frame(&mut buf, DEFAULT_MAX_RECORD_SIZE).unwrap().unwrap();

        assert_eq!(r1.as_ref(), b"first");
        assert!(r2.is_empty());
        assert_eq!(r3.as_ref(), b"second");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_check_trailing() {
        assert!(check_trailing(&BytesMut::new()).is_ok());
        assert!(matches!(
            check_trailing(&BytesMut::from(&[1u8, 0][..])),
            Err(FrameError::MalformedStream { .. })
        ));

        let mut partial = BytesMut::new();
        encode_frame(b"hello", &mut partial).unwrap();
        partial.truncate(6);
        let err = check_trailing(&partial).unwrap_err();
        assert!(err.to_string().contains("2 of 5"));
    }
}
