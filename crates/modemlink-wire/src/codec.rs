use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, WireError};

/// Frame header: start delimiter (1) + length (2, big-endian) = 3 bytes.
pub const HEADER_SIZE: usize = 3;

/// Checksum trailer following the payload.
pub const TRAILER_SIZE: usize = 1;

/// Start delimiter opening every API frame.
pub const START_DELIMITER: u8 = 0x7E;

/// Maximum payload accepted from the modem.
pub const MAX_PAYLOAD: usize = 200;

/// Sum-complement checksum over the payload bytes.
///
/// A frame verifies when `(sum(payload) + checksum) & 0xFF == 0xFF`.
pub fn checksum(payload: &[u8]) -> u8 {
    let sum: u32 = payload.iter().map(|&b| u32::from(b)).sum();
    0xFF - (sum & 0xFF) as u8
}

/// Encode a payload into the wire format.
///
/// Wire format (API mode 1, no byte escaping):
/// ```text
/// ┌──────────────┬───────────┬──────────────────┬───────────────┐
/// │ Delim (1B)   │ Length    │ Payload          │ Checksum (1B) │
/// │ 0x7E         │ (2B BE)   │ (Length bytes)   │ sum-compl.    │
/// └──────────────┴───────────┴──────────────────┴───────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > u16::MAX as usize {
        return Err(WireError::PayloadTooLarge {
            size: payload.len(),
            max: u16::MAX as usize,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len() + TRAILER_SIZE);
    dst.put_u8(START_DELIMITER);
    dst.put_u16(payload.len() as u16);
    dst.put_slice(payload);
    dst.put_u8(checksum(payload));
    Ok(())
}

/// Decode a frame from a buffer, yielding its payload.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer. On error, the
/// buffer is left untouched so the caller can resynchronize.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Bytes>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    if src[0] != START_DELIMITER {
        return Err(WireError::BadDelimiter);
    }

    let payload_len = u16::from_be_bytes(src[1..3].try_into().unwrap()) as usize;

    if payload_len > max_payload {
        return Err(WireError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    let total = HEADER_SIZE + payload_len + TRAILER_SIZE;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    let expected = checksum(&src[HEADER_SIZE..HEADER_SIZE + payload_len]);
    let actual = src[HEADER_SIZE + payload_len];
    if actual != expected {
        return Err(WireError::ChecksumMismatch { expected, actual });
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(payload_len).freeze();
    src.advance(TRAILER_SIZE);

    Ok(Some(payload))
}

/// Space-separated hex rendering of raw frame bytes for diagnostics.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Configuration for the wire codec.
#[derive(Debug, Clone)]
pub struct WireConfig {
    /// Maximum payload size in bytes. Default: 200.
    pub max_payload: usize,
    /// Per-read device timeout applied to a serial link on construction.
    pub char_timeout: Option<std::time::Duration>,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_payload: MAX_PAYLOAD,
            char_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let mut buf = BytesMut::new();
        let payload = [0x88, 0x01, b'S', b'L', 0x00, 0xDE, 0xAD, 0xBE, 0xEF];

        encode_frame(&payload, &mut buf).unwrap();

        assert_eq!(buf.len(), HEADER_SIZE + payload.len() + TRAILER_SIZE);
        assert_eq!(buf[0], START_DELIMITER);

        let decoded = decode_frame(&mut buf, MAX_PAYLOAD).unwrap().unwrap();

        assert_eq!(decoded.as_ref(), payload);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_checksum_values() {
        // Sum of payload plus checksum must land on 0xFF.
        assert_eq!(checksum(&[]), 0xFF);
        assert_eq!(checksum(&[0x01]), 0xFE);
        assert_eq!(checksum(&[0xFF]), 0x00);
        assert_eq!(checksum(&[0x88, 0x01, 0x42]), 0xFF - 0xCB);
    }

    #[test]
    fn test_decode_incomplete_header() {
        let mut buf = BytesMut::from(&[START_DELIMITER, 0x00][..]);
        let result = decode_frame(&mut buf, MAX_PAYLOAD).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_decode_incomplete_payload() {
        let mut buf = BytesMut::new();
        encode_frame(&[1, 2, 3, 4, 5], &mut buf).unwrap();
        buf.truncate(HEADER_SIZE + 2);

        let result = decode_frame(&mut buf, MAX_PAYLOAD).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_decode_missing_trailer() {
        let mut buf = BytesMut::new();
        encode_frame(&[1, 2, 3], &mut buf).unwrap();
        buf.truncate(HEADER_SIZE + 3);

        let result = decode_frame(&mut buf, MAX_PAYLOAD).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_decode_bad_delimiter() {
        let mut buf = BytesMut::from(&[0xFF, 0x00, 0x01, 0x42, 0xBD][..]);
        let result = decode_frame(&mut buf, MAX_PAYLOAD);
        assert!(matches!(result, Err(WireError::BadDelimiter)));
        assert_eq!(buf.len(), 5, "decode must not consume on error");
    }

    #[test]
    fn test_decode_checksum_mismatch() {
        let mut buf = BytesMut::new();
        encode_frame(&[1, 2, 3], &mut buf).unwrap();
        let last = buf.len() - 1;
        buf[last] ^= 0xFF;

        let result = decode_frame(&mut buf, MAX_PAYLOAD);
        assert!(matches!(result, Err(WireError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_decode_payload_too_large() {
        let mut buf = BytesMut::new();
        buf.put_u8(START_DELIMITER);
        buf.put_u16(300);

        let result = decode_frame(&mut buf, MAX_PAYLOAD);
        assert!(matches!(
            result,
            Err(WireError::PayloadTooLarge { size: 300, max: MAX_PAYLOAD })
        ));
    }

    #[test]
    fn test_payload_at_capacity() {
        let payload = vec![0xA5; MAX_PAYLOAD];
        let mut buf = BytesMut::new();
        encode_frame(&payload, &mut buf).unwrap();

        let decoded = decode_frame(&mut buf, MAX_PAYLOAD).unwrap().unwrap();
        assert_eq!(decoded.len(), MAX_PAYLOAD);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_multiple_frames() {
        let mut buf = BytesMut::new();
        encode_frame(&[0x11], &mut buf).unwrap();
        encode_frame(&[0x22, 0x33], &mut buf).unwrap();

        let first = decode_frame(&mut buf, MAX_PAYLOAD).unwrap().unwrap();
        assert_eq!(first.as_ref(), &[0x11]);

        let second = decode_frame(&mut buf, MAX_PAYLOAD).unwrap().unwrap();
        assert_eq!(second.as_ref(), &[0x22, 0x33]);

        assert!(buf.is_empty());
    }

    #[test]
    fn test_empty_payload() {
        let mut buf = BytesMut::new();
        encode_frame(&[], &mut buf).unwrap();

        let decoded = decode_frame(&mut buf, MAX_PAYLOAD).unwrap().unwrap();
        assert!(decoded.is_empty());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_hex_dump_format() {
        assert_eq!(hex_dump(&[0x00, 0xAB, 0x7E]), "00 AB 7E");
        assert_eq!(hex_dump(&[]), "");
    }
}
