/// Errors that can occur while encoding or decoding modem frames.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A frame began with something other than the start delimiter.
    #[error("invalid start delimiter (expected 0x7E)")]
    BadDelimiter,

    /// The declared payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The frame checksum did not verify.
    #[error("checksum mismatch (expected 0x{expected:02X}, got 0x{actual:02X})")]
    ChecksumMismatch { expected: u8, actual: u8 },

    /// A fixed-layout frame had the wrong length.
    #[error("bad frame length ({len} bytes, expected {expected})")]
    BadLength { len: usize, expected: usize },

    /// A fixed-layout frame carried an unexpected frame-type byte.
    #[error("unexpected frame type 0x{actual:02X} (expected 0x{expected:02X})")]
    UnexpectedFrameType { expected: u8, actual: u8 },

    /// An I/O error occurred while reading or writing frames.
    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link closed before a complete frame was received.
    #[error("link closed (incomplete frame)")]
    LinkClosed,
}

impl From<modemlink_transport::TransportError> for WireError {
    fn from(err: modemlink_transport::TransportError) -> Self {
        match err {
            modemlink_transport::TransportError::Io(io) => WireError::Io(io),
            other => WireError::Io(std::io::Error::other(other.to_string())),
        }
    }
}

pub type Result<T> = std::result::Result<T, WireError>;
