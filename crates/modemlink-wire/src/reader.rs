use std::io::{ErrorKind, Read};
use std::time::{Duration, Instant};

use bytes::{Buf, Bytes, BytesMut};
use modemlink_transport::SerialLink;
use tracing::debug;

use crate::codec::{decode_frame, WireConfig, HEADER_SIZE, START_DELIMITER, TRAILER_SIZE};
use crate::error::{Result, WireError};

const INITIAL_BUFFER_CAPACITY: usize = 512;
const READ_CHUNK_SIZE: usize = 256;

/// Reads complete API frames from any `Read` stream.
///
/// Handles partial reads internally — callers always get whole payloads.
/// Line noise (stray bytes, corrupt checksums, bogus length declarations)
/// is skipped by resynchronizing to the next start delimiter rather than
/// failing the stream; a radio link corrupts frames routinely.
#[derive(Debug)]
pub struct ApiReader<T> {
    inner: T,
    buf: BytesMut,
    config: WireConfig,
}

impl<T: Read> ApiReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WireConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: WireConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next frame payload, waiting at most `window`.
    ///
    /// Returns `Ok(None)` when the window expires with the device reporting
    /// no data — the liveness signal for the layer above. A frame already
    /// buffered is returned regardless of the window. The window is checked
    /// after each device read, so it can overshoot by at most one device
    /// timeout.
    ///
    /// Returns `Err(WireError::LinkClosed)` when EOF is reached.
    pub fn read_frame(&mut self, window: Duration) -> Result<Option<Bytes>> {
        let deadline = Instant::now() + window;
        loop {
            if let Some(payload) = self.try_decode()? {
                return Ok(Some(payload));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if is_read_timeout(&err) => {
                    if Instant::now() >= deadline {
                        return Ok(None);
                    }
                    continue;
                }
                Err(err) => return Err(WireError::Io(err)),
            };

            if read == 0 {
                return Err(WireError::LinkClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Decode one frame from the buffer, discarding noise prefixes.
    fn try_decode(&mut self) -> Result<Option<Bytes>> {
        loop {
            match decode_frame(&mut self.buf, self.config.max_payload) {
                Ok(outcome) => return Ok(outcome),
                Err(WireError::BadDelimiter) => self.skip_to_delimiter(),
                Err(WireError::PayloadTooLarge { size, max }) => {
                    debug!(size, max, "dropping oversize frame declaration");
                    self.skip_to_delimiter();
                }
                Err(WireError::ChecksumMismatch { expected, actual }) => {
                    // The whole frame is buffered when the checksum is
                    // checked, so its declared extent is trustworthy.
                    let declared = usize::from(u16::from_be_bytes([self.buf[1], self.buf[2]]));
                    let total = HEADER_SIZE + declared + TRAILER_SIZE;
                    debug!(expected, actual, len = declared, "dropping corrupt frame");
                    self.buf.advance(total);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Drop at least one byte, then everything up to the next delimiter.
    fn skip_to_delimiter(&mut self) {
        let start = 1.min(self.buf.len());
        let skipped = match self.buf[start..].iter().position(|&b| b == START_DELIMITER) {
            Some(i) => start + i,
            None => self.buf.len(),
        };
        self.buf.advance(skipped);
        debug!(skipped, "resynchronized to next start delimiter");
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current reader configuration.
    pub fn config(&self) -> &WireConfig {
        &self.config
    }
}

impl ApiReader<SerialLink> {
    /// Create a frame reader for a serial link, applying the configured
    /// per-read device timeout.
    pub fn with_config_serial(mut link: SerialLink, config: WireConfig) -> Result<Self> {
        if let Some(timeout) = config.char_timeout {
            link.set_char_timeout(timeout)?;
        }
        Ok(Self::with_config(link, config))
    }
}

fn is_read_timeout(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}
