use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use modemlink_transport::SerialLink;

use crate::codec::{encode_frame, WireConfig};
use crate::error::{Result, WireError};

const INITIAL_BUFFER_CAPACITY: usize = 512;

/// Writes API frames to any `Write` stream.
#[derive(Debug)]
pub struct ApiWriter<T> {
    inner: T,
    buf: BytesMut,
    config: WireConfig,
}

impl<T: Write> ApiWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WireConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: WireConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Encode a payload into an API frame and send it (blocking).
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > self.config.max_payload {
            return Err(WireError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload,
            });
        }

        self.buf.clear();
        encode_frame(payload, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(WireError::LinkClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current writer configuration.
    pub fn config(&self) -> &WireConfig {
        &self.config
    }
}

impl ApiWriter<SerialLink> {
    /// Create a frame writer for a serial link, applying the configured
    /// per-read device timeout.
    pub fn with_config_serial(mut link: SerialLink, config: WireConfig) -> Result<Self> {
        if let Some(timeout) = config.char_timeout {
            link.set_char_timeout(timeout)?;
        }
        Ok(Self::with_config(link, config))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use bytes::BytesMut;

    use super::*;
    use crate::at::AtQuery;
    use crate::codec::{decode_frame, MAX_PAYLOAD};

    fn decode_written(writer: ApiWriter<Cursor<Vec<u8>>>) -> Vec<Vec<u8>> {
        let mut wire = BytesMut::from(writer.into_inner().into_inner().as_slice());
        let mut payloads = Vec::new();
        while let Some(payload) = decode_frame(&mut wire, MAX_PAYLOAD).unwrap() {
            payloads.push(payload.to_vec());
        }
        assert!(wire.is_empty());
        payloads
    }

    #[test]
    fn write_single_frame() {
        let mut writer = ApiWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(b"hello").unwrap();

        assert_eq!(decode_written(writer), vec![b"hello".to_vec()]);
    }

    #[test]
    fn write_multiple_frames() {
        let mut writer = ApiWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(b"one").unwrap();
        writer.send(b"two").unwrap();
        writer.send(b"three").unwrap();

        assert_eq!(
            decode_written(writer),
            vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]
        );
    }

    #[test]
    fn query_payload_survives_framing() {
        let mut writer = ApiWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(&AtQuery::NetworkAddress.encode()).unwrap();

        let payloads = decode_written(writer);
        assert_eq!(payloads, vec![vec![0x08, 0x04, b'M', b'Y']]);
    }

    #[test]
    fn payload_too_large_rejected() {
        let mut writer = ApiWriter::new(Cursor::new(Vec::<u8>::new()));
        let oversize = vec![0u8; MAX_PAYLOAD + 1];

        let err = writer.send(&oversize).unwrap_err();
        assert!(matches!(err, WireError::PayloadTooLarge { .. }));
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = ApiWriter::new(sink);

        writer.send(&[0x42]).unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn handles_interrupted_write_and_flush() {
        let writer_impl = InterruptedWriteThenFlush {
            wrote_once: false,
            flush_interrupted: false,
            data: Vec::new(),
        };

        let mut writer = ApiWriter::new(writer_impl);
        writer.send(b"retry").unwrap();

        let inner = writer.into_inner();
        assert!(!inner.data.is_empty());
    }

    #[test]
    fn handles_would_block_write_and_flush() {
        let writer_impl = WouldBlockWriteThenFlush {
            wrote_once: false,
            flush_would_block: false,
            data: Vec::new(),
        };

        let mut writer = ApiWriter::new(writer_impl);
        writer.send(b"retry").unwrap();

        let inner = writer.into_inner();
        assert!(!inner.data.is_empty());
    }

    #[test]
    fn link_closed_when_write_returns_zero() {
        let mut writer = ApiWriter::new(ZeroWriter);
        let err = writer.send(&[0x01]).unwrap_err();
        assert!(matches!(err, WireError::LinkClosed));
    }

    #[test]
    fn written_bytes_read_back() {
        let mut writer = ApiWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(b"loop").unwrap();

        let wire = writer.into_inner().into_inner();
        let mut reader = crate::reader::ApiReader::new(Cursor::new(wire));
        let payload = reader.read_frame(Duration::from_secs(1)).unwrap().unwrap();
        assert_eq!(payload.as_ref(), b"loop");
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut writer = ApiWriter::new(cursor);

        assert_eq!(writer.config().max_payload, MAX_PAYLOAD);
        let _ = writer.get_ref();
        let _ = writer.get_mut();
        let _inner = writer.into_inner();
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct InterruptedWriteThenFlush {
        wrote_once: bool,
        flush_interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_interrupted {
                self.flush_interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            Ok(())
        }
    }

    struct WouldBlockWriteThenFlush {
        wrote_once: bool,
        flush_would_block: bool,
        data: Vec<u8>,
    }

    impl Write for WouldBlockWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::WouldBlock));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_would_block {
                self.flush_would_block = true;
                return Err(std::io::Error::from(ErrorKind::WouldBlock));
            }
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
