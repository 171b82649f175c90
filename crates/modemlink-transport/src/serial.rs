use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

use crate::error::{Result, TransportError};

/// Configuration for opening the serial link.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Line rate of the modem's serial interface.
    pub baud: u32,
    /// Timeout applied to each blocking read on the device.
    ///
    /// Receive windows are enforced above this layer by the wire reader's
    /// deadline; this only bounds how long a single `read` call may block.
    pub char_timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud: SerialLink::DEFAULT_BAUD,
            char_timeout: SerialLink::DEFAULT_CHAR_TIMEOUT,
        }
    }
}

/// A serial channel to the radio modem — implements Read + Write.
///
/// The modem is a byte-stream device; framing lives in `modemlink-wire`.
/// A link can be split into reader and writer halves with [`try_clone`],
/// both backed by the same device.
///
/// [`try_clone`]: SerialLink::try_clone
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    path: PathBuf,
    baud: u32,
}

impl SerialLink {
    /// Default line rate; matches the modem's factory setting.
    pub const DEFAULT_BAUD: u32 = 9_600;
    /// Default per-read timeout on the device.
    pub const DEFAULT_CHAR_TIMEOUT: Duration = Duration::from_millis(100);

    /// Open the serial device with default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, &LinkConfig::default())
    }

    /// Open the serial device with explicit configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: &LinkConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let port = serialport::new(path.to_string_lossy(), config.baud)
            .timeout(config.char_timeout)
            .open()
            .map_err(|e| TransportError::Open {
                path: path.clone(),
                source: e,
            })?;

        info!(?path, baud = config.baud, "opened serial link");

        Ok(Self {
            port,
            path,
            baud: config.baud,
        })
    }

    /// Clone the handle so one half can read while the other writes.
    pub fn try_clone(&self) -> Result<Self> {
        let port = self.port.try_clone().map_err(|e| TransportError::Split {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(path = ?self.path, "split serial handle");
        Ok(Self {
            port,
            path: self.path.clone(),
            baud: self.baud,
        })
    }

    /// Set the per-read timeout on the underlying device.
    pub fn set_char_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.port
            .set_timeout(timeout)
            .map_err(|e| TransportError::Configure {
                path: self.path.clone(),
                source: e,
            })
    }

    /// The device path this link is attached to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The configured line rate.
    pub fn baud(&self) -> u32 {
        self.baud
    }
}

impl Read for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialLink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.port.flush()
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("path", &self.path)
            .field("baud", &self.baud)
            .finish()
    }
}

/// Names of serial devices present on this host.
pub fn available_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports().map_err(TransportError::Enumerate)?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_device_reports_path() {
        let result = SerialLink::open("/dev/modemlink-does-not-exist");
        match result {
            Err(TransportError::Open { path, .. }) => {
                assert_eq!(path, PathBuf::from("/dev/modemlink-does-not-exist"));
            }
            other => panic!("expected Open error, got {other:?}"),
        }
    }

    #[test]
    fn default_config_matches_modem_factory_settings() {
        let config = LinkConfig::default();
        assert_eq!(config.baud, 9_600);
        assert_eq!(config.char_timeout, Duration::from_millis(100));
    }

    // Requires real hardware on /dev/ttyUSB0; run with --ignored on a host
    // with the modem attached.
    #[test]
    #[ignore]
    fn open_and_split_hardware_device() {
        let link = SerialLink::open("/dev/ttyUSB0").unwrap();
        let reader = link.try_clone().unwrap();
        assert_eq!(reader.path(), link.path());
        assert_eq!(reader.baud(), SerialLink::DEFAULT_BAUD);
    }
}
