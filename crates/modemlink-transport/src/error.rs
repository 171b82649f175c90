use std::path::PathBuf;

/// Errors that can occur on the serial link to the modem.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the serial device.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: serialport::Error,
    },

    /// Failed to clone the serial handle into reader/writer halves.
    #[error("failed to split serial handle for {path}: {source}")]
    Split {
        path: PathBuf,
        source: serialport::Error,
    },

    /// Failed to reconfigure the serial device.
    #[error("failed to configure {path}: {source}")]
    Configure {
        path: PathBuf,
        source: serialport::Error,
    },

    /// Failed to enumerate serial devices on this host.
    #[error("failed to enumerate serial devices: {0}")]
    Enumerate(serialport::Error),

    /// An I/O error occurred on the link.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
