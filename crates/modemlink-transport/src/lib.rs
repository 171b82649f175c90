//! Serial transport to the radio modem.
//!
//! The modem hangs off a serial device file and exchanges raw bytes; this
//! crate owns opening that device and nothing else. Everything above it
//! builds on the [`SerialLink`] type provided here.

pub mod error;
pub mod serial;

pub use error::{Result, TransportError};
pub use serial::{available_ports, LinkConfig, SerialLink};

pub use serialport;
