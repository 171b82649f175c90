//! Attaching a node to a serial device.
//!
//! The modem is one bidirectional serial stream; the reader and writer
//! halves come from cloning the open handle so the service loop can
//! block on reads while sends go out between windows.

use std::path::Path;

use modemlink_transport::{LinkConfig, SerialLink};
use modemlink_wire::{ApiReader, ApiWriter, WireConfig};

use crate::error::Result;
use crate::service::{Node, NodeConfig};

/// Attach to the modem on `path` with default configuration.
pub fn attach(path: impl AsRef<Path>) -> Result<Node<SerialLink, SerialLink>> {
    attach_with_config(path, &LinkConfig::default(), NodeConfig::default())
}

/// Attach to the modem with explicit link and node configuration.
pub fn attach_with_config(
    path: impl AsRef<Path>,
    link_config: &LinkConfig,
    node_config: NodeConfig,
) -> Result<Node<SerialLink, SerialLink>> {
    let writer_link = SerialLink::open_with_config(path, link_config)?;
    let reader_link = writer_link.try_clone()?;

    let wire_config = WireConfig {
        char_timeout: Some(link_config.char_timeout),
        ..WireConfig::default()
    };
    let reader = ApiReader::with_config_serial(reader_link, wire_config.clone())?;
    let writer = ApiWriter::with_config_serial(writer_link, wire_config)?;
    Ok(Node::new(reader, writer, node_config))
}
