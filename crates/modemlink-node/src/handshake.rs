//! Startup handshake: join the network, then ask the modem who we are.
//!
//! The original firmware protocol is fire-and-forget. All five commands
//! go out back to back and the replies, if any, are picked up later by
//! the service loop in whatever order the modem produces them.

use std::io::Write;

use modemlink_wire::{encode_network_id, ApiWriter, AtQuery};
use tracing::debug;

use crate::error::Result;

/// Network id the node joins at startup.
pub const DEFAULT_NETWORK_ID: &str = "vummiv";

/// Send the network-id command and the four identity queries.
///
/// The network-id command carries frame id zero, so the modem stays
/// silent about it; the four queries each carry a nonzero frame id and
/// are expected to produce one response apiece, eventually.
pub fn send_identity_queries<W: Write>(
    writer: &mut ApiWriter<W>,
    network_id: &str,
) -> Result<()> {
    writer.send(&encode_network_id(network_id.as_bytes()))?;
    debug!(network_id, "joined network");

    for query in AtQuery::ALL {
        writer.send(&query.encode())?;
        debug!(query = query.name(), "sent identity query");
    }
    Ok(())
}
