//! The link service loop.
//!
//! After the startup handshake the node settles into a steady state:
//! wait up to one receive window for a frame, merge whatever identity
//! responses arrive, and on a quiet window re-ask for the network
//! address and push one identity heartbeat at the server. Frames that
//! match no known response shape are surfaced, not dropped.

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bytes::Bytes;
use modemlink_wire::{
    classify, hex_dump, ApiReader, ApiWriter, AtQuery, AtResponse, Datagram, ServerAddr,
    COMMAND_IDENTITY,
};
use tracing::{debug, info};

use crate::error::Result;
use crate::handshake::{send_identity_queries, DEFAULT_NETWORK_ID};
use crate::identity::Identity;

/// The fixed server endpoint heartbeats are addressed to.
pub const SERVER: ServerAddr = ServerAddr::new([52, 73, 65, 98], 1973);

/// How long one receive window lasts before the liveness path runs.
pub const RECV_WINDOW: Duration = Duration::from_millis(1000);

/// Tunables for a link node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Destination for outbound datagrams.
    pub server: ServerAddr,
    /// Network id joined during the handshake.
    pub network_id: String,
    /// Receive window per loop iteration.
    pub recv_window: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            server: SERVER,
            network_id: DEFAULT_NETWORK_ID.to_string(),
            recv_window: RECV_WINDOW,
        }
    }
}

/// One observable outcome of a service-loop iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    /// The receive window expired; the address was re-queried and one
    /// heartbeat sent.
    HeartbeatSent,
    /// A recognized identity response arrived and was merged.
    IdentityUpdated(AtResponse),
    /// A well-framed payload that matches no known response shape.
    Unrecognized(Bytes),
}

/// A link node: reader and writer halves plus accumulated identity.
///
/// Generic over the underlying transport so the loop can run against
/// scripted byte streams in tests; production code attaches it to the
/// two halves of a cloned serial link.
#[derive(Debug)]
pub struct Node<R, W> {
    reader: ApiReader<R>,
    writer: ApiWriter<W>,
    identity: Identity,
    config: NodeConfig,
}

impl<R: Read, W: Write> Node<R, W> {
    /// Assemble a node from reader and writer halves.
    pub fn new(reader: ApiReader<R>, writer: ApiWriter<W>, config: NodeConfig) -> Self {
        Self {
            reader,
            writer,
            identity: Identity::default(),
            config,
        }
    }

    /// The identity accumulated so far.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The node configuration.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Join the network and issue the four identity queries.
    pub fn handshake(&mut self) -> Result<()> {
        send_identity_queries(&mut self.writer, &self.config.network_id)
    }

    /// Run one service-loop iteration: one timed receive, then dispatch.
    ///
    /// A quiet window is not an error. It triggers the liveness path,
    /// which re-queries the network address first and then sends one
    /// heartbeat, always in that order. Link faults propagate.
    pub fn poll(&mut self) -> Result<Activity> {
        match self.reader.read_frame(self.config.recv_window)? {
            None => {
                self.refresh_address()?;
                self.send_report(COMMAND_IDENTITY)?;
                Ok(Activity::HeartbeatSent)
            }
            Some(frame) => match classify(&frame) {
                Some(response) => {
                    self.identity.apply(&response);
                    self.report_progress(&response);
                    Ok(Activity::IdentityUpdated(response))
                }
                None => {
                    debug!(len = frame.len(), bytes = %hex_dump(&frame), "unrecognized frame");
                    Ok(Activity::Unrecognized(frame))
                }
            },
        }
    }

    /// Run the service loop until `running` clears or the link faults.
    ///
    /// Sends the handshake first. In production `running` stays set for
    /// the process lifetime and the loop only ends on a fault or a
    /// shutdown signal.
    pub fn run(&mut self, running: &AtomicBool) -> Result<()> {
        self.handshake()?;
        while running.load(Ordering::SeqCst) {
            self.poll()?;
        }
        info!("service loop stopped");
        Ok(())
    }

    /// Send one datagram carrying the current identity and `command`.
    ///
    /// Identity fields that have not been reported yet go out as zeroes;
    /// the heartbeat does not wait for the handshake to finish.
    pub fn send_report(&mut self, command: u8) -> Result<()> {
        let datagram = Datagram {
            dest: self.config.server,
            source_port: self.identity.port,
            hardware_addr: self.identity.mac,
            command,
        };
        self.writer.send(&datagram.encode())?;
        debug!(dest = %self.config.server, command, "sent report datagram");
        Ok(())
    }

    /// Re-issue the address query after a quiet window.
    fn refresh_address(&mut self) -> Result<()> {
        self.writer.send(&AtQuery::NetworkAddress.encode())?;
        debug!("re-queried network address");
        Ok(())
    }

    fn report_progress(&self, response: &AtResponse) {
        match response {
            AtResponse::SerialHigh(_) => {
                info!(mac = %self.identity.mac(), "hardware address reported");
            }
            AtResponse::NetworkAddress(_) => {
                info!(addr = %self.identity.socket(), "network address reported");
            }
            _ => {}
        }
    }
}
