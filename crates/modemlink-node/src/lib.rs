//! Node-side glue for the modem link: startup handshake, identity
//! accumulation, and the steady-state service loop.
//!
//! The layering mirrors the link itself. [`modemlink_transport`] owns
//! the serial device, [`modemlink_wire`] owns framing and payload
//! shapes, and this crate owns the conversation: join the network, ask
//! the modem for its addresses, merge the answers as they trickle in,
//! and keep the server informed with identity heartbeats whenever the
//! link goes quiet.
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//!
//! use modemlink_node::attach;
//!
//! # fn main() -> modemlink_node::Result<()> {
//! let mut node = attach("/dev/ttyUSB0")?;
//! let running = AtomicBool::new(true);
//! node.run(&running)?;
//! # Ok(())
//! # }
//! ```

pub mod attach;
pub mod error;
pub mod handshake;
pub mod identity;
pub mod service;

pub use attach::{attach, attach_with_config};
pub use error::{NodeError, Result};
pub use handshake::{send_identity_queries, DEFAULT_NETWORK_ID};
pub use identity::{Identity, MacAddr};
pub use service::{Activity, Node, NodeConfig, RECV_WINDOW, SERVER};
