//! Self-identifying node daemon for API-mode radio modems.
//!
//! modemlink keeps an embedded node visible on its radio network: it
//! joins the network at startup, learns its own addresses from the
//! modem, and heartbeats them at a well-known server whenever the link
//! goes quiet.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial device access
//! - [`wire`] — API-mode framing, identity responses, transmit datagrams
//! - [`node`] — Handshake, identity accumulation, and the service loop
//!   (behind the `node` feature)

/// Re-export transport types.
pub mod transport {
    pub use modemlink_transport::*;
}

/// Re-export wire types.
pub mod wire {
    pub use modemlink_wire::*;
}

/// Re-export node types (requires `node` feature).
#[cfg(feature = "node")]
pub mod node {
    pub use modemlink_node::*;
}
