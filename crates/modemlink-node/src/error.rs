use thiserror::Error;

/// Errors surfaced by the node layer.
///
/// The service loop does not attempt link recovery; transport and wire
/// faults propagate to the caller, which owns the decision to retry,
/// reopen, or exit.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Serial link open or configuration failure.
    #[error(transparent)]
    Transport(#[from] modemlink_transport::TransportError),

    /// Framing or link I/O failure.
    #[error(transparent)]
    Wire(#[from] modemlink_wire::WireError),
}

/// Convenience alias for node results.
pub type Result<T> = std::result::Result<T, NodeError>;
