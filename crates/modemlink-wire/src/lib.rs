//! Wire formats for the radio modem link.
//!
//! Every byte exchanged with the modem travels inside an API frame:
//! - A 1-byte start delimiter (0x7E) for stream synchronization
//! - A 2-byte big-endian payload length
//! - The payload, then a 1-byte sum-complement checksum
//!
//! On top of the frame layer sit the AT identity queries and responses,
//! and the fixed-layout transmit datagram addressed to the server.
//! No partial reads, no buffer management in user code.

pub mod at;
pub mod codec;
pub mod datagram;
pub mod error;
pub mod reader;
pub mod writer;

pub use at::{classify, encode_network_id, encode_response, AtQuery, AtResponse};
pub use codec::{
    checksum, decode_frame, encode_frame, hex_dump, WireConfig, HEADER_SIZE, MAX_PAYLOAD,
    START_DELIMITER, TRAILER_SIZE,
};
pub use datagram::{Datagram, ServerAddr, COMMAND_IDENTITY, TX_FRAME_LEN};
pub use error::{Result, WireError};
pub use reader::ApiReader;
pub use writer::ApiWriter;
