//! Outbound transmit datagrams.
//!
//! Everything the node sends upstream is one fixed 19-byte transmit request
//! addressed to the server: destination endpoint, the node's own port and
//! hardware address, and a single trailing command byte. Field order and
//! widths are load-bearing — the server parses by position.

use crate::error::{Result, WireError};

/// Frame type of a transmit-to-IPv4 request.
pub const TX_FRAME_TYPE: u8 = 0x20;

/// Fixed frame id stamped on every transmit request.
pub const TX_FRAME_ID: u8 = 0x10;

/// Protocol selector: UDP.
pub const PROTOCOL_UDP: u8 = 0x00;

/// Transmit options: none.
pub const OPTIONS_NONE: u8 = 0x00;

/// Total size of a transmit frame.
pub const TX_FRAME_LEN: usize = 19;

/// Command byte announcing the node's identity; doubles as the heartbeat
/// marker.
pub const COMMAND_IDENTITY: u8 = b'I';

/// Byte positions within a transmit frame.
pub mod field {
    use std::ops::Range;

    pub const FRAME_TYPE: usize = 0;
    pub const FRAME_ID: usize = 1;
    pub const DEST_IP: Range<usize> = 2..6;
    pub const DEST_PORT: Range<usize> = 6..8;
    pub const SOURCE_PORT: Range<usize> = 8..10;
    pub const PROTOCOL: usize = 10;
    pub const OPTIONS: usize = 11;
    pub const HARDWARE_ADDR: Range<usize> = 12..18;
    pub const COMMAND: usize = 18;
}

/// The fixed server endpoint transmit frames target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerAddr {
    pub ip: [u8; 4],
    /// Port bytes in wire order (big-endian).
    pub port: [u8; 2],
}

impl ServerAddr {
    pub const fn new(ip: [u8; 4], port: u16) -> Self {
        Self {
            ip,
            port: port.to_be_bytes(),
        }
    }

    /// The port as a host-order integer.
    pub fn port_value(&self) -> u16 {
        u16::from_be_bytes(self.port)
    }
}

impl std::fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d] = self.ip;
        write!(f, "{a}.{b}.{c}.{d}:{}", self.port_value())
    }
}

/// One outbound datagram: destination, the node's identity fields, and a
/// command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datagram {
    pub dest: ServerAddr,
    /// The node's UDP source port, wire order.
    pub source_port: [u8; 2],
    /// The node's six-byte hardware address.
    pub hardware_addr: [u8; 6],
    pub command: u8,
}

impl Datagram {
    /// Encode into the fixed 19-byte wire layout.
    ///
    /// Pure byte assembly: unset identity fields encode as zeros.
    pub fn encode(&self) -> [u8; TX_FRAME_LEN] {
        let mut frame = [0u8; TX_FRAME_LEN];
        frame[field::FRAME_TYPE] = TX_FRAME_TYPE;
        frame[field::FRAME_ID] = TX_FRAME_ID;
        frame[field::DEST_IP].copy_from_slice(&self.dest.ip);
        frame[field::DEST_PORT].copy_from_slice(&self.dest.port);
        frame[field::SOURCE_PORT].copy_from_slice(&self.source_port);
        frame[field::PROTOCOL] = PROTOCOL_UDP;
        frame[field::OPTIONS] = OPTIONS_NONE;
        frame[field::HARDWARE_ADDR].copy_from_slice(&self.hardware_addr);
        frame[field::COMMAND] = self.command;
        frame
    }

    /// Decode a transmit frame back into its fields.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        if frame.len() != TX_FRAME_LEN {
            return Err(WireError::BadLength {
                len: frame.len(),
                expected: TX_FRAME_LEN,
            });
        }
        if frame[field::FRAME_TYPE] != TX_FRAME_TYPE {
            return Err(WireError::UnexpectedFrameType {
                expected: TX_FRAME_TYPE,
                actual: frame[field::FRAME_TYPE],
            });
        }

        Ok(Self {
            dest: ServerAddr {
                ip: frame[field::DEST_IP].try_into().unwrap(),
                port: frame[field::DEST_PORT].try_into().unwrap(),
            },
            source_port: frame[field::SOURCE_PORT].try_into().unwrap(),
            hardware_addr: frame[field::HARDWARE_ADDR].try_into().unwrap(),
            command: frame[field::COMMAND],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Datagram {
        Datagram {
            dest: ServerAddr::new([52, 73, 65, 98], 1973),
            source_port: [0x26, 0x16],
            hardware_addr: [0xAA, 0xBB, 0xDE, 0xAD, 0xBE, 0xEF],
            command: COMMAND_IDENTITY,
        }
    }

    #[test]
    fn encode_matches_wire_layout() {
        let frame = sample().encode();

        let expected: [u8; TX_FRAME_LEN] = [
            0x20, 0x10, // frame type, frame id
            52, 73, 65, 98, // destination IP
            0x07, 0xB5, // destination port 1973
            0x26, 0x16, // source port
            0x00, 0x00, // protocol (UDP), options
            0xAA, 0xBB, 0xDE, 0xAD, 0xBE, 0xEF, // hardware address
            b'I', // command
        ];
        assert_eq!(frame, expected);
    }

    #[test]
    fn encode_is_deterministic() {
        let datagram = sample();
        assert_eq!(datagram.encode(), datagram.encode());
    }

    #[test]
    fn encode_decode_roundtrip() {
        let datagram = sample();
        let decoded = Datagram::decode(&datagram.encode()).unwrap();
        assert_eq!(decoded, datagram);
    }

    #[test]
    fn zeroed_identity_encodes_as_zeros() {
        let datagram = Datagram {
            dest: ServerAddr::new([52, 73, 65, 98], 1973),
            source_port: [0, 0],
            hardware_addr: [0; 6],
            command: COMMAND_IDENTITY,
        };
        let frame = datagram.encode();
        assert_eq!(&frame[field::SOURCE_PORT], &[0, 0]);
        assert_eq!(&frame[field::HARDWARE_ADDR], &[0; 6]);
        assert_eq!(frame[field::COMMAND], b'I');
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let result = Datagram::decode(&[0x20; 18]);
        assert!(matches!(
            result,
            Err(WireError::BadLength { len: 18, expected: TX_FRAME_LEN })
        ));
    }

    #[test]
    fn decode_rejects_wrong_frame_type() {
        let mut frame = sample().encode();
        frame[field::FRAME_TYPE] = 0x88;
        let result = Datagram::decode(&frame);
        assert!(matches!(
            result,
            Err(WireError::UnexpectedFrameType { actual: 0x88, .. })
        ));
    }

    #[test]
    fn server_addr_display() {
        let addr = ServerAddr::new([52, 73, 65, 98], 1973);
        assert_eq!(addr.to_string(), "52.73.65.98:1973");
        assert_eq!(addr.port, [0x07, 0xB5]);
    }
}
