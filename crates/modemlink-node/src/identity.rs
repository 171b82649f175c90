//! Accumulated node identity.
//!
//! The modem reports its addresses across four separate responses, in
//! whatever order it feels like. [`Identity`] is the merge target: each
//! response overwrites its own field slice and leaves the rest alone.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

use modemlink_wire::AtResponse;

/// The node's self-reported addresses, assembled from modem responses.
///
/// Fields update independently as responses arrive and the latest
/// response wins per field. There is no cross-field atomicity: between
/// the serial-high and serial-low responses the hardware address is a
/// mix of old and new bytes. Unset fields read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity {
    /// Hardware address; high two bytes from serial-high, low four from
    /// serial-low.
    pub mac: [u8; 6],
    /// IPv4 address from the network-address query.
    pub ip: [u8; 4],
    /// UDP source port from the source-port query, wire order.
    pub port: [u8; 2],
}

impl Identity {
    /// Merge one response into the identity, last write wins.
    pub fn apply(&mut self, response: &AtResponse) {
        match response {
            AtResponse::SerialLow(low) => self.mac[2..6].copy_from_slice(low),
            AtResponse::SerialHigh(high) => self.mac[..2].copy_from_slice(high),
            AtResponse::SourcePort(port) => self.port = *port,
            AtResponse::NetworkAddress(ip) => self.ip = *ip,
        }
    }

    /// The hardware address wrapped for display.
    pub fn mac(&self) -> MacAddr {
        MacAddr(self.mac)
    }

    /// The IPv4 address and port as a socket address.
    pub fn socket(&self) -> SocketAddrV4 {
        SocketAddrV4::new(Ipv4Addr::from(self.ip), self.port_value())
    }

    /// The port as a host-order integer.
    pub fn port_value(&self) -> u16 {
        u16::from_be_bytes(self.port)
    }
}

/// Colon-separated lowercase hex rendering of a hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddr(pub [u8; 6]);

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_identity_is_all_zeroes() {
        let identity = Identity::default();
        assert_eq!(identity.mac, [0u8; 6]);
        assert_eq!(identity.ip, [0u8; 4]);
        assert_eq!(identity.port_value(), 0);
    }

    #[test]
    fn serial_responses_assemble_the_hardware_address() {
        let mut identity = Identity::default();
        identity.apply(&AtResponse::SerialHigh([0xAA, 0xBB]));
        identity.apply(&AtResponse::SerialLow([0xDE, 0xAD, 0xBE, 0xEF]));
        assert_eq!(identity.mac, [0xAA, 0xBB, 0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn later_response_overwrites_earlier_one() {
        let mut identity = Identity::default();
        identity.apply(&AtResponse::NetworkAddress([10, 0, 0, 1]));
        identity.apply(&AtResponse::NetworkAddress([192, 168, 1, 7]));
        assert_eq!(identity.ip, [192, 168, 1, 7]);
    }

    #[test]
    fn partial_updates_leave_other_fields_alone() {
        let mut identity = Identity::default();
        identity.apply(&AtResponse::SerialLow([1, 2, 3, 4]));
        identity.apply(&AtResponse::SourcePort([0x07, 0xB5]));
        assert_eq!(identity.mac, [0, 0, 1, 2, 3, 4]);
        assert_eq!(identity.ip, [0, 0, 0, 0]);
        assert_eq!(identity.port_value(), 1973);
    }

    #[test]
    fn mac_displays_as_colon_hex() {
        let mac = MacAddr([0xAA, 0xBB, 0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(mac.to_string(), "aa:bb:de:ad:be:ef");
    }

    #[test]
    fn socket_combines_ip_and_port() {
        let mut identity = Identity::default();
        identity.apply(&AtResponse::NetworkAddress([10, 0, 0, 1]));
        identity.apply(&AtResponse::SourcePort([0x07, 0xB5]));
        assert_eq!(identity.socket().to_string(), "10.0.0.1:1973");
    }
}
