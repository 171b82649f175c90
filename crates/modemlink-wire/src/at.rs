//! AT identity queries and their status responses.
//!
//! The node learns who it is by asking the modem: hardware address (split
//! across two registers), assigned IPv4 address, and source port. Responses
//! carry no transaction ids beyond a one-byte frame id, so recognition is
//! exact matching on total length plus the five-byte response prefix.

/// Frame type of an AT command request.
pub const AT_REQUEST: u8 = 0x08;

/// Frame type of an AT command status response.
pub const AT_RESPONSE: u8 = 0x88;

/// Status byte the modem reports when a command succeeded.
pub const AT_STATUS_OK: u8 = 0x00;

/// Frame id that suppresses the modem's status response.
pub const NO_REPLY_FRAME_ID: u8 = 0x00;

/// Offset of the data field within a recognized response.
pub const RESPONSE_DATA_OFFSET: usize = 5;

/// The four identity queries the node issues, in handshake order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtQuery {
    /// Low four bytes of the hardware address ("SL").
    SerialLow,
    /// High two bytes of the hardware address ("SH").
    SerialHigh,
    /// The modem's UDP source port ("C0").
    SourcePort,
    /// The node's assigned IPv4 address ("MY").
    NetworkAddress,
}

impl AtQuery {
    /// All queries in the order the handshake sends them.
    pub const ALL: [AtQuery; 4] = [
        AtQuery::SerialLow,
        AtQuery::SerialHigh,
        AtQuery::SourcePort,
        AtQuery::NetworkAddress,
    ];

    /// The two-character AT command name.
    pub fn command(self) -> [u8; 2] {
        match self {
            AtQuery::SerialLow => *b"SL",
            AtQuery::SerialHigh => *b"SH",
            AtQuery::SourcePort => *b"C0",
            AtQuery::NetworkAddress => *b"MY",
        }
    }

    /// Frame id carried by this query and echoed in its response.
    pub fn frame_id(self) -> u8 {
        match self {
            AtQuery::SerialLow => 1,
            AtQuery::SerialHigh => 2,
            AtQuery::SourcePort => 3,
            AtQuery::NetworkAddress => 4,
        }
    }

    /// Width of the data field in this query's response.
    pub fn data_len(self) -> usize {
        match self {
            AtQuery::SerialLow | AtQuery::NetworkAddress => 4,
            AtQuery::SerialHigh | AtQuery::SourcePort => 2,
        }
    }

    /// Exact total length of a recognized response to this query.
    pub fn response_len(self) -> usize {
        RESPONSE_DATA_OFFSET + self.data_len()
    }

    /// Human-readable name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            AtQuery::SerialLow => "serial-low",
            AtQuery::SerialHigh => "serial-high",
            AtQuery::SourcePort => "source-port",
            AtQuery::NetworkAddress => "network-address",
        }
    }

    /// Request payload: `[0x08, frame id, command]`.
    pub fn encode(self) -> [u8; 4] {
        let cmd = self.command();
        [AT_REQUEST, self.frame_id(), cmd[0], cmd[1]]
    }
}

/// Build the network-id set command ("ID").
///
/// Sent with frame id 0 so the modem produces no status response.
pub fn encode_network_id(network_id: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(4 + network_id.len());
    payload.extend_from_slice(&[AT_REQUEST, NO_REPLY_FRAME_ID, b'I', b'D']);
    payload.extend_from_slice(network_id);
    payload
}

/// A recognized identity response, carrying its data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtResponse {
    /// Low four bytes of the hardware address.
    SerialLow([u8; 4]),
    /// High two bytes of the hardware address.
    SerialHigh([u8; 2]),
    /// The modem's UDP source port, big-endian.
    SourcePort([u8; 2]),
    /// The node's assigned IPv4 address.
    NetworkAddress([u8; 4]),
}

impl AtResponse {
    /// The query this response answers.
    pub fn query(&self) -> AtQuery {
        match self {
            AtResponse::SerialLow(_) => AtQuery::SerialLow,
            AtResponse::SerialHigh(_) => AtQuery::SerialHigh,
            AtResponse::SourcePort(_) => AtQuery::SourcePort,
            AtResponse::NetworkAddress(_) => AtQuery::NetworkAddress,
        }
    }
}

/// Classify a received frame payload against the four known responses.
///
/// A match requires the exact expected length AND the exact five-byte prefix
/// `[0x88, frame id, command, 0x00]`. Anything else is unrecognized and
/// yields `None` — malformed frames are a normal outcome here, never an
/// error.
pub fn classify(frame: &[u8]) -> Option<AtResponse> {
    for query in AtQuery::ALL {
        let cmd = query.command();
        let prefix = [AT_RESPONSE, query.frame_id(), cmd[0], cmd[1], AT_STATUS_OK];
        if frame.len() != query.response_len() || frame[..RESPONSE_DATA_OFFSET] != prefix {
            continue;
        }

        let data = &frame[RESPONSE_DATA_OFFSET..];
        return Some(match query {
            AtQuery::SerialLow => AtResponse::SerialLow(data.try_into().unwrap()),
            AtQuery::SerialHigh => AtResponse::SerialHigh(data.try_into().unwrap()),
            AtQuery::SourcePort => AtResponse::SourcePort(data.try_into().unwrap()),
            AtQuery::NetworkAddress => AtResponse::NetworkAddress(data.try_into().unwrap()),
        });
    }
    None
}

/// Encode a response payload as the modem would emit it.
///
/// The node itself never builds responses; this exists for the layers above
/// to script modem traffic in tests and demos.
pub fn encode_response(response: &AtResponse) -> Vec<u8> {
    let query = response.query();
    let cmd = query.command();
    let mut frame = vec![AT_RESPONSE, query.frame_id(), cmd[0], cmd[1], AT_STATUS_OK];
    let data: &[u8] = match response {
        AtResponse::SerialLow(data) | AtResponse::NetworkAddress(data) => data,
        AtResponse::SerialHigh(data) | AtResponse::SourcePort(data) => data,
    };
    frame.extend_from_slice(data);
    frame
}
