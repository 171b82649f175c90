//! Runs the node service loop against an in-memory modem script — no
//! hardware required.
//!
//! Run with:
//!   cargo run --example scripted-session --features node
//!
//! The fake modem answers the four identity queries, then goes quiet so
//! the liveness path fires once before the session ends.

use std::collections::VecDeque;
use std::io::{self, Read};
use std::time::Duration;

use modemlink::node::{Node, NodeConfig};
use modemlink::wire::{encode_frame, encode_response, ApiReader, ApiWriter, AtResponse};

/// Hands out one pre-framed response per read, then times out forever.
struct ScriptedModem {
    frames: VecDeque<Vec<u8>>,
}

impl Read for ScriptedModem {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.frames.pop_front() {
            Some(frame) => {
                buf[..frame.len()].copy_from_slice(&frame);
                Ok(frame.len())
            }
            None => Err(io::ErrorKind::TimedOut.into()),
        }
    }
}

fn framed(response: &AtResponse) -> Vec<u8> {
    let mut buf = bytes::BytesMut::new();
    encode_frame(&encode_response(response), &mut buf).expect("response fits a frame");
    buf.to_vec()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let modem = ScriptedModem {
        frames: VecDeque::from([
            framed(&AtResponse::SerialHigh([0xAA, 0xBB])),
            framed(&AtResponse::SerialLow([0xDE, 0xAD, 0xBE, 0xEF])),
            framed(&AtResponse::SourcePort([0x07, 0xB5])),
            framed(&AtResponse::NetworkAddress([10, 0, 0, 1])),
        ]),
    };

    let config = NodeConfig {
        recv_window: Duration::from_millis(10),
        ..NodeConfig::default()
    };
    let mut node = Node::new(
        ApiReader::new(modem),
        ApiWriter::new(Vec::new()),
        config,
    );

    node.handshake()?;
    eprintln!("Handshake sent, draining responses...");

    for _ in 0..5 {
        let activity = node.poll()?;
        eprintln!("Activity: {activity:?}");
    }

    let identity = node.identity();
    eprintln!("Resolved identity: mac={} addr={}", identity.mac(), identity.socket());
    Ok(())
}
