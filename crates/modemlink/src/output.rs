use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use modemlink_node::Identity;
use modemlink_wire::{classify, hex_dump};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct IdentityOutput<'a> {
    schema_id: &'a str,
    mac: String,
    ip: String,
    port: u16,
    socket: String,
}

pub fn print_identity(identity: &Identity, format: OutputFormat) {
    let socket = identity.socket();
    match format {
        OutputFormat::Json => {
            let out = IdentityOutput {
                schema_id: "https://schemas.modemlink.dev/cli/v1/identity.schema.json",
                mac: identity.mac().to_string(),
                ip: socket.ip().to_string(),
                port: identity.port_value(),
                socket: socket.to_string(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["MAC", "IP", "PORT"])
                .add_row(vec![
                    identity.mac().to_string(),
                    socket.ip().to_string(),
                    identity.port_value().to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("mac={} addr={}", identity.mac(), socket);
        }
        OutputFormat::Raw => {
            println!("{socket}");
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    schema_id: &'a str,
    kind: &'a str,
    size: usize,
    bytes: String,
    timestamp: String,
}

pub fn print_received_frame(payload: &[u8], format: OutputFormat) {
    let kind = frame_kind(payload);
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                schema_id: "https://schemas.modemlink.dev/cli/v1/frame-received.schema.json",
                kind,
                size: payload.len(),
                bytes: hex_dump(payload),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "SIZE", "BYTES"])
                .add_row(vec![
                    kind.to_string(),
                    payload.len().to_string(),
                    hex_dump(payload),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("kind={} size={} bytes={}", kind, payload.len(), hex_dump(payload));
        }
        OutputFormat::Raw => {
            print_raw(payload);
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Human name for a received payload, by response shape.
pub fn frame_kind(payload: &[u8]) -> &'static str {
    match classify(payload) {
        Some(response) => response.query().name(),
        None => "unrecognized",
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
