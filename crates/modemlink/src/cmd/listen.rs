use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use modemlink_transport::{LinkConfig, SerialLink};
use modemlink_wire::{ApiReader, WireConfig};

use crate::cmd::run::install_ctrlc_handler;
use crate::cmd::ListenArgs;
use crate::exit::{transport_error, wire_error, CliResult, SUCCESS};
use crate::output::{print_received_frame, OutputFormat};

const POLL_WINDOW: Duration = Duration::from_millis(250);

/// Passive receive: frames are printed as they arrive and nothing is
/// ever written to the modem.
pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let link_config = LinkConfig {
        baud: args.baud,
        ..LinkConfig::default()
    };
    let link = SerialLink::open_with_config(&args.port, &link_config)
        .map_err(|err| transport_error("open failed", err))?;

    let wire_config = WireConfig {
        char_timeout: Some(link_config.char_timeout),
        ..WireConfig::default()
    };
    let mut reader = ApiReader::with_config_serial(link, wire_config)
        .map_err(|err| wire_error("reader setup failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let frame = match reader.read_frame(POLL_WINDOW) {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(err) => return Err(wire_error("receive failed", err)),
        };

        print_received_frame(&frame, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                return Ok(SUCCESS);
            }
        }
    }

    Ok(SUCCESS)
}
