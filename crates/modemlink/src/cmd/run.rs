use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use modemlink_node::{attach_with_config, NodeConfig};
use modemlink_transport::LinkConfig;
use tracing::info;

use crate::cmd::{parse_server, parse_window, RunArgs};
use crate::exit::{node_error, CliError, CliResult, INTERNAL, SUCCESS};

pub fn run(args: RunArgs) -> CliResult<i32> {
    let window = parse_window(&args.window)?;
    let server = parse_server(&args.server)?;

    let link_config = LinkConfig {
        baud: args.baud,
        ..LinkConfig::default()
    };
    let node_config = NodeConfig {
        server,
        network_id: args.network_id,
        recv_window: window,
    };

    let mut node = attach_with_config(&args.port, &link_config, node_config)
        .map_err(|err| node_error("attach failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    info!(port = %args.port.display(), server = %server, "link service starting");
    node.run(&running)
        .map_err(|err| node_error("service loop failed", err))?;

    Ok(SUCCESS)
}

pub fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
