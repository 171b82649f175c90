use std::time::Instant;

use modemlink_node::{attach_with_config, Activity, NodeConfig};
use modemlink_transport::LinkConfig;
use modemlink_wire::AtQuery;
use tracing::debug;

use crate::cmd::{parse_window, IdentifyArgs};
use crate::exit::{node_error, CliError, CliResult, SUCCESS, TIMEOUT};
use crate::output::{print_identity, OutputFormat};

pub fn run(args: IdentifyArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_window(&args.timeout)?;
    let link_config = LinkConfig {
        baud: args.baud,
        ..LinkConfig::default()
    };

    let mut node = attach_with_config(&args.port, &link_config, NodeConfig::default())
        .map_err(|err| node_error("attach failed", err))?;
    node.handshake()
        .map_err(|err| node_error("handshake failed", err))?;

    // The service loop keeps running underneath; quiet windows re-query
    // the address on their own, so a lost response self-heals.
    let deadline = Instant::now() + timeout;
    let mut outstanding: Vec<AtQuery> = AtQuery::ALL.into();

    while !outstanding.is_empty() {
        if Instant::now() >= deadline {
            let missing = outstanding
                .iter()
                .map(|q| q.name())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(CliError::new(
                TIMEOUT,
                format!("identity incomplete after {timeout:?}: missing {missing}"),
            ));
        }

        match node.poll().map_err(|err| node_error("receive failed", err))? {
            Activity::IdentityUpdated(response) => {
                outstanding.retain(|q| *q != response.query());
            }
            Activity::HeartbeatSent => debug!("window expired while waiting for identity"),
            Activity::Unrecognized(frame) => debug!(len = frame.len(), "ignoring frame"),
        }
    }

    print_identity(node.identity(), format);
    Ok(SUCCESS)
}
