use std::net::SocketAddrV4;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use modemlink_wire::ServerAddr;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod doctor;
pub mod identify;
pub mod listen;
pub mod run;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the link service loop until interrupted.
    Run(RunArgs),
    /// Query the modem for the node identity and print it.
    Identify(IdentifyArgs),
    /// Print received frames without driving the link.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args),
        Command::Identify(args) => identify::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Doctor(args) => doctor::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Serial device the modem is attached to.
    pub port: PathBuf,
    /// Serial baud rate.
    #[arg(long, default_value = "9600")]
    pub baud: u32,
    /// Server endpoint for identity heartbeats (ip:port).
    #[arg(long, default_value = "52.73.65.98:1973")]
    pub server: String,
    /// Network id to join at startup.
    #[arg(long, default_value = "vummiv", env = "MODEMLINK_NETWORK_ID")]
    pub network_id: String,
    /// Receive window per loop iteration (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s")]
    pub window: String,
}

#[derive(Args, Debug)]
pub struct IdentifyArgs {
    /// Serial device the modem is attached to.
    pub port: PathBuf,
    /// Serial baud rate.
    #[arg(long, default_value = "9600")]
    pub baud: u32,
    /// Give up if the identity is still incomplete after this long.
    #[arg(long, default_value = "10s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Serial device the modem is attached to.
    pub port: PathBuf,
    /// Serial baud rate.
    #[arg(long, default_value = "9600")]
    pub baud: u32,
    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {
    /// Also probe this serial device for access.
    #[arg(long)]
    pub port: Option<PathBuf>,
}

pub fn parse_window(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

pub fn parse_server(input: &str) -> CliResult<ServerAddr> {
    let addr: SocketAddrV4 = input
        .trim()
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid server address: {input}")))?;
    Ok(ServerAddr::new(addr.ip().octets(), addr.port()))
}
